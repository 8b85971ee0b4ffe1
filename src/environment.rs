//! Deployment targets the client can be pointed at.

use crate::error::{ClientError, Result};
use std::fmt;
use std::str::FromStr;

/// A closed set of deployment environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    /// Development.
    #[default]
    Alpha,
    /// Staging / verification.
    Beta,
    /// Production.
    Real,
}

impl Environment {
    const ALL: [Environment; 3] = [Environment::Alpha, Environment::Beta, Environment::Real];

    /// Every environment, in declaration order.
    pub fn all() -> &'static [Environment] {
        &Self::ALL
    }

    /// Canonical lowercase name, also used in resource file names.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::Beta => "beta",
            Self::Real => "real",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Alpha => "Alpha development environment",
            Self::Beta => "Beta staging environment",
            Self::Real => "Real production environment",
        }
    }

    fn alias(&self) -> &'static str {
        match self {
            Self::Alpha => "dev",
            Self::Beta => "staging",
            Self::Real => "prod",
        }
    }

    /// Resolve a free-form selector.
    ///
    /// Absent or blank input yields the default environment. Anything else is
    /// trimmed and matched case-insensitively against the canonical names
    /// (and the `dev`/`staging`/`prod` aliases).
    pub fn resolve(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(value) => value.parse(),
        }
    }
}

impl FromStr for Environment {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|env| {
                env.name().eq_ignore_ascii_case(needle) || env.alias().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| ClientError::InvalidEnvironment {
                value: s.to_string(),
                valid: Self::ALL.iter().map(Environment::name).collect(),
            })
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_or_absent_selector_defaults_to_alpha() {
        for raw in [None, Some(""), Some("   "), Some("\t\n")] {
            assert_eq!(Environment::resolve(raw).unwrap(), Environment::Alpha);
        }
    }

    #[test]
    fn resolves_trimmed_case_insensitive_names() {
        assert_eq!(Environment::resolve(Some(" BETA ")).unwrap(), Environment::Beta);
        assert_eq!(Environment::resolve(Some("Real")).unwrap(), Environment::Real);
        assert_eq!(Environment::resolve(Some("alpha")).unwrap(), Environment::Alpha);
    }

    #[test]
    fn resolves_aliases() {
        assert_eq!(Environment::resolve(Some("dev")).unwrap(), Environment::Alpha);
        assert_eq!(Environment::resolve(Some("STAGING")).unwrap(), Environment::Beta);
        assert_eq!(Environment::resolve(Some(" prod")).unwrap(), Environment::Real);
    }

    #[test]
    fn unknown_selector_is_rejected_with_valid_set() {
        for raw in ["gamma", "alphaa", "b eta", "1"] {
            match Environment::resolve(Some(raw)) {
                Err(ClientError::InvalidEnvironment { value, valid }) => {
                    assert_eq!(value, raw);
                    assert_eq!(valid, vec!["alpha", "beta", "real"]);
                }
                other => panic!("expected InvalidEnvironment for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn from_str_does_not_default() {
        assert!("".parse::<Environment>().is_err());
    }

    #[test]
    fn display_uses_canonical_name() {
        assert_eq!(Environment::Beta.to_string(), "beta");
        assert_eq!(Environment::all().len(), 3);
    }
}
