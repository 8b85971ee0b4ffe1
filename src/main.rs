//! naver-openapi CLI - smoke-check an environment's configuration and endpoints.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use naver_openapi::harness::selector_from_process_env;
use naver_openapi::model::{KeywordGroup, SearchKind, SearchRequest, SearchTrendRequest};
use naver_openapi::{ApiResponse, ClientConfig, ConfigScope, NaverClient, SettingsLoader};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "naver-openapi")]
#[command(about = "Smoke-check Naver Open API environments")]
#[command(version)]
struct Cli {
    /// Environment selector (alpha, beta, real). Defaults to $NAVER_ENV, then $env.
    #[arg(short, long, global = true)]
    env: Option<String>,

    /// Read test-scope resources (test-<env>.toml) instead of config/<env>.toml
    #[arg(long, global = true)]
    test_scope: bool,

    /// Resource root directory
    #[arg(short, long, global = true, default_value = SettingsLoader::DEFAULT_ROOT)]
    resources: PathBuf,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved configuration
    Config {
        /// Only print the resource file path
        #[arg(long)]
        path: bool,
    },

    /// Run a search query
    Search {
        #[arg(value_enum)]
        kind: Vertical,
        query: String,
        #[arg(long, default_value_t = 10)]
        display: u32,
        #[arg(long, default_value_t = 1)]
        start: u32,
        #[arg(long, default_value = "sim")]
        sort: String,
    },

    /// Query DataLab search trends
    Trend {
        #[arg(long)]
        start_date: String,
        #[arg(long)]
        end_date: String,
        #[arg(long, default_value = "month")]
        time_unit: String,
        /// Keyword group as name=kw1,kw2 (repeatable)
        #[arg(long = "group", required = true)]
        groups: Vec<String>,
        #[arg(long)]
        device: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long, value_delimiter = ',')]
        ages: Vec<String>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Vertical {
    Blog,
    News,
    Book,
    Encyc,
    Cafearticle,
    Kin,
    Webkr,
    Image,
    Shop,
    Doc,
    Local,
}

impl From<Vertical> for SearchKind {
    fn from(v: Vertical) -> Self {
        match v {
            Vertical::Blog => SearchKind::Blog,
            Vertical::News => SearchKind::News,
            Vertical::Book => SearchKind::Book,
            Vertical::Encyc => SearchKind::Encyc,
            Vertical::Cafearticle => SearchKind::Cafearticle,
            Vertical::Kin => SearchKind::Kin,
            Vertical::Webkr => SearchKind::Webkr,
            Vertical::Image => SearchKind::Image,
            Vertical::Shop => SearchKind::Shop,
            Vertical::Doc => SearchKind::Doc,
            Vertical::Local => SearchKind::Local,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let selector = cli.env.clone().or_else(selector_from_process_env);
    let scope = ConfigScope::from_test_flag(cli.test_scope);
    let loader = SettingsLoader::new(&cli.resources);

    match cli.command {
        Commands::Config { path } => show_config(selector.as_deref(), scope, &loader, path),
        Commands::Search {
            kind,
            query,
            display,
            start,
            sort,
        } => {
            let client = build_client(selector.as_deref(), scope, &loader)?;
            let request = SearchRequest::new(query)
                .display(display)
                .start(start)
                .sort(sort);
            print_response(&client.search(kind.into(), &request)?)
        }
        Commands::Trend {
            start_date,
            end_date,
            time_unit,
            groups,
            device,
            gender,
            ages,
        } => {
            let client = build_client(selector.as_deref(), scope, &loader)?;
            let mut request = SearchTrendRequest::new(start_date, end_date, time_unit);
            for group in &groups {
                request = request.group(parse_group(group)?);
            }
            if let Some(device) = device {
                request = request.device(device);
            }
            if let Some(gender) = gender {
                request = request.gender(gender);
            }
            if !ages.is_empty() {
                request = request.ages(ages);
            }
            print_response(&client.search_trend(&request)?)
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_target(false))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false))
            .with(filter)
            .init();
    }
}

fn build_client(
    selector: Option<&str>,
    scope: ConfigScope,
    loader: &SettingsLoader,
) -> anyhow::Result<NaverClient> {
    let config = ClientConfig::from_selector(selector, scope, loader)
        .context("Environment initialization failed")?;
    NaverClient::new(config).context("API client initialization failed")
}

fn show_config(
    selector: Option<&str>,
    scope: ConfigScope,
    loader: &SettingsLoader,
    path_only: bool,
) -> anyhow::Result<()> {
    let environment = naver_openapi::Environment::resolve(selector)?;
    if path_only {
        let rel = SettingsLoader::resource_path(environment.name(), scope);
        println!("{}", loader.root().join(rel).display());
        return Ok(());
    }

    let config = ClientConfig::from_environment(environment, scope, loader)?;
    println!("────────────────────────────────────────");
    println!("Environment:     {} ({})", environment, environment.description());
    println!("Base URL:        {}", config.base_url());
    println!("Client ID:       {}", config.client_id());
    println!("Client Secret:   ***");
    println!("Connect timeout: {}ms", config.connect_timeout_ms());
    println!("Read timeout:    {}ms", config.read_timeout_ms());
    println!("Logging:         {}", config.logging_enabled());
    println!("────────────────────────────────────────");
    Ok(())
}

fn parse_group(raw: &str) -> anyhow::Result<KeywordGroup> {
    let Some((name, keywords)) = raw.split_once('=') else {
        bail!("keyword group must look like name=kw1,kw2: {}", raw);
    };
    let keywords: Vec<&str> = keywords
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .collect();
    if name.trim().is_empty() || keywords.is_empty() {
        bail!("keyword group needs a name and at least one keyword: {}", raw);
    }
    Ok(KeywordGroup::new(name.trim(), keywords))
}

fn print_response(response: &ApiResponse) -> anyhow::Result<()> {
    println!("← {}", response.status());
    match response.json::<serde_json::Value>() {
        Ok(body) => println!("{}", serde_json::to_string_pretty(&body)?),
        Err(_) => println!("{}", response.text()),
    }
    Ok(())
}
