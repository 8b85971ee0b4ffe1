//! Request and response records for the search and DataLab endpoints.
//!
//! Field names follow the upstream JSON exactly. Optional trend filters are
//! omitted from the JSON when unset: the API rejects explicit nulls.

use crate::dispatcher::{QueryParams, QueryValue};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SEARCH_TREND_PATH: &str = "/v1/datalab/search";

/// Search vertical, selecting `/v1/search/<kind>.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
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

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::News => "news",
            Self::Book => "book",
            Self::Encyc => "encyc",
            Self::Cafearticle => "cafearticle",
            Self::Kin => "kin",
            Self::Webkr => "webkr",
            Self::Image => "image",
            Self::Shop => "shop",
            Self::Doc => "doc",
            Self::Local => "local",
        }
    }

    pub fn path(&self) -> String {
        format!("/v1/search/{}.json", self.as_str())
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters for a search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    /// Results per page (API max 100).
    pub display: u32,
    /// 1-based start offset (API max 1000).
    pub start: u32,
    /// `sim` (relevance) or `date`.
    pub sort: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            display: 10,
            start: 1,
            sort: "sim".to_string(),
            filter: None,
        }
    }

    pub fn display(mut self, display: u32) -> Self {
        self.display = display;
        self
    }

    pub fn start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert("query".to_string(), QueryValue::from(self.query.as_str()));
        params.insert("display".to_string(), QueryValue::from(self.display));
        params.insert("start".to_string(), QueryValue::from(self.start));
        params.insert("sort".to_string(), QueryValue::from(self.sort.as_str()));
        if let Some(filter) = &self.filter {
            params.insert("filter".to_string(), QueryValue::from(filter.as_str()));
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub last_build_date: Option<String>,
    pub total: u64,
    pub start: u32,
    pub display: u32,
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub pub_date: Option<String>,
}

/// Body for `POST /v1/datalab/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTrendRequest {
    /// `yyyy-MM-dd`, no earlier than 2016-01-01.
    pub start_date: String,
    pub end_date: String,
    /// `date`, `week` or `month`.
    pub time_unit: String,
    /// Up to 5 groups.
    pub keyword_groups: Vec<KeywordGroup>,
    /// `pc` or `mo`; unset means all devices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// `m` or `f`; unset means all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Age bucket codes `"1"` through `"11"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ages: Option<Vec<String>>,
}

impl SearchTrendRequest {
    pub fn new(
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        time_unit: impl Into<String>,
    ) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            time_unit: time_unit.into(),
            keyword_groups: Vec::new(),
            device: None,
            gender: None,
            ages: None,
        }
    }

    pub fn group(mut self, group: KeywordGroup) -> Self {
        self.keyword_groups.push(group);
        self
    }

    pub fn device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    pub fn gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn ages<I, S>(mut self, ages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ages = Some(ages.into_iter().map(Into::into).collect());
        self
    }
}

/// A topic name and the search terms that represent it (up to 20).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordGroup {
    pub group_name: String,
    pub keywords: Vec<String>,
}

impl KeywordGroup {
    pub fn new<I, S>(group_name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            group_name: group_name.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTrendResponse {
    pub start_date: String,
    pub end_date: String,
    pub time_unit: String,
    #[serde(default)]
    pub results: Vec<TrendResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub title: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub data: Vec<TrendData>,
}

/// Search ratio for one period, normalised to 0..=100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendData {
    pub period: String,
    pub ratio: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn search_request_defaults_match_api_defaults() {
        let request = SearchRequest::new("맛집");

        assert_eq!(request.display, 10);
        assert_eq!(request.start, 1);
        assert_eq!(request.sort, "sim");
        assert_eq!(request.filter, None);
    }

    #[test]
    fn search_request_query_omits_unset_filter() {
        let params = SearchRequest::new("rust").display(5).sort("date").to_query();

        assert_eq!(params.len(), 4);
        assert_eq!(params["display"], QueryValue::Integer(5));
        assert_eq!(params["sort"], QueryValue::Text("date".to_string()));
        assert!(!params.contains_key("filter"));
    }

    #[test]
    fn search_kind_paths() {
        assert_eq!(SearchKind::Blog.path(), "/v1/search/blog.json");
        assert_eq!(SearchKind::Cafearticle.path(), "/v1/search/cafearticle.json");
    }

    #[test]
    fn trend_request_omits_unset_filters() {
        let request = SearchTrendRequest::new("2024-01-01", "2024-12-31", "month")
            .group(KeywordGroup::new("자바", ["자바", "java"]));

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "startDate": "2024-01-01",
                "endDate": "2024-12-31",
                "timeUnit": "month",
                "keywordGroups": [{"groupName": "자바", "keywords": ["자바", "java"]}]
            })
        );
    }

    #[test]
    fn trend_request_includes_set_filters() {
        let request = SearchTrendRequest::new("2024-01-01", "2024-12-31", "month")
            .gender("f")
            .ages(["4", "5", "6"])
            .device("mo");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["gender"], "f");
        assert_eq!(value["device"], "mo");
        assert_eq!(value["ages"], json!(["4", "5", "6"]));
    }

    #[test]
    fn parses_search_response() {
        let body = json!({
            "lastBuildDate": "Mon, 02 Dec 2024 10:00:00 +0900",
            "total": 1234,
            "start": 1,
            "display": 1,
            "items": [{
                "title": "<b>맛집</b> 추천",
                "link": "https://blog.example.com/1",
                "description": "desc",
                "postdate": "20241201"
            }]
        });

        let response: SearchResponse = serde_json::from_value(body).unwrap();

        assert_eq!(response.total, 1234);
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].link, "https://blog.example.com/1");
        assert_eq!(response.items[0].pub_date, None);
    }

    #[test]
    fn parses_trend_response() {
        let body = json!({
            "startDate": "2024-01-01",
            "endDate": "2024-02-01",
            "timeUnit": "month",
            "results": [{
                "title": "자바",
                "keywords": ["자바", "java"],
                "data": [
                    {"period": "2024-01-01", "ratio": 100.0},
                    {"period": "2024-02-01", "ratio": 87.5}
                ]
            }]
        });

        let response: SearchTrendResponse = serde_json::from_value(body).unwrap();

        assert_eq!(response.time_unit, "month");
        assert_eq!(response.results[0].keywords, vec!["자바", "java"]);
        assert_eq!(response.results[0].data[1].ratio, 87.5);
    }
}
