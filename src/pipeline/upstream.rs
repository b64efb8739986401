//! Upstream HTTP pipeline
//!
//! Maps a (kind, descriptor) pair onto one GET request against the platform's
//! API host, e.g. `https://na1.api.riotgames.com/lol/match/v4/matches/123`.
//! The request runs on the blocking pool; there is no caching and no retry.

use super::{PipelineError, ResultKind, RetrievalPipeline};
pub use crate::config::DEFAULT_UPSTREAM_URL;
use crate::config::MatchgateConfig;
use crate::query::{QueryDescriptor, QueryValue};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

/// Header carrying the upstream API key
const API_KEY_HEADER: &str = "X-Riot-Token";

/// Descriptor fields forwarded as query parameters, with their wire names
const MATCHLIST_FILTERS: &[(&str, &str)] = &[
    ("queues", "queue"),
    ("endTime", "endTime"),
    ("beginIndex", "beginIndex"),
    ("beginTime", "beginTime"),
    ("seasons", "season"),
    ("champions", "champion"),
    ("endIndex", "endIndex"),
];

/// Pipeline that fetches directly from the upstream API
pub struct UpstreamPipeline {
    agent: ureq::Agent,
    base_url: String,
    api_key: Option<String>,
}

impl UpstreamPipeline {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();

        Self {
            agent: ureq::Agent::new_with_config(config),
            base_url: base_url.into(),
            api_key,
        }
    }

    pub fn from_config(config: &MatchgateConfig) -> Self {
        Self::new(
            config.upstream_url.clone(),
            config.api_key.clone(),
            config.request_timeout(),
        )
    }

    /// Build the upstream URL for a request
    pub fn request_url(
        &self,
        kind: ResultKind,
        query: &QueryDescriptor,
    ) -> Result<Url, PipelineError> {
        let platform = query
            .platform()
            .ok_or_else(|| PipelineError::InvalidQuery("query has no platform".to_string()))?;
        let base = self
            .base_url
            .replace("{platform}", &platform.tag().to_lowercase());
        let mut url = Url::parse(&base)
            .map_err(|e| PipelineError::Transport(format!("invalid upstream url '{}': {}", base, e)))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| PipelineError::Transport(format!("cannot use '{}' as a base", base)))?;
            segments.pop_if_empty().extend(["lol", "match", "v4"]);

            match kind {
                ResultKind::Match => {
                    let match_id = path_value(query, "matchId")?;
                    segments.extend(["matches", match_id.as_str()]);
                    if query.contains("tournamentCode") {
                        let code = path_value(query, "tournamentCode")?;
                        segments.extend(["by-tournament-code", code.as_str()]);
                    }
                }
                ResultKind::TournamentMatches => {
                    let code = path_value(query, "tournamentCode")?;
                    segments.extend(["matches", "by-tournament-code", code.as_str(), "ids"]);
                }
                ResultKind::Matchlist => {
                    let account_id = path_value(query, "accountId")?;
                    segments.extend(["matchlists", "by-account", account_id.as_str()]);
                }
                ResultKind::MatchTimeline => {
                    let match_id = path_value(query, "matchId")?;
                    segments.extend(["timelines", "by-match", match_id.as_str()]);
                }
            }
        }

        if kind == ResultKind::Matchlist {
            let pairs = matchlist_pairs(query);
            if !pairs.is_empty() {
                url.query_pairs_mut().extend_pairs(pairs);
            }
        }

        Ok(url)
    }
}

fn path_value(query: &QueryDescriptor, name: &str) -> Result<String, PipelineError> {
    query
        .get(name)
        .map(|value| value.to_string())
        .ok_or_else(|| PipelineError::InvalidQuery(format!("query is missing '{}'", name)))
}

fn matchlist_pairs(query: &QueryDescriptor) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    for (field, param) in MATCHLIST_FILTERS {
        match query.get(field) {
            Some(QueryValue::IntSet(values)) => {
                pairs.extend(values.iter().map(|v| (*param, v.to_string())));
            }
            Some(value) => pairs.push((*param, value.to_string())),
            None => {}
        }
    }
    pairs
}

/// Set filter supplied as an empty set, if any
///
/// The upstream API has no way to express an empty repeated parameter; an
/// empty filter matches nothing and is answered locally.
fn empty_set_filter(query: &QueryDescriptor) -> Option<&'static str> {
    MATCHLIST_FILTERS.iter().find_map(|(field, _)| match query.get(field) {
        Some(QueryValue::IntSet(values)) if values.is_empty() => Some(*field),
        _ => None,
    })
}

/// A matchlist page with no games, starting at the requested index
fn empty_matchlist(query: &QueryDescriptor) -> Value {
    let start = query
        .get("beginIndex")
        .and_then(QueryValue::as_i64)
        .unwrap_or(0);
    json!({
        "matches": [],
        "totalGames": 0,
        "startIndex": start,
        "endIndex": start,
    })
}

fn classify_join(err: tokio::task::JoinError) -> PipelineError {
    if err.is_cancelled() {
        PipelineError::Cancelled
    } else {
        PipelineError::Transport(format!("upstream request task failed: {}", err))
    }
}

fn classify(err: ureq::Error, url: &str) -> PipelineError {
    match err {
        ureq::Error::StatusCode(404) => PipelineError::NotFound(url.to_string()),
        ureq::Error::StatusCode(429) => PipelineError::RateLimited,
        ureq::Error::StatusCode(status) => PipelineError::Upstream { status },
        ureq::Error::Timeout(_) => PipelineError::Timeout,
        other => PipelineError::Transport(other.to_string()),
    }
}

fn fetch_blocking(
    agent: &ureq::Agent,
    url: &str,
    api_key: Option<&str>,
) -> Result<Value, PipelineError> {
    let mut request = agent.get(url);
    if let Some(key) = api_key {
        request = request.header(API_KEY_HEADER, key);
    }

    let mut response = request.call().map_err(|e| classify(e, url))?;
    response
        .body_mut()
        .read_json::<Value>()
        .map_err(|e| PipelineError::Decode(e.to_string()))
}

#[async_trait]
impl RetrievalPipeline for UpstreamPipeline {
    async fn fetch(
        &self,
        kind: ResultKind,
        query: &QueryDescriptor,
    ) -> Result<Value, PipelineError> {
        if kind == ResultKind::Matchlist {
            if let Some(field) = empty_set_filter(query) {
                tracing::debug!("'{}' filter is empty, answering with no matches", field);
                return Ok(empty_matchlist(query));
            }
        }

        let url = self.request_url(kind, query)?.to_string();
        tracing::debug!("fetching {} from {}", kind, url);

        let agent = self.agent.clone();
        let api_key = self.api_key.clone();
        let result = tokio::task::spawn_blocking(move || {
            fetch_blocking(&agent, &url, api_key.as_deref())
        })
        .await
        .map_err(classify_join)?;

        if let Err(e) = &result {
            tracing::warn!("upstream fetch of {} failed: {}", kind, e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use crate::platform::Platform;
    use crate::query::{FieldSpec, NOT_SUPPLIED_INT, NOT_SUPPLIED_LONG};
    use std::collections::BTreeSet;

    fn pipeline() -> UpstreamPipeline {
        UpstreamPipeline::new(DEFAULT_UPSTREAM_URL, None, Duration::from_secs(5))
    }

    #[test]
    fn test_match_url() {
        let query = QueryDescriptor::build([
            FieldSpec::required("platform", Platform::NorthAmerica),
            FieldSpec::required("matchId", 123i64),
        ])
        .unwrap();
        let url = pipeline().request_url(ResultKind::Match, &query).unwrap();
        assert_eq!(
            url.as_str(),
            "https://na1.api.riotgames.com/lol/match/v4/matches/123"
        );
    }

    #[test]
    fn test_match_by_tournament_code_url() {
        let query = QueryDescriptor::build([
            FieldSpec::required("platform", Platform::EuropeWest),
            FieldSpec::required("matchId", 5i64),
            FieldSpec::required("tournamentCode", "EUW/CODE 1"),
        ])
        .unwrap();
        let url = pipeline().request_url(ResultKind::Match, &query).unwrap();
        assert_eq!(
            url.as_str(),
            "https://euw1.api.riotgames.com/lol/match/v4/matches/5/by-tournament-code/EUW%2FCODE%201"
        );
    }

    #[test]
    fn test_tournament_ids_and_timeline_urls() {
        let query = QueryDescriptor::build([
            FieldSpec::required("platform", Platform::Korea),
            FieldSpec::required("tournamentCode", "KR-CODE"),
        ])
        .unwrap();
        let url = pipeline()
            .request_url(ResultKind::TournamentMatches, &query)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://kr.api.riotgames.com/lol/match/v4/matches/by-tournament-code/KR-CODE/ids"
        );

        let query = QueryDescriptor::build([
            FieldSpec::required("platform", Platform::Korea),
            FieldSpec::required("matchId", 999i64),
        ])
        .unwrap();
        let url = pipeline()
            .request_url(ResultKind::MatchTimeline, &query)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://kr.api.riotgames.com/lol/match/v4/timelines/by-match/999"
        );
    }

    #[test]
    fn test_matchlist_url_repeats_set_values() {
        let queues: BTreeSet<i32> = [420, 400].into_iter().collect();
        let query = QueryDescriptor::build([
            FieldSpec::required("platform", Platform::NorthAmerica),
            FieldSpec::required("accountId", "ABC"),
            FieldSpec::int_set("queues", Some(queues)),
            FieldSpec::long("endTime", NOT_SUPPLIED_LONG, NOT_SUPPLIED_LONG),
            FieldSpec::int("beginIndex", 5, NOT_SUPPLIED_INT),
        ])
        .unwrap();
        let url = pipeline().request_url(ResultKind::Matchlist, &query).unwrap();
        assert_eq!(
            url.as_str(),
            "https://na1.api.riotgames.com/lol/match/v4/matchlists/by-account/ABC?queue=400&queue=420&beginIndex=5"
        );
    }

    #[test]
    fn test_matchlist_url_without_filters_has_no_query() {
        let query = QueryDescriptor::build([
            FieldSpec::required("platform", Platform::NorthAmerica),
            FieldSpec::required("accountId", "ABC"),
        ])
        .unwrap();
        let url = pipeline().request_url(ResultKind::Matchlist, &query).unwrap();
        assert!(url.query().is_none());
    }

    #[test]
    fn test_custom_base_url() {
        let pipeline =
            UpstreamPipeline::new("http://localhost:9000/{platform}/", None, Duration::from_secs(1));
        let query = QueryDescriptor::build([
            FieldSpec::required("platform", Platform::Japan),
            FieldSpec::required("matchId", 1i64),
        ])
        .unwrap();
        let url = pipeline.request_url(ResultKind::Match, &query).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/jp1/lol/match/v4/matches/1");
    }

    #[test]
    fn test_missing_path_field() {
        let query =
            QueryDescriptor::build([FieldSpec::required("platform", Platform::NorthAmerica)])
                .unwrap();
        let err = pipeline()
            .request_url(ResultKind::Match, &query)
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidQuery(_)));

        let query = QueryDescriptor::build([FieldSpec::required("matchId", 1i64)]).unwrap();
        let err = pipeline()
            .request_url(ResultKind::Match, &query)
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidQuery(_)));
        assert_eq!(GatewayError::from(err).http_status(), 500);
    }

    #[tokio::test]
    async fn test_empty_set_filter_matches_nothing() {
        // unroutable host: any upstream request would fail
        let pipeline =
            UpstreamPipeline::new("http://127.0.0.1:1/{platform}", None, Duration::from_secs(1));
        let query = QueryDescriptor::build([
            FieldSpec::required("platform", Platform::NorthAmerica),
            FieldSpec::required("accountId", "ABC"),
            FieldSpec::int_set("queues", Some(BTreeSet::from([420]))),
            FieldSpec::int("beginIndex", 5, NOT_SUPPLIED_INT),
            FieldSpec::int_set("champions", Some(BTreeSet::new())),
        ])
        .unwrap();

        assert_eq!(empty_set_filter(&query), Some("champions"));
        let value = pipeline.fetch(ResultKind::Matchlist, &query).await.unwrap();
        assert_eq!(
            value,
            json!({"matches": [], "totalGames": 0, "startIndex": 5, "endIndex": 5})
        );
    }

    #[test]
    fn test_absent_set_filter_is_not_empty() {
        let query = QueryDescriptor::build([
            FieldSpec::required("platform", Platform::NorthAmerica),
            FieldSpec::required("accountId", "ABC"),
            FieldSpec::int_set("queues", None),
        ])
        .unwrap();
        assert_eq!(empty_set_filter(&query), None);
    }

    #[tokio::test]
    async fn test_join_errors_are_classified() {
        let panicked = tokio::spawn(async { panic!("boom") }).await.unwrap_err();
        assert!(matches!(classify_join(panicked), PipelineError::Transport(_)));

        let handle = tokio::spawn(std::future::pending::<()>());
        handle.abort();
        let cancelled = handle.await.unwrap_err();
        assert_eq!(classify_join(cancelled), PipelineError::Cancelled);
    }

    #[test]
    fn test_classify_status_codes() {
        assert!(matches!(
            classify(ureq::Error::StatusCode(404), "u"),
            PipelineError::NotFound(_)
        ));
        assert_eq!(
            classify(ureq::Error::StatusCode(429), "u"),
            PipelineError::RateLimited
        );
        assert_eq!(
            classify(ureq::Error::StatusCode(503), "u"),
            PipelineError::Upstream { status: 503 }
        );
    }
}
