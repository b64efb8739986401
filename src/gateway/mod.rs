//! Dispatch gateway for the match endpoints
//!
//! [`MatchGateway`] turns endpoint parameters into a single typed retrieval:
//!
//! 1. resolve the platform tag (fails fast, before any descriptor exists)
//! 2. build the query descriptor from the endpoint's declared fields
//! 3. ask the retrieval pipeline for the endpoint's result kind
//! 4. hand the result back untouched
//!
//! The gateway holds no mutable state, never retries and never caches. One
//! call makes at most one pipeline request.
//!
//! # Example
//!
//! ```rust,ignore
//! use matchgate::gateway::{MatchGateway, MatchlistParams};
//!
//! let gateway = MatchGateway::new(registry, pipeline);
//! let params = MatchlistParams::new("ABC").with_queues([400, 420]);
//! let matchlist = gateway.get_matchlist(params).await?;
//! ```

pub mod endpoint;
pub mod types;

pub use endpoint::{
    Endpoint, GetMatch, GetMatchByTournamentCode, GetMatchIdsByTournamentCode, GetMatchTimeline,
    GetMatchlist, MatchParams, MatchlistParams, TournamentCodeParams, TournamentMatchParams,
};
pub use types::{Match, MatchReference, MatchTimeline, Matchlist, TournamentMatches};

use crate::error::GatewayResult;
use crate::pipeline::{self, RetrievalPipeline};
use crate::platform::{resolve_platform, PlatformRegistry};
use crate::query::{FieldSpec, QueryDescriptor};
use std::sync::Arc;

/// Gateway binding the platform registry to a retrieval pipeline
#[derive(Clone)]
pub struct MatchGateway {
    registry: Arc<dyn PlatformRegistry>,
    pipeline: Arc<dyn RetrievalPipeline>,
}

impl MatchGateway {
    pub fn new(registry: Arc<dyn PlatformRegistry>, pipeline: Arc<dyn RetrievalPipeline>) -> Self {
        Self { registry, pipeline }
    }

    pub fn registry(&self) -> &Arc<dyn PlatformRegistry> {
        &self.registry
    }

    /// Resolve the platform and build the descriptor for `E`, without fetching
    pub fn describe<E: Endpoint>(&self, params: &E::Params) -> GatewayResult<QueryDescriptor> {
        let platform = resolve_platform(self.registry.as_ref(), E::platform_tag(params))?;

        let mut specs = vec![FieldSpec::required("platform", platform)];
        specs.extend(E::fields(params));

        Ok(QueryDescriptor::build(specs)?)
    }

    /// Run endpoint `E` end to end
    pub async fn dispatch<E: Endpoint>(&self, params: E::Params) -> GatewayResult<E::Output> {
        let query = self.describe::<E>(&params)?;
        let result = pipeline::get::<E::Output>(self.pipeline.as_ref(), &query).await?;
        Ok(result)
    }

    pub async fn get_match(&self, params: MatchParams) -> GatewayResult<Match> {
        self.dispatch::<GetMatch>(params).await
    }

    pub async fn get_match_by_tournament_code(
        &self,
        params: TournamentMatchParams,
    ) -> GatewayResult<Match> {
        self.dispatch::<GetMatchByTournamentCode>(params).await
    }

    pub async fn get_match_ids_by_tournament_code(
        &self,
        params: TournamentCodeParams,
    ) -> GatewayResult<TournamentMatches> {
        self.dispatch::<GetMatchIdsByTournamentCode>(params).await
    }

    pub async fn get_matchlist(&self, params: MatchlistParams) -> GatewayResult<Matchlist> {
        self.dispatch::<GetMatchlist>(params).await
    }

    pub async fn get_match_timeline(&self, params: MatchParams) -> GatewayResult<MatchTimeline> {
        self.dispatch::<GetMatchTimeline>(params).await
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use crate::pipeline::testing::RecordingPipeline;
    use crate::pipeline::{PipelineError, ResultKind};
    use crate::platform::{Platform, StaticPlatformRegistry};
    use crate::query::QueryValue;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn gateway_with(
        default: Option<Platform>,
        pipeline: RecordingPipeline,
    ) -> (MatchGateway, Arc<RecordingPipeline>) {
        let pipeline = Arc::new(pipeline);
        let gateway = MatchGateway::new(
            Arc::new(StaticPlatformRegistry::new(default)),
            pipeline.clone(),
        );
        (gateway, pipeline)
    }

    #[tokio::test]
    async fn test_get_match_with_platform() {
        let (gateway, pipeline) = gateway_with(
            Some(Platform::Korea),
            RecordingPipeline::new().respond(ResultKind::Match, json!({"gameId": 123})),
        );

        let result = gateway
            .get_match(MatchParams::new(123).with_platform("NA1"))
            .await
            .unwrap();
        assert_eq!(result.game_id(), Some(123));

        let calls = pipeline.calls();
        assert_eq!(calls.len(), 1);
        let (kind, query) = &calls[0];
        assert_eq!(*kind, ResultKind::Match);
        assert_eq!(query.keys().collect::<Vec<_>>(), vec!["platform", "matchId"]);
        assert_eq!(query.platform(), Some(Platform::NorthAmerica));
        assert_eq!(query.get("matchId"), Some(&QueryValue::Long(123)));
    }

    #[tokio::test]
    async fn test_matchlist_with_partial_filters() {
        let (gateway, pipeline) = gateway_with(
            Some(Platform::EuropeWest),
            RecordingPipeline::new().respond(ResultKind::Matchlist, json!({"matches": []})),
        );

        let params = MatchlistParams {
            begin_index: 5,
            ..MatchlistParams::new("ABC").with_queues([400, 420])
        };
        gateway.get_matchlist(params).await.unwrap();

        let (kind, query) = pipeline.calls().remove(0);
        assert_eq!(kind, ResultKind::Matchlist);
        assert_eq!(
            query.keys().collect::<Vec<_>>(),
            vec!["platform", "accountId", "queues", "beginIndex"]
        );
        assert_eq!(query.platform(), Some(Platform::EuropeWest));
        assert_eq!(query.get("accountId"), Some(&QueryValue::Text("ABC".into())));
        assert_eq!(
            query.get("queues"),
            Some(&QueryValue::IntSet([400, 420].into_iter().collect()))
        );
        assert_eq!(query.get("beginIndex"), Some(&QueryValue::Int(5)));
        for absent in ["endTime", "beginTime", "seasons", "champions", "endIndex"] {
            assert!(!query.contains(absent), "{} should be absent", absent);
        }
    }

    #[tokio::test]
    async fn test_matchlist_with_every_filter() {
        let (gateway, pipeline) = gateway_with(
            Some(Platform::NorthAmerica),
            RecordingPipeline::new().respond(ResultKind::Matchlist, json!({"matches": []})),
        );

        let params = MatchlistParams::new("ABC")
            .with_queues([420])
            .with_seasons([13])
            .with_champions(Vec::<i32>::new())
            .with_time_range(100, 200)
            .with_index_range(0, 50);
        gateway.get_matchlist(params).await.unwrap();

        let (_, query) = pipeline.calls().remove(0);
        assert_eq!(
            query.keys().collect::<Vec<_>>(),
            vec![
                "platform",
                "accountId",
                "queues",
                "endTime",
                "beginIndex",
                "beginTime",
                "seasons",
                "champions",
                "endIndex"
            ]
        );
        assert_eq!(
            query.get("champions"),
            Some(&QueryValue::IntSet(BTreeSet::new()))
        );
        assert_eq!(query.get("beginIndex"), Some(&QueryValue::Int(0)));
    }

    #[tokio::test]
    async fn test_unknown_platform_never_reaches_pipeline() {
        let (gateway, pipeline) = gateway_with(Some(Platform::NorthAmerica), RecordingPipeline::new());

        let err = gateway
            .get_match(MatchParams::new(1).with_platform("ZZZ"))
            .await
            .unwrap_err();
        match err {
            GatewayError::InvalidPlatform { tag } => assert_eq!(tag.as_deref(), Some("ZZZ")),
            other => panic!("unexpected error: {:?}", other),
        }

        let err = gateway
            .describe::<GetMatchlist>(&MatchlistParams::new("ABC").with_platform("ZZZ"))
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidPlatform { .. }));
        assert!(pipeline.calls().is_empty());
    }

    #[tokio::test]
    async fn test_timeline_uses_default_platform() {
        let (gateway, pipeline) = gateway_with(
            Some(Platform::Oceania),
            RecordingPipeline::new().respond(ResultKind::MatchTimeline, json!({"frames": []})),
        );

        gateway
            .get_match_timeline(MatchParams::new(999))
            .await
            .unwrap();

        let (kind, query) = pipeline.calls().remove(0);
        assert_eq!(kind, ResultKind::MatchTimeline);
        assert_eq!(query.platform(), Some(Platform::Oceania));
        assert_eq!(query.get("matchId"), Some(&QueryValue::Long(999)));
    }

    #[tokio::test]
    async fn test_timeline_without_default_platform() {
        let (gateway, pipeline) = gateway_with(None, RecordingPipeline::new());

        let err = gateway
            .get_match_timeline(MatchParams::new(999))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidPlatform { tag: None }));
        assert!(pipeline.calls().is_empty());
    }

    #[tokio::test]
    async fn test_tournament_endpoints() {
        let (gateway, pipeline) = gateway_with(
            Some(Platform::NorthAmerica),
            RecordingPipeline::new()
                .respond(ResultKind::Match, json!({"gameId": 7}))
                .respond(ResultKind::TournamentMatches, json!([7, 8])),
        );

        let m = gateway
            .get_match_by_tournament_code(TournamentMatchParams::new(7, "NA-CODE"))
            .await
            .unwrap();
        assert_eq!(m.game_id(), Some(7));

        let ids = gateway
            .get_match_ids_by_tournament_code(TournamentCodeParams::new("NA-CODE"))
            .await
            .unwrap();
        assert_eq!(ids, TournamentMatches(vec![7, 8]));

        let calls = pipeline.calls();
        assert_eq!(
            calls[0].1.keys().collect::<Vec<_>>(),
            vec!["platform", "matchId", "tournamentCode"]
        );
        assert_eq!(calls[1].0, ResultKind::TournamentMatches);
        assert_eq!(
            calls[1].1.keys().collect::<Vec<_>>(),
            vec!["platform", "tournamentCode"]
        );
    }

    #[tokio::test]
    async fn test_blank_tournament_code_is_rejected() {
        let (gateway, pipeline) = gateway_with(Some(Platform::NorthAmerica), RecordingPipeline::new());

        let err = gateway
            .get_match_ids_by_tournament_code(TournamentCodeParams::new(""))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::MissingRequiredField("tournamentCode")
        ));
        assert!(pipeline.calls().is_empty());
    }

    #[tokio::test]
    async fn test_pipeline_errors_propagate_unchanged() {
        let (gateway, _) = gateway_with(
            Some(Platform::NorthAmerica),
            RecordingPipeline::new()
                .fail(ResultKind::Match, PipelineError::NotFound("match 1".into()))
                .fail(ResultKind::Matchlist, PipelineError::Timeout),
        );

        let err = gateway.get_match(MatchParams::new(1)).await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Pipeline(PipelineError::NotFound(_))
        ));

        let err = gateway
            .get_matchlist(MatchlistParams::new("ABC"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Pipeline(PipelineError::Timeout)));
    }

    #[test]
    fn test_describe_is_deterministic() {
        let (gateway, _) = gateway_with(Some(Platform::NorthAmerica), RecordingPipeline::new());
        let params = MatchlistParams::new("ABC")
            .with_seasons([11, 13])
            .with_index_range(0, -1);

        let first = gateway.describe::<GetMatchlist>(&params).unwrap();
        let second = gateway.describe::<GetMatchlist>(&params).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.keys().collect::<Vec<_>>(),
            vec!["platform", "accountId", "beginIndex", "seasons"]
        );
    }
}
