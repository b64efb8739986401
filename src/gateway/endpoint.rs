//! Match endpoints
//!
//! Each endpoint is a zero-sized type implementing [`Endpoint`]: it names its
//! route, its parameter type, the result type it is statically bound to, and
//! the ordered field specs its descriptor is built from. The platform field is
//! always added first by the gateway and is not part of [`Endpoint::fields`].

use crate::gateway::types::{Match, MatchTimeline, Matchlist, TournamentMatches};
use crate::pipeline::PipelineResult;
use crate::query::{FieldSpec, NOT_SUPPLIED_INT, NOT_SUPPLIED_LONG};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Static description of one gateway endpoint
pub trait Endpoint: Send + Sync + 'static {
    /// Endpoint name, e.g. `match.get-match`
    const NAME: &'static str;

    /// Route below `/match/v4`, in axum path syntax
    const PATH: &'static str;

    /// Parsed request parameters
    type Params: Send + Sync + 'static;

    /// Result type requested from the pipeline
    type Output: PipelineResult;

    /// Raw platform tag supplied by the caller
    fn platform_tag(params: &Self::Params) -> Option<&str>;

    /// Field specs following `platform`, in insertion order
    fn fields(params: &Self::Params) -> Vec<FieldSpec>;
}

// =============================================================================
// Parameters
// =============================================================================

/// Parameters of endpoints addressed by match id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchParams {
    #[serde(default)]
    pub platform: Option<String>,
    pub match_id: i64,
}

impl MatchParams {
    pub fn new(match_id: i64) -> Self {
        Self {
            platform: None,
            match_id,
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }
}

/// Parameters of get-match-by-tournament-code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentMatchParams {
    #[serde(default)]
    pub platform: Option<String>,
    pub match_id: i64,
    pub tournament_code: String,
}

impl TournamentMatchParams {
    pub fn new(match_id: i64, tournament_code: impl Into<String>) -> Self {
        Self {
            platform: None,
            match_id,
            tournament_code: tournament_code.into(),
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }
}

/// Parameters of get-match-ids-by-tournament-code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentCodeParams {
    #[serde(default)]
    pub platform: Option<String>,
    pub tournament_code: String,
}

impl TournamentCodeParams {
    pub fn new(tournament_code: impl Into<String>) -> Self {
        Self {
            platform: None,
            tournament_code: tournament_code.into(),
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }
}

/// Parameters of get-matchlist-by-account
///
/// Scalar filters use `-1` for "not supplied"; set filters use `None`. An
/// empty set is a real filter and is forwarded as such.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchlistParams {
    #[serde(default)]
    pub platform: Option<String>,
    pub account_id: String,
    #[serde(default)]
    pub queue: Option<BTreeSet<i32>>,
    #[serde(default = "not_supplied_long")]
    pub end_time: i64,
    #[serde(default = "not_supplied_int")]
    pub begin_index: i32,
    #[serde(default = "not_supplied_long")]
    pub begin_time: i64,
    #[serde(default)]
    pub season: Option<BTreeSet<i32>>,
    #[serde(default)]
    pub champion: Option<BTreeSet<i32>>,
    #[serde(default = "not_supplied_int")]
    pub end_index: i32,
}

fn not_supplied_int() -> i32 {
    NOT_SUPPLIED_INT
}

fn not_supplied_long() -> i64 {
    NOT_SUPPLIED_LONG
}

impl Default for MatchlistParams {
    fn default() -> Self {
        Self {
            platform: None,
            account_id: String::new(),
            queue: None,
            end_time: NOT_SUPPLIED_LONG,
            begin_index: NOT_SUPPLIED_INT,
            begin_time: NOT_SUPPLIED_LONG,
            season: None,
            champion: None,
            end_index: NOT_SUPPLIED_INT,
        }
    }
}

impl MatchlistParams {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            ..Default::default()
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn with_queues(mut self, queues: impl IntoIterator<Item = i32>) -> Self {
        self.queue = Some(queues.into_iter().collect());
        self
    }

    pub fn with_seasons(mut self, seasons: impl IntoIterator<Item = i32>) -> Self {
        self.season = Some(seasons.into_iter().collect());
        self
    }

    pub fn with_champions(mut self, champions: impl IntoIterator<Item = i32>) -> Self {
        self.champion = Some(champions.into_iter().collect());
        self
    }

    pub fn with_time_range(mut self, begin_time: i64, end_time: i64) -> Self {
        self.begin_time = begin_time;
        self.end_time = end_time;
        self
    }

    pub fn with_index_range(mut self, begin_index: i32, end_index: i32) -> Self {
        self.begin_index = begin_index;
        self.end_index = end_index;
        self
    }
}

// =============================================================================
// Endpoints
// =============================================================================

/// GET /match/v4/matches/{matchId}
pub struct GetMatch;

impl Endpoint for GetMatch {
    const NAME: &'static str = "match.get-match";
    const PATH: &'static str = "/matches/:match_id";

    type Params = MatchParams;
    type Output = Match;

    fn platform_tag(params: &Self::Params) -> Option<&str> {
        params.platform.as_deref()
    }

    fn fields(params: &Self::Params) -> Vec<FieldSpec> {
        vec![FieldSpec::required("matchId", params.match_id)]
    }
}

/// GET /match/v4/matches/{matchId}/by-tournament-code/{tournamentCode}
pub struct GetMatchByTournamentCode;

impl Endpoint for GetMatchByTournamentCode {
    const NAME: &'static str = "match.get-match-by-tournament-code";
    const PATH: &'static str = "/matches/:match_id/by-tournament-code/:tournament_code";

    type Params = TournamentMatchParams;
    type Output = Match;

    fn platform_tag(params: &Self::Params) -> Option<&str> {
        params.platform.as_deref()
    }

    fn fields(params: &Self::Params) -> Vec<FieldSpec> {
        vec![
            FieldSpec::required("matchId", params.match_id),
            FieldSpec::required("tournamentCode", params.tournament_code.as_str()),
        ]
    }
}

/// GET /match/v4/matches/by-tournament-code/{tournamentCode}/ids
pub struct GetMatchIdsByTournamentCode;

impl Endpoint for GetMatchIdsByTournamentCode {
    const NAME: &'static str = "match.get-match-ids-by-tournament-code";
    const PATH: &'static str = "/matches/by-tournament-code/:tournament_code/ids";

    type Params = TournamentCodeParams;
    type Output = TournamentMatches;

    fn platform_tag(params: &Self::Params) -> Option<&str> {
        params.platform.as_deref()
    }

    fn fields(params: &Self::Params) -> Vec<FieldSpec> {
        vec![FieldSpec::required(
            "tournamentCode",
            params.tournament_code.as_str(),
        )]
    }
}

/// GET /match/v4/matchlists/by-account/{accountId}
pub struct GetMatchlist;

impl Endpoint for GetMatchlist {
    const NAME: &'static str = "match.get-matchlist";
    const PATH: &'static str = "/matchlists/by-account/:account_id";

    type Params = MatchlistParams;
    type Output = Matchlist;

    fn platform_tag(params: &Self::Params) -> Option<&str> {
        params.platform.as_deref()
    }

    fn fields(params: &Self::Params) -> Vec<FieldSpec> {
        vec![
            FieldSpec::required("accountId", params.account_id.as_str()),
            FieldSpec::int_set("queues", params.queue.clone()),
            FieldSpec::long("endTime", params.end_time, NOT_SUPPLIED_LONG),
            FieldSpec::int("beginIndex", params.begin_index, NOT_SUPPLIED_INT),
            FieldSpec::long("beginTime", params.begin_time, NOT_SUPPLIED_LONG),
            FieldSpec::int_set("seasons", params.season.clone()),
            FieldSpec::int_set("champions", params.champion.clone()),
            FieldSpec::int("endIndex", params.end_index, NOT_SUPPLIED_INT),
        ]
    }
}

/// GET /match/v4/timelines/by-match/{matchId}
pub struct GetMatchTimeline;

impl Endpoint for GetMatchTimeline {
    const NAME: &'static str = "match.get-match-timeline";
    const PATH: &'static str = "/timelines/by-match/:match_id";

    type Params = MatchParams;
    type Output = MatchTimeline;

    fn platform_tag(params: &Self::Params) -> Option<&str> {
        params.platform.as_deref()
    }

    fn fields(params: &Self::Params) -> Vec<FieldSpec> {
        vec![FieldSpec::required("matchId", params.match_id)]
    }
}
