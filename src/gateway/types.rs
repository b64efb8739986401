//! Result types for the match endpoints
//!
//! Each result keeps the upstream JSON object exactly as it was received and
//! re-serializes it byte for byte in meaning: `null` fields stay `null` and
//! absent fields stay absent. Well-known fields of the match-v4 contract are
//! read through typed accessors.

use crate::pipeline::{PipelineResult, ResultKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn int(object: &Map<String, Value>, key: &str) -> Option<i64> {
    object.get(key).and_then(Value::as_i64)
}

fn text<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str)
}

/// A single match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Match(Map<String, Value>);

impl Match {
    pub fn game_id(&self) -> Option<i64> {
        int(&self.0, "gameId")
    }

    pub fn platform_id(&self) -> Option<&str> {
        text(&self.0, "platformId")
    }

    pub fn game_creation(&self) -> Option<i64> {
        int(&self.0, "gameCreation")
    }

    pub fn game_duration(&self) -> Option<i64> {
        int(&self.0, "gameDuration")
    }

    pub fn queue_id(&self) -> Option<i64> {
        int(&self.0, "queueId")
    }

    pub fn season_id(&self) -> Option<i64> {
        int(&self.0, "seasonId")
    }

    pub fn game_version(&self) -> Option<&str> {
        text(&self.0, "gameVersion")
    }

    pub fn game_mode(&self) -> Option<&str> {
        text(&self.0, "gameMode")
    }

    /// The untouched upstream object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl PipelineResult for Match {
    const KIND: ResultKind = ResultKind::Match;
}

/// One entry of an account's match history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchReference(Map<String, Value>);

impl MatchReference {
    pub fn game_id(&self) -> Option<i64> {
        int(&self.0, "gameId")
    }

    pub fn platform_id(&self) -> Option<&str> {
        text(&self.0, "platformId")
    }

    pub fn champion(&self) -> Option<i64> {
        int(&self.0, "champion")
    }

    pub fn queue(&self) -> Option<i64> {
        int(&self.0, "queue")
    }

    pub fn season(&self) -> Option<i64> {
        int(&self.0, "season")
    }

    pub fn timestamp(&self) -> Option<i64> {
        int(&self.0, "timestamp")
    }

    pub fn role(&self) -> Option<&str> {
        text(&self.0, "role")
    }

    pub fn lane(&self) -> Option<&str> {
        text(&self.0, "lane")
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// An account's match history page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matchlist(Map<String, Value>);

impl Matchlist {
    /// Entries of the `matches` array; objects only, in upstream order
    pub fn matches(&self) -> Vec<MatchReference> {
        self.0
            .get("matches")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(Value::as_object)
                    .map(|entry| MatchReference(entry.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn total_games(&self) -> Option<i64> {
        int(&self.0, "totalGames")
    }

    pub fn start_index(&self) -> Option<i64> {
        int(&self.0, "startIndex")
    }

    pub fn end_index(&self) -> Option<i64> {
        int(&self.0, "endIndex")
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl PipelineResult for Matchlist {
    const KIND: ResultKind = ResultKind::Matchlist;
}

/// Frame-by-frame timeline of a match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchTimeline(Map<String, Value>);

impl MatchTimeline {
    pub fn frames(&self) -> &[Value] {
        self.0
            .get("frames")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn frame_interval(&self) -> Option<i64> {
        int(&self.0, "frameInterval")
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl PipelineResult for MatchTimeline {
    const KIND: ResultKind = ResultKind::MatchTimeline;
}

/// Match ids played under a tournament code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TournamentMatches(pub Vec<i64>);

impl PipelineResult for TournamentMatches {
    const KIND: ResultKind = ResultKind::TournamentMatches;
}
