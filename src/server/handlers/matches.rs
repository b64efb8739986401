//! Match route handlers
//!
//! One generic handler serves every [`Endpoint`]: it parses the path and
//! query into `E::Params`, dispatches through the shared gateway and returns
//! the typed result as JSON.

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::{
    Endpoint, MatchParams, MatchlistParams, TournamentCodeParams, TournamentMatchParams,
};
use crate::query::{NOT_SUPPLIED_INT, NOT_SUPPLIED_LONG};
use crate::server::query::{PathParams, QueryPairs};
use crate::server::ServerState;
use axum::extract::{Path, RawQuery, State};
use axum::Json;
use std::collections::HashMap;

/// Endpoint parameters that can be read from an HTTP request
pub trait HttpParams: Sized {
    fn from_http(path: &PathParams, query: &QueryPairs) -> GatewayResult<Self>;
}

impl HttpParams for MatchParams {
    fn from_http(path: &PathParams, query: &QueryPairs) -> GatewayResult<Self> {
        Ok(MatchParams {
            platform: query.platform(),
            match_id: path.number("match_id")?,
        })
    }
}

impl HttpParams for TournamentMatchParams {
    fn from_http(path: &PathParams, query: &QueryPairs) -> GatewayResult<Self> {
        Ok(TournamentMatchParams {
            platform: query.platform(),
            match_id: path.number("match_id")?,
            tournament_code: path.text("tournament_code"),
        })
    }
}

impl HttpParams for TournamentCodeParams {
    fn from_http(path: &PathParams, query: &QueryPairs) -> GatewayResult<Self> {
        Ok(TournamentCodeParams {
            platform: query.platform(),
            tournament_code: path.text("tournament_code"),
        })
    }
}

impl HttpParams for MatchlistParams {
    fn from_http(path: &PathParams, query: &QueryPairs) -> GatewayResult<Self> {
        Ok(MatchlistParams {
            platform: query.platform(),
            account_id: path.text("account_id"),
            queue: query.int_set("queue")?,
            end_time: query.number_or("endTime", NOT_SUPPLIED_LONG)?,
            begin_index: query.number_or("beginIndex", NOT_SUPPLIED_INT)?,
            begin_time: query.number_or("beginTime", NOT_SUPPLIED_LONG)?,
            season: query.int_set("season")?,
            champion: query.int_set("champion")?,
            end_index: query.number_or("endIndex", NOT_SUPPLIED_INT)?,
        })
    }
}

/// Serve endpoint `E`
pub async fn handle<E>(
    State(state): State<ServerState>,
    Path(path): Path<HashMap<String, String>>,
    RawQuery(query): RawQuery,
) -> Result<Json<E::Output>, GatewayError>
where
    E: Endpoint,
    E::Params: HttpParams,
{
    let path = PathParams::new(path);
    let query = QueryPairs::parse(query.as_deref());
    let params = E::Params::from_http(&path, &query)?;

    tracing::debug!("dispatching {}", E::NAME);
    let output = state.gateway.dispatch::<E>(params).await?;
    Ok(Json(output))
}
