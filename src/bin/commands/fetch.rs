use anyhow::Result;
use clap::{Args, Subcommand};
use matchgate::gateway::{
    Endpoint, GetMatch, GetMatchByTournamentCode, GetMatchIdsByTournamentCode, GetMatchTimeline,
    GetMatchlist, MatchGateway, MatchParams, MatchlistParams, TournamentCodeParams,
    TournamentMatchParams,
};
use matchgate::pipeline::PipelineResult;
use matchgate::query::{NOT_SUPPLIED_INT, NOT_SUPPLIED_LONG};

use super::print_json;

/// Arguments for the Fetch command
#[derive(Args)]
pub struct FetchArgs {
    /// Print the query descriptor instead of fetching
    #[clap(long)]
    pub dry_run: bool,

    /// Pretty-print JSON output
    #[clap(long)]
    pub pretty: bool,

    #[clap(subcommand)]
    pub target: FetchTarget,
}

#[derive(Subcommand)]
pub enum FetchTarget {
    /// Get a match by match id
    Match {
        match_id: i64,

        /// Platform tag, e.g. NA1; the configured default is used when omitted
        #[clap(short, long)]
        platform: Option<String>,
    },

    /// Get a match by match id and tournament code
    TournamentMatch {
        match_id: i64,

        tournament_code: String,

        /// Platform tag, e.g. NA1; the configured default is used when omitted
        #[clap(short, long)]
        platform: Option<String>,
    },

    /// Get the match ids of a tournament code
    TournamentIds {
        tournament_code: String,

        /// Platform tag, e.g. NA1; the configured default is used when omitted
        #[clap(short, long)]
        platform: Option<String>,
    },

    /// Get the matchlist of an account
    Matchlist {
        account_id: String,

        /// Platform tag, e.g. NA1; the configured default is used when omitted
        #[clap(short, long)]
        platform: Option<String>,

        /// Queue ids, comma separated; `--queue` alone filters on an empty set
        #[clap(long, num_args = 0.., value_delimiter = ',')]
        queue: Option<Vec<i32>>,

        /// Season ids, comma separated
        #[clap(long, num_args = 0.., value_delimiter = ',')]
        season: Option<Vec<i32>>,

        /// Champion ids, comma separated
        #[clap(long, num_args = 0.., value_delimiter = ',')]
        champion: Option<Vec<i32>>,

        /// Begin time in epoch milliseconds
        #[clap(long, default_value_t = NOT_SUPPLIED_LONG, allow_negative_numbers = true)]
        begin_time: i64,

        /// End time in epoch milliseconds
        #[clap(long, default_value_t = NOT_SUPPLIED_LONG, allow_negative_numbers = true)]
        end_time: i64,

        /// Index of the first match to return
        #[clap(long, default_value_t = NOT_SUPPLIED_INT, allow_negative_numbers = true)]
        begin_index: i32,

        /// Index after the last match to return
        #[clap(long, default_value_t = NOT_SUPPLIED_INT, allow_negative_numbers = true)]
        end_index: i32,
    },

    /// Get the timeline of a match
    Timeline {
        match_id: i64,

        /// Platform tag, e.g. NA1; the configured default is used when omitted
        #[clap(short, long)]
        platform: Option<String>,
    },
}

async fn execute<E: Endpoint>(
    gateway: &MatchGateway,
    params: E::Params,
    dry_run: bool,
    pretty: bool,
) -> Result<()> {
    if dry_run {
        let query = gateway.describe::<E>(&params)?;
        println!("{} {}", <E::Output as PipelineResult>::KIND, query);
        return Ok(());
    }

    tracing::info!("fetching {}", E::NAME);
    let output = gateway.dispatch::<E>(params).await?;
    print_json(&output, pretty)
}

pub async fn run(gateway: &MatchGateway, args: FetchArgs) -> Result<()> {
    let FetchArgs {
        dry_run,
        pretty,
        target,
    } = args;

    match target {
        FetchTarget::Match { match_id, platform } => {
            let params = MatchParams { platform, match_id };
            execute::<GetMatch>(gateway, params, dry_run, pretty).await
        }
        FetchTarget::TournamentMatch {
            match_id,
            tournament_code,
            platform,
        } => {
            let params = TournamentMatchParams {
                platform,
                match_id,
                tournament_code,
            };
            execute::<GetMatchByTournamentCode>(gateway, params, dry_run, pretty).await
        }
        FetchTarget::TournamentIds {
            tournament_code,
            platform,
        } => {
            let params = TournamentCodeParams {
                platform,
                tournament_code,
            };
            execute::<GetMatchIdsByTournamentCode>(gateway, params, dry_run, pretty).await
        }
        FetchTarget::Matchlist {
            account_id,
            platform,
            queue,
            season,
            champion,
            begin_time,
            end_time,
            begin_index,
            end_index,
        } => {
            let params = MatchlistParams {
                platform,
                account_id,
                queue: queue.map(|v| v.into_iter().collect()),
                end_time,
                begin_index,
                begin_time,
                season: season.map(|v| v.into_iter().collect()),
                champion: champion.map(|v| v.into_iter().collect()),
                end_index,
            };
            execute::<GetMatchlist>(gateway, params, dry_run, pretty).await
        }
        FetchTarget::Timeline { match_id, platform } => {
            let params = MatchParams { platform, match_id };
            execute::<GetMatchTimeline>(gateway, params, dry_run, pretty).await
        }
    }
}
