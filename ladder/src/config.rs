use std::env;

use anyhow::Context;

use crate::app::rating_config::{municipal_vp_table, DEFAULT_BASE_VP, DEFAULT_INITIAL_RATING};
use crate::domain::entities::{RatingSystemConfig, VpTable, MAX_VP};

#[derive(Debug, Clone)]
pub struct Config {
    pub rating: RatingSystemConfig,
    /// Starting rating for players registered without one
    pub default_rating: i32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup (the process environment in
    /// production, a map in tests)
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vp_table = match lookup("LADDER_VP_TABLE") {
            Some(raw) => serde_json::from_str::<VpTable>(&raw)
                .context("LADDER_VP_TABLE must be a JSON array of {min_delta, max_delta, vp}")?,
            None => municipal_vp_table(),
        };
        if let Err(err) = vp_table.validate() {
            tracing::warn!(error = %err, "Configured VP table is malformed, base VP will be used");
        }

        let base_vp = match lookup("LADDER_BASE_VP") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("LADDER_BASE_VP must be a positive integer, got {raw:?}"))?,
            None => DEFAULT_BASE_VP,
        };
        if base_vp > MAX_VP {
            anyhow::bail!("LADDER_BASE_VP must be at most {MAX_VP}, got {base_vp}");
        }

        let zero_sum_check = match lookup("LADDER_ZERO_SUM_CHECK") {
            Some(raw) => raw
                .trim()
                .parse::<bool>()
                .with_context(|| format!("LADDER_ZERO_SUM_CHECK must be true or false, got {raw:?}"))?,
            None => true,
        };

        let default_rating = match lookup("LADDER_DEFAULT_RATING") {
            Some(raw) => raw
                .trim()
                .parse::<i32>()
                .with_context(|| format!("LADDER_DEFAULT_RATING must be an integer, got {raw:?}"))?,
            None => DEFAULT_INITIAL_RATING,
        };

        Ok(Self {
            rating: RatingSystemConfig {
                vp_table,
                base_vp,
                zero_sum_check,
            },
            default_rating,
        })
    }
}
