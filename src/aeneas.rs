use serde::Deserialize;

use crate::annotation::validity::force_validity;
use crate::error::FluencyError;
use crate::types::{Interval, IntervalTier};

pub const DEFAULT_AENEAS_TIER_NAME: &str = "Words";

#[derive(Debug, Deserialize)]
struct SyncMap {
    fragments: Vec<Fragment>,
}

/// aeneas writes `begin`/`end` as decimal strings.
#[derive(Debug, Deserialize)]
struct Fragment {
    begin: String,
    end: String,
    #[serde(default)]
    lines: Vec<String>,
}

pub fn aeneas_tier_from_json(
    json: &str,
    name: &str,
    force_valid: bool,
) -> Result<IntervalTier, FluencyError> {
    let sync_map: SyncMap =
        serde_json::from_str(json).map_err(|e| FluencyError::json("parse aeneas sync map", e))?;

    let mut intervals = sync_map
        .fragments
        .into_iter()
        .map(|fragment| {
            Ok(Interval::new(
                parse_seconds(&fragment.begin)?,
                parse_seconds(&fragment.end)?,
                fragment.lines.join(" "),
            ))
        })
        .collect::<Result<Vec<_>, FluencyError>>()?;

    if force_valid {
        intervals = force_validity(intervals);
    }
    let max_timestamp = intervals.iter().map(|i| i.end).fold(0.0, f64::max);
    Ok(IntervalTier::new(name, 0.0, max_timestamp, intervals))
}

/// Whether `json` is an aeneas sync map, i.e. an object with `fragments`.
///
/// Lexicons and configs often share a directory with sync maps.
pub fn is_sync_map(json: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(json)
        .map(|value| value.get("fragments").is_some_and(serde_json::Value::is_array))
        .unwrap_or(false)
}

fn parse_seconds(raw: &str) -> Result<f64, FluencyError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|err| FluencyError::invalid_input(format!("bad fragment time {raw:?}: {err}")))
}
