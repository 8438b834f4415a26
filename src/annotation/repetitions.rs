use std::collections::{HashMap, HashSet, VecDeque};

use crate::annotation::label::word_form;
use crate::types::{Interval, IntervalTier};

pub const DEFAULT_MAX_CACHE: usize = 100;
pub const DEFAULT_REPETITIONS_TIER_NAME: &str = "Repetitions";
pub const DEFAULT_FREQDIST_TIER_NAME: &str = "FreqDist";

/// Entries that are neither scored nor counted: empty labels, and labels
/// whose full text or word form is in `ignore`.
pub fn is_ignored(label: &str, ignore: &HashSet<String>) -> bool {
    label.is_empty() || ignore.contains(label) || ignore.contains(&word_form(label))
}

/// Reciprocal distance to the previous occurrence of each label.
///
/// The recency cache is most-recent-first and holds at most `max_cache`
/// labels, the current one included, so the largest distance that can score
/// is `max_cache - 1`. Ignored entries pass through with their label and do
/// not take a slot in the cache.
pub fn score_repetitions(
    intervals: &[Interval],
    max_cache: usize,
    ignore: &HashSet<String>,
) -> Vec<Interval> {
    let mut cache: VecDeque<&str> =
        VecDeque::with_capacity(max_cache.min(intervals.len()).saturating_add(1));
    let mut scored = Vec::with_capacity(intervals.len());

    for interval in intervals {
        if is_ignored(&interval.label, ignore) {
            scored.push(interval.clone());
            continue;
        }

        cache.push_front(&interval.label);
        if cache.len() > max_cache {
            cache.pop_back();
        }

        let score = previous_occurrence(&cache, &interval.label)
            .map(|distance| format_score(1.0 / distance as f64))
            .unwrap_or_else(|| "0".to_string());
        scored.push(interval.with_label(score));
    }
    scored
}

/// Distance (>= 1) from the front of the cache to the prior copy of `label`.
fn previous_occurrence(cache: &VecDeque<&str>, label: &str) -> Option<usize> {
    cache
        .iter()
        .skip(1)
        .position(|&cached| cached == label)
        .map(|offset| offset + 1)
}

/// Relative frequency of each label among the non-ignored labels.
///
/// Keys are whole composite labels: `run_VB` and `run_NN` count separately.
pub fn score_freqdist(intervals: &[Interval], ignore: &HashSet<String>) -> Vec<Interval> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut total = 0usize;
    for interval in intervals {
        if is_ignored(&interval.label, ignore) {
            continue;
        }
        *counts.entry(interval.label.as_str()).or_default() += 1;
        total += 1;
    }

    intervals
        .iter()
        .map(|interval| {
            if is_ignored(&interval.label, ignore) {
                return interval.clone();
            }
            let count = counts.get(interval.label.as_str()).copied().unwrap_or(0);
            interval.with_label(format_score(count as f64 / total as f64))
        })
        .collect()
}

pub fn repetitions_tier(
    pos_tier: &IntervalTier,
    max_cache: usize,
    ignore: &HashSet<String>,
    name: &str,
) -> IntervalTier {
    pos_tier.derive(name, score_repetitions(&pos_tier.intervals, max_cache, ignore))
}

pub fn freqdist_tier(pos_tier: &IntervalTier, ignore: &HashSet<String>, name: &str) -> IntervalTier {
    pos_tier.derive(name, score_freqdist(&pos_tier.intervals, ignore))
}

/// Shortest round-trip decimal, always with a fractional part or an
/// exponent: `1.0`, `0.5`, `0.6666666666666666`, `1e-05`.
///
/// Exponents are sign-prefixed and at least two digits wide.
pub fn format_score(value: f64) -> String {
    let repr = format!("{value:?}");
    let Some((mantissa, exponent)) = repr.split_once('e') else {
        return repr;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}
