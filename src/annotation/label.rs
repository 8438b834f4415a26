use crate::types::{Interval, IntervalTier};

pub const DEFAULT_WORD_FORM_TIER_NAME: &str = "Lemmas";

/// Split a composite `word_TAG word_TAG` label into its word form or tags.
///
/// The label is split on `_`, then every piece on ` `, giving the flat
/// sequence `word, tag, word, tag, ...`. Words are joined with `""`
/// (`"is_VB n't_RB"` -> `"isn't"`), tags with `" "` (`"VB RB"`).
pub fn split_label(label: &str, extract_tag: bool) -> String {
    let parity = usize::from(extract_tag);
    let separator = if extract_tag { " " } else { "" };
    label
        .split('_')
        .flat_map(|piece| piece.split(' '))
        .enumerate()
        .filter(|(i, _)| i % 2 == parity)
        .map(|(_, part)| part)
        .collect::<Vec<_>>()
        .join(separator)
}

pub fn word_form(label: &str) -> String {
    split_label(label, false)
}

pub fn tag_projection(label: &str) -> String {
    split_label(label, true)
}

pub fn compose_pair(word: &str, tag: &str) -> String {
    format!("{word}_{tag}")
}

pub fn lowercase_intervals(intervals: &[Interval]) -> Vec<Interval> {
    intervals
        .iter()
        .map(|interval| interval.with_label(interval.label.to_lowercase()))
        .collect()
}

/// All labels joined with single spaces, empty labels included.
pub fn labels_to_text(intervals: &[Interval]) -> String {
    intervals
        .iter()
        .map(|interval| interval.label.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replace every composite label of a POS tier with its word form.
pub fn word_form_tier(pos_tier: &IntervalTier, name: &str) -> IntervalTier {
    let intervals = pos_tier
        .intervals
        .iter()
        .map(|interval| interval.with_label(word_form(&interval.label)))
        .collect();
    pos_tier.derive(name, intervals)
}
