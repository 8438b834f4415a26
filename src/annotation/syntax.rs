use std::collections::HashSet;

use crate::annotation::label::tag_projection;
use crate::error::FluencyError;
use crate::grid::{AnyTier, TextGridDocument};
use crate::types::{IntervalTier, Point, PointTier};

pub const CLAUSE_TIER_NAME: &str = "Syntactic Clauses";
pub const PHRASE_TIER_NAME: &str = "Syntactic Phrases";

/// Fail on the first tag outside `valid_tags`.
pub fn validate_tags(pos_tier: &IntervalTier, valid_tags: &HashSet<String>) -> Result<(), FluencyError> {
    for interval in pos_tier.intervals.iter().filter(|i| !i.is_empty()) {
        let tags = tag_projection(&interval.label);
        if let Some(unknown) = tags.split(' ').find(|tag| !valid_tags.contains(*tag)) {
            return Err(FluencyError::InvalidTag {
                tag: unknown.to_string(),
                label: interval.label.clone(),
            });
        }
    }
    Ok(())
}

/// Clause and phrase markers at the midpoints of POS intervals.
///
/// Clauses: any tag of the label is in `clause_tags ∪ phrase_tags`.
/// Phrases: the label's whole tag projection is exactly one phrase tag, so a
/// multi-tag label such as `VBZ RB` marks a clause but never a phrase.
pub fn mark_syntax(
    pos_tier: &IntervalTier,
    clause_tags: &HashSet<String>,
    phrase_tags: &HashSet<String>,
    valid_tags: &HashSet<String>,
) -> Result<(PointTier, PointTier), FluencyError> {
    validate_tags(pos_tier, valid_tags)?;

    let mut clauses = Vec::new();
    let mut phrases = Vec::new();
    for interval in pos_tier.intervals.iter().filter(|i| !i.is_empty()) {
        let tags = tag_projection(&interval.label);
        if tags
            .split(' ')
            .any(|tag| clause_tags.contains(tag) || phrase_tags.contains(tag))
        {
            clauses.push(Point::new(interval.midpoint(), ""));
        }
        if phrase_tags.contains(&tags) {
            phrases.push(Point::new(interval.midpoint(), ""));
        }
    }

    tracing::debug!(
        tier = %pos_tier.name,
        clauses = clauses.len(),
        phrases = phrases.len(),
        "marked syntax"
    );

    let bounds = (pos_tier.min_timestamp, pos_tier.max_timestamp);
    Ok((
        PointTier::new(CLAUSE_TIER_NAME, bounds.0, bounds.1, clauses),
        PointTier::new(PHRASE_TIER_NAME, bounds.0, bounds.1, phrases),
    ))
}

/// Both syntax tiers in one document bounded like the POS tier.
pub fn syntax_grid(
    pos_tier: &IntervalTier,
    clause_tags: &HashSet<String>,
    phrase_tags: &HashSet<String>,
    valid_tags: &HashSet<String>,
) -> Result<TextGridDocument, FluencyError> {
    let (clauses, phrases) = mark_syntax(pos_tier, clause_tags, phrase_tags, valid_tags)?;
    Ok(TextGridDocument {
        min_timestamp: pos_tier.min_timestamp,
        max_timestamp: pos_tier.max_timestamp,
        tiers: vec![AnyTier::Point(clauses), AnyTier::Point(phrases)],
    })
}
