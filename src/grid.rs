use std::fs;
use std::path::Path;

use textgrid::{TextGrid, Tier, TierType};

use crate::error::FluencyError;
use crate::types::{Interval, IntervalTier, Point, PointTier};

#[derive(Debug, Clone, PartialEq)]
pub enum AnyTier {
    Interval(IntervalTier),
    Point(PointTier),
}

impl AnyTier {
    pub fn name(&self) -> &str {
        match self {
            Self::Interval(tier) => &tier.name,
            Self::Point(tier) => &tier.name,
        }
    }
}

/// In-memory TextGrid: global bounds plus ordered tiers.
#[derive(Debug, Clone, PartialEq)]
pub struct TextGridDocument {
    pub min_timestamp: f64,
    pub max_timestamp: f64,
    pub tiers: Vec<AnyTier>,
}

impl TextGridDocument {
    pub fn new(min_timestamp: f64, max_timestamp: f64) -> Self {
        Self {
            min_timestamp,
            max_timestamp,
            tiers: Vec::new(),
        }
    }

    /// Document bounded by the union of its tiers' bounds.
    pub fn from_interval_tiers(tiers: Vec<IntervalTier>) -> Self {
        let min_timestamp = tiers
            .iter()
            .map(|tier| tier.min_timestamp)
            .fold(f64::INFINITY, f64::min);
        let max_timestamp = tiers
            .iter()
            .map(|tier| tier.max_timestamp)
            .fold(f64::NEG_INFINITY, f64::max);
        Self {
            min_timestamp: if min_timestamp.is_finite() { min_timestamp } else { 0.0 },
            max_timestamp: if max_timestamp.is_finite() { max_timestamp } else { 0.0 },
            tiers: tiers.into_iter().map(AnyTier::Interval).collect(),
        }
    }

    pub fn push(&mut self, tier: AnyTier) {
        self.tiers.push(tier);
    }

    pub fn interval_tier(&self, name: &str) -> Result<&IntervalTier, FluencyError> {
        match self.tiers.iter().find(|tier| tier.name() == name) {
            Some(AnyTier::Interval(tier)) => Ok(tier),
            Some(AnyTier::Point(_)) => Err(FluencyError::invalid_input(format!(
                "tier '{name}' is a point tier, expected an interval tier"
            ))),
            None => Err(FluencyError::MissingTier {
                name: name.to_string(),
            }),
        }
    }

    pub fn point_tier(&self, name: &str) -> Option<&PointTier> {
        self.tiers.iter().find_map(|tier| match tier {
            AnyTier::Point(tier) if tier.name == name => Some(tier),
            _ => None,
        })
    }

    pub fn remove_tier(&mut self, name: &str) -> Option<AnyTier> {
        let index = self.tiers.iter().position(|tier| tier.name() == name)?;
        Some(self.tiers.remove(index))
    }
}

pub fn load_textgrid(path: &Path) -> Result<TextGridDocument, FluencyError> {
    let textgrid = TextGrid::from_file(path).map_err(|err| {
        FluencyError::textgrid("reading TextGrid", format!("{}: {err}", path.display()))
    })?;

    let tiers: Vec<AnyTier> = textgrid.tiers.into_iter().map(from_textgrid_tier).collect();
    let (min_timestamp, max_timestamp) = tiers.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), tier| {
            let (tier_min, tier_max) = match tier {
                AnyTier::Interval(t) => (t.min_timestamp, t.max_timestamp),
                AnyTier::Point(t) => (t.min_timestamp, t.max_timestamp),
            };
            (lo.min(tier_min), hi.max(tier_max))
        },
    );
    tracing::debug!(path = %path.display(), tiers = tiers.len(), "loaded TextGrid");

    Ok(TextGridDocument {
        min_timestamp: if min_timestamp.is_finite() { min_timestamp } else { 0.0 },
        max_timestamp: if max_timestamp.is_finite() { max_timestamp } else { 0.0 },
        tiers,
    })
}

pub fn save_textgrid(path: &Path, document: &TextGridDocument) -> Result<(), FluencyError> {
    let mut textgrid = TextGrid::new(document.min_timestamp, document.max_timestamp)
        .map_err(|err| FluencyError::textgrid("building TextGrid", err))?;
    for tier in &document.tiers {
        textgrid
            .add_tier(to_textgrid_tier(tier))
            .map_err(|err| FluencyError::textgrid("adding tier", format!("{}: {err}", tier.name())))?;
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| FluencyError::io("creating output directory", e))?;
    }
    textgrid.to_file(path, false).map_err(|err| {
        FluencyError::textgrid("writing TextGrid", format!("{}: {err}", path.display()))
    })?;
    tracing::debug!(path = %path.display(), tiers = document.tiers.len(), "wrote TextGrid");
    Ok(())
}

fn from_textgrid_tier(tier: Tier) -> AnyTier {
    if tier.tier_type == TierType::PointTier {
        return AnyTier::Point(PointTier::new(
            tier.name,
            tier.xmin,
            tier.xmax,
            tier.points
                .into_iter()
                .map(|point| Point::new(point.time, point.mark))
                .collect(),
        ));
    }
    AnyTier::Interval(IntervalTier::new(
        tier.name,
        tier.xmin,
        tier.xmax,
        tier.intervals
            .into_iter()
            .map(|interval| Interval::new(interval.xmin, interval.xmax, interval.text))
            .collect(),
    ))
}

fn to_textgrid_tier(tier: &AnyTier) -> Tier {
    match tier {
        AnyTier::Interval(tier) => Tier {
            name: tier.name.clone(),
            tier_type: TierType::IntervalTier,
            xmin: tier.min_timestamp,
            xmax: tier.max_timestamp,
            intervals: contiguous_intervals(tier),
            points: Vec::new(),
        },
        AnyTier::Point(tier) => Tier {
            name: tier.name.clone(),
            tier_type: TierType::PointTier,
            xmin: tier.min_timestamp,
            xmax: tier.max_timestamp,
            intervals: Vec::new(),
            points: tier
                .points
                .iter()
                .map(|point| textgrid::Point {
                    time: point.time,
                    mark: point.label.clone(),
                })
                .collect(),
        },
    }
}

/// Interval tiers are written gap-free: uncovered stretches between
/// `min_timestamp` and `max_timestamp` become empty-text intervals.
fn contiguous_intervals(tier: &IntervalTier) -> Vec<textgrid::Interval> {
    let mut out = Vec::with_capacity(tier.intervals.len() * 2 + 1);
    let mut cursor = tier.min_timestamp;
    for interval in &tier.intervals {
        if interval.start > cursor {
            out.push(textgrid::Interval {
                xmin: cursor,
                xmax: interval.start,
                text: String::new(),
            });
        }
        out.push(textgrid::Interval {
            xmin: interval.start,
            xmax: interval.end,
            text: interval.label.clone(),
        });
        cursor = cursor.max(interval.end);
    }
    if tier.max_timestamp > cursor {
        out.push(textgrid::Interval {
            xmin: cursor,
            xmax: tier.max_timestamp,
            text: String::new(),
        });
    }
    out
}
