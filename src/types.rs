use std::cmp::Ordering;

/// A labeled time span in seconds, `[start, end)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
    pub label: String,
}

impl Interval {
    pub fn new(start: f64, end: f64, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }

    /// Same span, different label.
    pub fn with_label(&self, label: impl Into<String>) -> Self {
        Self {
            start: self.start,
            end: self.end,
            label: label.into(),
        }
    }

    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_empty()
    }

    /// Ordering by `start`, then `end`.
    pub fn cmp_span(&self, other: &Self) -> Ordering {
        self.start
            .total_cmp(&other.start)
            .then_with(|| self.end.total_cmp(&other.end))
    }
}

/// A labeled zero-duration marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub time: f64,
    pub label: String,
}

impl Point {
    pub fn new(time: f64, label: impl Into<String>) -> Self {
        Self {
            time,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntervalTier {
    pub name: String,
    pub min_timestamp: f64,
    pub max_timestamp: f64,
    pub intervals: Vec<Interval>,
}

impl IntervalTier {
    pub fn new(
        name: impl Into<String>,
        min_timestamp: f64,
        max_timestamp: f64,
        intervals: Vec<Interval>,
    ) -> Self {
        Self {
            name: name.into(),
            min_timestamp,
            max_timestamp,
            intervals,
        }
    }

    /// A sibling tier with the same time bounds.
    pub fn derive(&self, name: impl Into<String>, intervals: Vec<Interval>) -> Self {
        Self::new(name, self.min_timestamp, self.max_timestamp, intervals)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointTier {
    pub name: String,
    pub min_timestamp: f64,
    pub max_timestamp: f64,
    pub points: Vec<Point>,
}

impl PointTier {
    pub fn new(
        name: impl Into<String>,
        min_timestamp: f64,
        max_timestamp: f64,
        points: Vec<Point>,
    ) -> Self {
        Self {
            name: name.into(),
            min_timestamp,
            max_timestamp,
            points,
        }
    }
}

/// One `(word, tag)` pair produced by a tagger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub word: String,
    pub tag: String,
}

impl TaggedToken {
    pub fn new(word: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            tag: tag.into(),
        }
    }
}

impl<W: Into<String>, T: Into<String>> From<(W, T)> for TaggedToken {
    fn from((word, tag): (W, T)) -> Self {
        Self::new(word, tag)
    }
}
