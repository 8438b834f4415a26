use crate::types::Interval;

/// Smallest span given to a degenerate interval, in seconds.
pub const MIN_INTERVAL_SECONDS: f64 = 0.00001;

/// Sort raw aligner fragments and nudge them into non-overlapping intervals
/// with `start < end`.
pub fn force_validity(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort_by(|a, b| a.cmp_span(b).then_with(|| a.label.cmp(&b.label)));

    let mut validated: Vec<Interval> = Vec::with_capacity(intervals.len());
    for entry in intervals {
        let mut start = entry.start;
        let mut end = entry.end;
        if let Some(previous) = validated.last() {
            if start < previous.end {
                start = previous.end;
            }
        }
        if start >= end {
            end = start + MIN_INTERVAL_SECONDS;
        }
        validated.push(Interval::new(start, end, entry.label));
    }
    validated
}
