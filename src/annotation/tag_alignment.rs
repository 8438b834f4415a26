use std::collections::VecDeque;

use crate::annotation::label::compose_pair;
use crate::error::FluencyError;
use crate::types::{Interval, TaggedToken};

/// Re-associate a flat tagger stream with the intervals it was produced from.
///
/// The tagger may split one aligned word into several tokens (`isn't` ->
/// `isn` + `'t`), so tokens are dequeued greedily until their concatenated
/// words equal the interval label. Each consumed token contributes one
/// `word_TAG` pair to the new label. Empty intervals consume nothing.
///
/// Spans are preserved exactly. Dequeued tokens are never returned to the
/// queue.
pub fn align_tags<I, T>(tokens: I, intervals: &[Interval]) -> Result<Vec<Interval>, FluencyError>
where
    I: IntoIterator<Item = T>,
    T: Into<TaggedToken>,
{
    let mut queue: VecDeque<TaggedToken> = tokens.into_iter().map(Into::into).collect();
    let mut aligned = Vec::with_capacity(intervals.len());

    for (index, interval) in intervals.iter().enumerate() {
        if interval.is_empty() {
            aligned.push(interval.with_label(""));
            continue;
        }
        let label = consume_interval(&mut queue, index, &interval.label)?;
        aligned.push(interval.with_label(label));
    }

    if !queue.is_empty() {
        tracing::warn!(
            leftover_tokens = queue.len(),
            "tagger produced tokens beyond the last interval; ignoring them"
        );
    }
    Ok(aligned)
}

fn consume_interval(
    queue: &mut VecDeque<TaggedToken>,
    index: usize,
    expected: &str,
) -> Result<String, FluencyError> {
    let mut consumed = String::new();
    let mut pairs = Vec::new();

    while consumed != expected {
        // Once the text stops being a prefix, no further token can repair it.
        let Some(token) = queue.pop_front().filter(|_| expected.starts_with(&consumed)) else {
            return Err(FluencyError::AlignmentExhausted {
                index,
                expected: expected.to_string(),
                consumed,
            });
        };
        consumed.push_str(&token.word);
        pairs.push(compose_pair(&token.word, &token.tag));
    }

    Ok(pairs.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(intervals: &[Interval]) -> Vec<&str> {
        intervals.iter().map(|i| i.label.as_str()).collect()
    }

    #[test]
    fn one_to_one_tokens() {
        let intervals = vec![
            Interval::new(0.0, 1.0, "a"),
            Interval::new(1.0, 2.0, "a"),
            Interval::new(2.0, 3.0, "b"),
        ];
        let tokens = [("a", "DT"), ("a", "DT"), ("b", "NN")];
        let aligned = align_tags(tokens, &intervals).unwrap();
        assert_eq!(labels(&aligned), ["a_DT", "a_DT", "b_NN"]);
    }

    #[test]
    fn split_word_is_rejoined() {
        let intervals = vec![Interval::new(0.0, 1.0, "isn't")];
        let aligned = align_tags([("isn", "VBP"), ("'t", "RB")], &intervals).unwrap();
        assert_eq!(labels(&aligned), ["isn_VBP 't_RB"]);
    }

    #[test]
    fn split_without_apostrophe() {
        let intervals = vec![Interval::new(0.0, 1.0, "isnt")];
        let aligned = align_tags([("isn", "VBP"), ("t", "RB")], &intervals).unwrap();
        assert_eq!(labels(&aligned), ["isn_VBP t_RB"]);
    }

    #[test]
    fn empty_interval_consumes_nothing() {
        let intervals = vec![
            Interval::new(0.0, 1.0, ""),
            Interval::new(1.0, 2.0, "hi"),
            Interval::new(2.0, 3.0, ""),
        ];
        let aligned = align_tags([("hi", "UH")], &intervals).unwrap();
        assert_eq!(labels(&aligned), ["", "hi_UH", ""]);
    }

    #[test]
    fn spans_are_preserved() {
        let intervals = vec![
            Interval::new(0.125, 0.5, "we"),
            Interval::new(0.5, 0.875, "ran"),
        ];
        let aligned = align_tags([("we", "PRP"), ("ran", "VBD")], &intervals).unwrap();
        for (new, old) in aligned.iter().zip(&intervals) {
            assert_eq!(new.start, old.start);
            assert_eq!(new.end, old.end);
        }
    }

    #[test]
    fn exhausted_queue_is_an_error() {
        let intervals = vec![Interval::new(0.0, 1.0, "a"), Interval::new(1.0, 2.0, "b")];
        let err = align_tags([("a", "DT")], &intervals).unwrap_err();
        match err {
            FluencyError::AlignmentExhausted { index, expected, .. } => {
                assert_eq!(index, 1);
                assert_eq!(expected, "b");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn diverging_text_is_an_error() {
        let intervals = vec![Interval::new(0.0, 1.0, "cat"), Interval::new(1.0, 2.0, "dog")];
        let err = align_tags([("dog", "NN"), ("cat", "NN")], &intervals).unwrap_err();
        assert!(matches!(err, FluencyError::AlignmentExhausted { index: 0, .. }));
    }

    #[test]
    fn leftover_tokens_are_ignored() {
        let intervals = vec![Interval::new(0.0, 1.0, "a")];
        let aligned = align_tags([("a", "DT"), (".", ".")], &intervals).unwrap();
        assert_eq!(labels(&aligned), ["a_DT"]);
    }
}
