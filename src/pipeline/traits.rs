use crate::error::FluencyError;
use crate::types::TaggedToken;

/// Part-of-speech tagger invoked once per tier on the space-joined labels.
///
/// Concatenating the words of the tokens produced for one whitespace-separated
/// word must give that word back, or the tier cannot be aligned.
pub trait Tagger: Send + Sync {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>, FluencyError>;
}
