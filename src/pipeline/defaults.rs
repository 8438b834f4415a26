use std::collections::HashMap;

use crate::error::FluencyError;
use crate::languages::{LanguageProfile, TagSet, PENN_TREEBANK_PUNCTUATION};
use crate::pipeline::traits::Tagger;
use crate::tagging::{default_clitic_tag, is_punctuation_token, tokenize};
use crate::types::TaggedToken;

/// Dictionary tagger: lexicon entry, then clitic default, then punctuation,
/// then the tag set's fallback tag.
pub struct LexiconTagger {
    lexicon: HashMap<String, String>,
    tag_set: TagSet,
    split_clitics: bool,
}

impl LexiconTagger {
    pub fn new(lexicon: HashMap<String, String>, profile: LanguageProfile) -> Self {
        Self {
            lexicon: lexicon
                .into_iter()
                .map(|(word, tag)| (word.to_lowercase(), tag))
                .collect(),
            tag_set: profile.tag_set,
            split_clitics: profile.splits_clitics(),
        }
    }

    fn tag_for(&self, token: &str) -> String {
        if let Some(tag) = self.lexicon.get(&token.to_lowercase()) {
            return tag.clone();
        }
        if self.split_clitics {
            if let Some(tag) = default_clitic_tag(token) {
                return tag.to_string();
            }
        }
        if is_punctuation_token(token) {
            if self.tag_set == TagSet::PennTreebank && PENN_TREEBANK_PUNCTUATION.contains(&token) {
                return token.to_string();
            }
            return self.tag_set.punctuation_tag().to_string();
        }
        self.tag_set.fallback_tag().to_string()
    }
}

impl Tagger for LexiconTagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>, FluencyError> {
        Ok(tokenize(text, self.split_clitics)
            .into_iter()
            .map(|token| {
                let tag = self.tag_for(&token);
                TaggedToken::new(token, tag)
            })
            .collect())
    }
}
