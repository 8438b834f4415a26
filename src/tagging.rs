use std::collections::HashMap;
use std::path::Path;

use crate::error::FluencyError;

/// English clitics split off the stem, Treebank style (`isn't` -> `is` `n't`).
const CLITICS: [&str; 7] = ["n't", "'s", "'re", "'ve", "'ll", "'d", "'m"];

/// Tags used for clitics the lexicon has no entry for.
const CLITIC_TAGS: [(&str, &str); 7] = [
    ("n't", "RB"),
    ("'s", "VBZ"),
    ("'re", "VBP"),
    ("'ve", "VBP"),
    ("'ll", "MD"),
    ("'d", "MD"),
    ("'m", "VBP"),
];

/// Split text into tagger tokens.
///
/// Concatenating the tokens produced for one whitespace-separated word always
/// gives back that word.
pub fn tokenize(text: &str, split_clitics: bool) -> Vec<String> {
    let mut tokens = Vec::new();
    for word in text.split_whitespace() {
        let (leading, rest) = split_leading_punctuation(word);
        let (core, trailing) = split_trailing_punctuation(rest);

        if !leading.is_empty() {
            tokens.push(leading.to_string());
        }
        if !core.is_empty() {
            match split_clitics.then(|| split_clitic(core)).flatten() {
                Some((stem, clitic)) => {
                    tokens.push(stem.to_string());
                    tokens.push(clitic.to_string());
                }
                None => tokens.push(core.to_string()),
            }
        }
        if !trailing.is_empty() {
            tokens.push(trailing.to_string());
        }
    }
    tokens
}

fn is_detachable_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() && c != '\''
}

fn split_leading_punctuation(word: &str) -> (&str, &str) {
    let split_at = word
        .char_indices()
        .find(|&(_, c)| !is_detachable_punctuation(c))
        .map(|(i, _)| i)
        .unwrap_or(word.len());
    word.split_at(split_at)
}

fn split_trailing_punctuation(word: &str) -> (&str, &str) {
    let split_at = word
        .char_indices()
        .rev()
        .find(|&(_, c)| !is_detachable_punctuation(c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    word.split_at(split_at)
}

fn split_clitic(word: &str) -> Option<(&str, &str)> {
    let lowered = word.to_lowercase();
    CLITICS.iter().find_map(|clitic| {
        if lowered.len() > clitic.len() && lowered.ends_with(clitic) && word.len() == lowered.len() {
            Some(word.split_at(word.len() - clitic.len()))
        } else {
            None
        }
    })
}

pub fn default_clitic_tag(token: &str) -> Option<&'static str> {
    CLITIC_TAGS
        .iter()
        .find(|(clitic, _)| *clitic == token)
        .map(|&(_, tag)| tag)
}

pub fn is_punctuation_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(is_detachable_punctuation)
}

/// Load a `{"word": "TAG", ...}` lexicon; keys are lowercased.
pub fn load_lexicon(path: &Path) -> Result<HashMap<String, String>, FluencyError> {
    let data = std::fs::read_to_string(path).map_err(|e| FluencyError::io("read lexicon", e))?;
    let raw: HashMap<String, String> =
        serde_json::from_str(&data).map_err(|e| FluencyError::json("parse lexicon", e))?;
    Ok(raw
        .into_iter()
        .map(|(word, tag)| (word.to_lowercase(), tag))
        .collect())
}
