use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::annotation::repetitions::DEFAULT_MAX_CACHE;
use crate::error::FluencyError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FluencyConfig {
    /// Language code or English name, e.g. `"en"` or `"Dutch"`.
    pub language: String,
    /// Optional `{"word": "TAG"}` JSON lexicon for the default tagger.
    pub lexicon_path: Option<String>,
    pub max_cache: usize,
    /// Word forms (or full `word_TAG` labels) excluded from scoring.
    pub to_ignore: Vec<String>,
    pub pos_tier_name: String,
    pub lemma_tier_name: String,
    pub repetitions_tier_name: String,
    pub freqdist_tier_name: String,
}

impl FluencyConfig {
    pub const DEFAULT_LANGUAGE: &'static str = "en";

    pub fn load(path: &Path) -> Result<Self, FluencyError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| FluencyError::io("read fluency config", e))?;
        serde_json::from_str(&data).map_err(|e| FluencyError::json("parse fluency config", e))
    }

    pub fn ignore_set(&self) -> HashSet<String> {
        self.to_ignore
            .iter()
            .map(|word| word.trim())
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for FluencyConfig {
    fn default() -> Self {
        Self {
            language: Self::DEFAULT_LANGUAGE.to_string(),
            lexicon_path: None,
            max_cache: DEFAULT_MAX_CACHE,
            to_ignore: Vec::new(),
            pos_tier_name: "POStags".to_string(),
            lemma_tier_name: "Lemmas".to_string(),
            repetitions_tier_name: "Repetitions".to_string(),
            freqdist_tier_name: "FreqDist".to_string(),
        }
    }
}
