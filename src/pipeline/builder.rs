use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::config::FluencyConfig;
use crate::error::FluencyError;
use crate::languages::LanguageProfile;
use crate::lexicon::RowLookup;
use crate::pipeline::defaults::LexiconTagger;
use crate::pipeline::runtime::{FluencyPipeline, FluencyPipelineParts};
use crate::pipeline::traits::Tagger;
use crate::tagging::load_lexicon;

pub struct FluencyPipelineBuilder {
    config: FluencyConfig,
    tagger: Option<Box<dyn Tagger>>,
    frequency_lookup: Option<Box<dyn RowLookup + Send>>,
    clause_tags: Option<HashSet<String>>,
    phrase_tags: Option<HashSet<String>>,
}

impl FluencyPipelineBuilder {
    pub fn new(config: FluencyConfig) -> Self {
        Self {
            config,
            tagger: None,
            frequency_lookup: None,
            clause_tags: None,
            phrase_tags: None,
        }
    }

    pub fn with_tagger(mut self, tagger: Box<dyn Tagger>) -> Self {
        self.tagger = Some(tagger);
        self
    }

    pub fn with_frequency_lookup(mut self, lookup: Box<dyn RowLookup + Send>) -> Self {
        self.frequency_lookup = Some(lookup);
        self
    }

    pub fn with_clause_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clause_tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_phrase_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phrase_tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> Result<FluencyPipeline, FluencyError> {
        let profile = LanguageProfile::for_code(&self.config.language)?;

        let tagger = match self.tagger {
            Some(tagger) => tagger,
            None => {
                let lexicon = match self.config.lexicon_path.as_deref() {
                    Some(path) => load_lexicon(Path::new(path))?,
                    None => HashMap::new(),
                };
                tracing::debug!(
                    language = profile.code,
                    entries = lexicon.len(),
                    "using lexicon tagger"
                );
                Box::new(LexiconTagger::new(lexicon, profile))
            }
        };

        Ok(FluencyPipeline::from_parts(FluencyPipelineParts {
            ignore: self.config.ignore_set(),
            clause_tags: self
                .clause_tags
                .unwrap_or_else(|| profile.tag_set.clause_tags()),
            phrase_tags: self
                .phrase_tags
                .unwrap_or_else(|| profile.tag_set.phrase_tags()),
            valid_tags: profile.tag_set.valid_tags(),
            profile,
            config: self.config,
            tagger,
            frequency_lookup: self.frequency_lookup,
        }))
    }
}
