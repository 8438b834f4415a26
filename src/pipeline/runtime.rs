use std::collections::HashSet;

use crate::annotation::label::{labels_to_text, lowercase_intervals, word_form_tier};
use crate::annotation::repetitions::{freqdist_tier, repetitions_tier};
use crate::annotation::syntax::mark_syntax;
use crate::annotation::tag_alignment::align_tags;
use crate::config::FluencyConfig;
use crate::error::FluencyError;
use crate::languages::LanguageProfile;
use crate::lexicon::{frequency_tiers, RowLookup};
use crate::pipeline::traits::Tagger;
use crate::types::{IntervalTier, PointTier};

pub struct FluencyPipeline {
    config: FluencyConfig,
    profile: LanguageProfile,
    ignore: HashSet<String>,
    clause_tags: HashSet<String>,
    phrase_tags: HashSet<String>,
    valid_tags: HashSet<String>,
    tagger: Box<dyn Tagger>,
    frequency_lookup: Option<Box<dyn RowLookup + Send>>,
}

pub(crate) struct FluencyPipelineParts {
    pub config: FluencyConfig,
    pub profile: LanguageProfile,
    pub ignore: HashSet<String>,
    pub clause_tags: HashSet<String>,
    pub phrase_tags: HashSet<String>,
    pub valid_tags: HashSet<String>,
    pub tagger: Box<dyn Tagger>,
    pub frequency_lookup: Option<Box<dyn RowLookup + Send>>,
}

impl FluencyPipeline {
    pub(crate) fn from_parts(parts: FluencyPipelineParts) -> Self {
        Self {
            config: parts.config,
            profile: parts.profile,
            ignore: parts.ignore,
            clause_tags: parts.clause_tags,
            phrase_tags: parts.phrase_tags,
            valid_tags: parts.valid_tags,
            tagger: parts.tagger,
            frequency_lookup: parts.frequency_lookup,
        }
    }

    pub fn config(&self) -> &FluencyConfig {
        &self.config
    }

    pub fn profile(&self) -> LanguageProfile {
        self.profile
    }

    pub fn tagger(&self) -> &dyn Tagger {
        self.tagger.as_ref()
    }

    pub fn clause_tags(&self) -> &HashSet<String> {
        &self.clause_tags
    }

    pub fn phrase_tags(&self) -> &HashSet<String> {
        &self.phrase_tags
    }

    /// Tag a word tier: labels are lowercased, tagged as one text, and the
    /// tags are folded back into `word_TAG` labels on the original spans.
    pub fn pos_tier(&self, words: &IntervalTier) -> Result<IntervalTier, FluencyError> {
        let lowered = lowercase_intervals(&words.intervals);
        let tokens = self.tagger.tag(&labels_to_text(&lowered))?;
        tracing::debug!(
            tier = %words.name,
            intervals = lowered.len(),
            tokens = tokens.len(),
            "tagged word tier"
        );
        let intervals = align_tags(tokens, &lowered)?;
        Ok(words.derive(self.config.pos_tier_name.as_str(), intervals))
    }

    pub fn syntax_tiers(&self, pos_tier: &IntervalTier) -> Result<(PointTier, PointTier), FluencyError> {
        mark_syntax(pos_tier, &self.clause_tags, &self.phrase_tags, &self.valid_tags)
    }

    pub fn repetitions_tier(&self, pos_tier: &IntervalTier) -> IntervalTier {
        repetitions_tier(
            pos_tier,
            self.config.max_cache,
            &self.ignore,
            &self.config.repetitions_tier_name,
        )
    }

    pub fn freqdist_tier(&self, pos_tier: &IntervalTier) -> IntervalTier {
        freqdist_tier(pos_tier, &self.ignore, &self.config.freqdist_tier_name)
    }

    pub fn lemma_tier(&self, pos_tier: &IntervalTier) -> IntervalTier {
        word_form_tier(pos_tier, &self.config.lemma_tier_name)
    }

    /// Dictionary tiers for the word forms of a POS tier.
    ///
    /// Fails with `InvalidInput` when no frequency lookup was configured.
    pub fn frequency_tiers(
        &self,
        pos_tier: &IntervalTier,
        columns: Option<&[String]>,
    ) -> Result<Vec<IntervalTier>, FluencyError> {
        let lookup = self
            .frequency_lookup
            .as_deref()
            .ok_or_else(|| FluencyError::invalid_input("no frequency database configured"))?;
        frequency_tiers(&self.lemma_tier(pos_tier), lookup, &self.ignore, columns)
    }
}
