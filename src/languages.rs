use std::collections::HashSet;

use crate::error::FluencyError;

/// Supported language codes and their English names.
pub const VALID_LANGUAGES: [(&str, &str); 12] = [
    ("zh", "Chinese"),
    ("hr", "Croatian"),
    ("nl", "Dutch"),
    ("en", "English"),
    ("fi", "Finnish"),
    ("de", "German"),
    ("it", "Italian"),
    ("ko", "Korean"),
    ("lt", "Lithuanian"),
    ("pl", "Polish"),
    ("ro", "Romanian"),
    ("sv", "Swedish"),
];

pub const PENN_TREEBANK_TAGS: [&str; 36] = [
    "CC", "CD", "DT", "EX", "FW", "IN", "JJ", "JJR", "JJS", "LS", "MD", "NN", "NNS", "NNP",
    "NNPS", "PDT", "POS", "PRP", "PRP$", "RB", "RBR", "RBS", "RP", "SYM", "TO", "UH", "VB",
    "VBD", "VBG", "VBN", "VBP", "VBZ", "WDT", "WP", "WP$", "WRB",
];

/// Punctuation tags emitted by Treebank-style taggers.
pub const PENN_TREEBANK_PUNCTUATION: [&str; 9] = [".", ",", ":", "``", "''", "(", ")", "$", "#"];

pub const UNIVERSAL_POS_TAGS: [&str; 19] = [
    "ADJ", "ADP", "ADV", "AUX", "CONJ", "CCONJ", "DET", "INTJ", "NOUN", "NUM", "PART", "PRON",
    "PROPN", "PUNCT", "SCONJ", "SYM", "VERB", "X", "SPACE",
];

pub const PENN_TREEBANK_CLAUSE_TAGS: [&str; 6] = ["VB", "VBD", "VBG", "VBN", "VBP", "VBZ"];
pub const PENN_TREEBANK_PHRASE_TAGS: [&str; 4] = ["VBZ", "VBP", "VBD", "VB"];
pub const UNIVERSAL_CLAUSE_TAGS: [&str; 2] = ["AUX", "VERB"];
pub const UNIVERSAL_PHRASE_TAGS: [&str; 1] = ["VERB"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSet {
    PennTreebank,
    Universal,
}

impl TagSet {
    pub fn valid_tags(self) -> HashSet<String> {
        match self {
            Self::PennTreebank => PENN_TREEBANK_TAGS
                .iter()
                .chain(PENN_TREEBANK_PUNCTUATION.iter())
                .map(|tag| tag.to_string())
                .collect(),
            // Universal taggers may also emit fine-grained Treebank tags.
            Self::Universal => UNIVERSAL_POS_TAGS
                .iter()
                .chain(PENN_TREEBANK_TAGS.iter())
                .chain(PENN_TREEBANK_PUNCTUATION.iter())
                .map(|tag| tag.to_string())
                .collect(),
        }
    }

    pub fn clause_tags(self) -> HashSet<String> {
        let tags: &[&str] = match self {
            Self::PennTreebank => &PENN_TREEBANK_CLAUSE_TAGS,
            Self::Universal => &UNIVERSAL_CLAUSE_TAGS,
        };
        tags.iter().map(|tag| tag.to_string()).collect()
    }

    pub fn phrase_tags(self) -> HashSet<String> {
        let tags: &[&str] = match self {
            Self::PennTreebank => &PENN_TREEBANK_PHRASE_TAGS,
            Self::Universal => &UNIVERSAL_PHRASE_TAGS,
        };
        tags.iter().map(|tag| tag.to_string()).collect()
    }

    /// Tag given to words the lexicon does not know.
    pub fn fallback_tag(self) -> &'static str {
        match self {
            Self::PennTreebank => "NN",
            Self::Universal => "X",
        }
    }

    pub fn punctuation_tag(self) -> &'static str {
        match self {
            Self::PennTreebank => ".",
            Self::Universal => "PUNCT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageProfile {
    pub code: &'static str,
    pub name: &'static str,
    pub tag_set: TagSet,
}

impl LanguageProfile {
    /// Resolve a language code (`"en"`) or English name (`"English"`).
    pub fn for_code(code_or_name: &str) -> Result<Self, FluencyError> {
        let needle = code_or_name.trim();
        VALID_LANGUAGES
            .iter()
            .find(|(code, name)| *code == needle || name.eq_ignore_ascii_case(needle))
            .map(|&(code, name)| Self {
                code,
                name,
                tag_set: if code == "en" {
                    TagSet::PennTreebank
                } else {
                    TagSet::Universal
                },
            })
            .ok_or_else(|| FluencyError::unsupported_language(needle))
    }

    /// Only English gets clitic splitting (`isn't` -> `is` + `n't`).
    pub fn splits_clitics(&self) -> bool {
        self.tag_set == TagSet::PennTreebank
    }
}

pub fn get_valid_tags(code_or_name: &str) -> Result<HashSet<String>, FluencyError> {
    Ok(LanguageProfile::for_code(code_or_name)?.tag_set.valid_tags())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_code_and_name() {
        let by_code = LanguageProfile::for_code("nl").unwrap();
        let by_name = LanguageProfile::for_code("dutch").unwrap();
        assert_eq!(by_code, by_name);
        assert_eq!(by_code.name, "Dutch");
        assert_eq!(by_code.tag_set, TagSet::Universal);
    }

    #[test]
    fn english_uses_treebank() {
        let en = LanguageProfile::for_code("en").unwrap();
        assert_eq!(en.tag_set, TagSet::PennTreebank);
        assert!(en.splits_clitics());
        assert!(get_valid_tags("en").unwrap().contains("VBZ"));
    }

    #[test]
    fn unknown_language_fails() {
        let err = LanguageProfile::for_code("xx").unwrap_err();
        assert!(matches!(err, FluencyError::UnsupportedLanguage { language } if language == "xx"));
        assert!(get_valid_tags("Klingon").is_err());
    }

    #[test]
    fn phrase_tags_are_subset_of_clause_tags() {
        for tag_set in [TagSet::PennTreebank, TagSet::Universal] {
            let clause = tag_set.clause_tags();
            assert!(tag_set.phrase_tags().is_subset(&clause));
            assert!(clause.is_subset(&tag_set.valid_tags()));
        }
    }
}
