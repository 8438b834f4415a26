use thiserror::Error;

#[derive(Debug, Error)]
pub enum FluencyError {
    /// Tagger output ran out (or diverged) before an interval's text was rebuilt.
    #[error(
        "tagger output could not rebuild interval {index}: expected {expected:?}, consumed {consumed:?}"
    )]
    AlignmentExhausted {
        index: usize,
        expected: String,
        consumed: String,
    },
    #[error("unrecognized POS tag {tag:?} in label {label:?}")]
    InvalidTag { tag: String, label: String },
    #[error("unsupported language: {language}")]
    UnsupportedLanguage { language: String },
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("database error while {context}: {source}")]
    Database {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },
    #[error("CSV error while {context}: {source}")]
    Csv {
        context: &'static str,
        #[source]
        source: csv::Error,
    },
    #[error("TextGrid error while {context}: {message}")]
    TextGrid {
        context: &'static str,
        message: String,
    },
    #[error("missing tier: {name}")]
    MissingTier { name: String },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl FluencyError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn database(context: &'static str, source: rusqlite::Error) -> Self {
        Self::Database { context, source }
    }

    pub(crate) fn csv(context: &'static str, source: csv::Error) -> Self {
        Self::Csv { context, source }
    }

    pub(crate) fn textgrid(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::TextGrid {
            context,
            message: err.to_string(),
        }
    }

    pub(crate) fn unsupported_language(language: impl Into<String>) -> Self {
        Self::UnsupportedLanguage {
            language: language.into(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
