pub mod aeneas;
pub mod annotation;
pub mod config;
pub mod error;
pub mod grid;
pub mod languages;
pub mod lexicon;
pub mod pipeline;
pub mod tagging;
pub mod types;

pub use config::FluencyConfig;
pub use error::FluencyError;
pub use grid::{load_textgrid, save_textgrid, AnyTier, TextGridDocument};
pub use languages::{LanguageProfile, TagSet};
pub use lexicon::{RowLookup, SqliteLexicon};
pub use pipeline::builder::FluencyPipelineBuilder;
pub use pipeline::defaults::LexiconTagger;
pub use pipeline::runtime::FluencyPipeline;
pub use pipeline::traits::Tagger;
pub use types::{Interval, IntervalTier, Point, PointTier, TaggedToken};
