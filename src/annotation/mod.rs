pub mod label;
pub mod repetitions;
pub mod syntax;
pub mod tag_alignment;
pub mod validity;
