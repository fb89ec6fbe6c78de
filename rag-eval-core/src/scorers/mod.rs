//! Built-in scorer implementations

pub mod bleu;
pub mod cosine;
pub mod exact;
pub mod f1;
pub mod meteor;
pub mod rouge;

pub use bleu::BleuScorer;
pub use cosine::CosineScorer;
pub use exact::ExactMatchScorer;
pub use f1::TokenF1Scorer;
pub use meteor::{Lexicon, MeteorScorer};
pub use rouge::RougeLScorer;
