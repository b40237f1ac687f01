// Domain Layer - Pure business logic and entities

pub mod error;
pub mod record;
pub mod sample;

// Re-exports
pub use error::DomainError;
pub use record::{round4, ScoreRecord, SkipRecord};
pub use sample::TranslationSample;
