// Scorewatch Infra-Scorer - Scorer adapters

pub mod command;
pub mod lexical;

pub use command::CommandScorer;
pub use lexical::LexicalScorer;
