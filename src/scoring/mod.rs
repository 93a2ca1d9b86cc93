pub mod config;
pub mod describe;
pub mod engine;
pub mod formula;
pub mod multiplier;
pub mod validation;

pub use config::*;
pub use describe::describe_rules;
pub use engine::{PlacementResult, ScoringContext, ScoringEngine, ScoringResult};
pub use formula::{Formula, FormulaError, FormulaVariables};
pub use validation::validate_scoring;
