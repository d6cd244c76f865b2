/// Intelligence module
///
/// Reads the task collection and derives categories, tags, and suggestion
/// patterns from it. The detectors are pure functions; the Analyzer owns
/// storage access and the error boundary.

pub mod analyzer;
pub mod classifier;
pub mod patterns;
pub mod suggestions;

pub use analyzer::{AnalysisReport, Analyzer};
pub use classifier::{Category, Classifier};
pub use patterns::{Cadence, CategoryStats, ForgottenTask, RecurringPattern, RelatedPair};
pub use suggestions::{build_suggestions, Suggestion, SuggestionKind};
