/// Intent module
///
/// Turns a free-text command into a structured intent the assistant can
/// dispatch. Pure keyword heuristics; no model calls, no stored state.

pub mod model;
pub mod resolver;

pub use model::{Details, EntityType, Intent, IntentKind, Priority};
pub use resolver::resolve;
