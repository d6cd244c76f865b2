/// Assistant module
///
/// The conversational surface: resolves a typed command into an intent,
/// executes it against the stores, and phrases a reply.

pub mod briefing;
pub mod dispatcher;
pub mod searcher;

pub use briefing::morning_summary;
pub use dispatcher::Assistant;
pub use searcher::Searcher;
