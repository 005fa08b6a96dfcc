pub mod orchestrator;
pub mod reply;

pub use orchestrator::{generate_or_apologize, QueryOrchestrator, APOLOGY_PREFIX};
pub use reply::{Reply, READY_MESSAGE};
