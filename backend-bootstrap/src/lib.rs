pub mod context;
pub mod lifecycle;
pub mod logging;

pub use lifecycle::{print_event_ids, run_ingest_once, run_standalone};
pub use logging::{init_tracing, startup_subscriber};
