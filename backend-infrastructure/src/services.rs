pub mod clock;
pub mod ingest_scheduler;
pub mod upstream_client;

pub use clock::*;
pub use ingest_scheduler::*;
pub use upstream_client::*;
