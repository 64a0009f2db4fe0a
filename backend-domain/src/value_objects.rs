// Domain value objects
pub mod country_whitelist;
pub mod date_range;
pub mod page_request;
pub mod query_mode;

pub use country_whitelist::*;
pub use date_range::*;
pub use page_request::*;
pub use query_mode::*;
