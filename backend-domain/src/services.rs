// Pure domain services shared by store implementations

pub mod batch;
pub mod selection;

pub use batch::*;
pub use selection::*;
