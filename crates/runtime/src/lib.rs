pub mod event_bus;
pub mod toc_store;

pub use event_bus::*;
pub use toc_store::*;
