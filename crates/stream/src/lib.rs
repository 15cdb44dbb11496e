pub mod event_bus;
pub mod message;

pub use event_bus::*;
pub use message::*;
