//! Lossy event channel between client operations and observers

mod bus;

pub use bus::{EventBus, EventStream};
