//! Change-notification events and the bus that distributes them.
//!
//! The store publishes an event after every successful mutation; presentation
//! layers subscribe and re-pull snapshots. Events carry enough detail to tell
//! *what* changed, but subscribers are expected to re-read, not patch.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
