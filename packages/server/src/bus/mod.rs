//! Message-bus transport and the asynchronous dispatch adapter.

pub mod adapter;
#[cfg(feature = "nats")]
pub mod nats;
pub mod transport;

pub use adapter::BusAdapter;
#[cfg(feature = "nats")]
pub use nats::NatsBus;
pub use transport::{BusSubscriber, InMemoryBus, MessageBus};
