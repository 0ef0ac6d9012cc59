//! Operation registration and dispatch, independent of transport.
//!
//! 1. **Handlers** (`handler`): first-class async closures keyed by
//!    `(verb, resource pattern)` — no runtime reflection.
//! 2. **Registry** (`registry`): built once at startup, read-only and
//!    lock-free afterwards; resolves bus-side lookups (the HTTP router does
//!    its own lookup from the same key set).
//! 3. **Dispatch** (`dispatch`): shared failure-to-envelope conversion so
//!    both adapters produce identically shaped error replies.
//! 4. **Operations** (`operations`): the built-in ping and restinfo
//!    handlers and the startup registration step.

pub mod dispatch;
pub mod handler;
pub mod operations;
pub mod registry;

pub use dispatch::failure_envelope;
pub use handler::Handler;
pub use registry::{OperationKey, OperationRegistry, RegistryBuilder, RouteMap};
