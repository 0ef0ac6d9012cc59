//! Patchbay Core — correlation context, wire types, and resource patterns.
//!
//! Everything in this crate is transport-independent: the same types flow
//! through the HTTP adapter and the message-bus adapter in `patchbay-server`.

pub mod context;
pub mod envelope;
pub mod error;
pub mod pattern;
pub mod request;
pub mod verb;

pub use context::{CorrelationContext, TXID_HEADER};
pub use envelope::{Envelope, EnvelopeBuilder};
pub use error::ApiError;
pub use pattern::{PatternError, ResourcePattern};
pub use request::ApiRequest;
pub use verb::Verb;

#[cfg(test)]
mod tests {
    #[test]
    fn crate_loads() {
        // Empty body: if this test runs, the crate compiles and loads.
    }
}
