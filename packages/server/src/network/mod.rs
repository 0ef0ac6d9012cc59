//! Synchronous (HTTP) transport for registered operations.
//!
//! 1. **Configuration** (`config`): listener settings derived from the
//!    process configuration.
//! 2. **Middleware** (`middleware`): the Tower pipeline plus the
//!    correlation middleware that resolves the transaction id.
//! 3. **Handlers** (`handlers`): operation mounting, the envelope fallback,
//!    and the envelope-to-response conversion.
//! 4. **Module** (`module`): deferred-startup server lifecycle.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod module;

pub use config::NetworkConfig;
pub use handlers::AppState;
pub use middleware::{build_http_layers, correlation_middleware};
pub use module::NetworkModule;
