//! Built-in operations exposed over both transports.
//!
//! `build_registry` is the explicit, testable registration step executed
//! once at startup. Adding an operation means adding one `register` call
//! here; the bus adapter and the HTTP router both pick it up from the
//! resulting registry.

pub mod ping;
pub mod restinfo;

use std::sync::{Arc, OnceLock};

use patchbay_core::Verb;

use super::registry::{OperationKey, OperationRegistry, RegistryBuilder};

/// Builds the operation registry with all built-in operations.
///
/// # Errors
///
/// Returns an error on conflicting registrations or malformed patterns —
/// both fatal configuration mistakes.
pub fn build_registry() -> anyhow::Result<OperationRegistry> {
    let routes = Arc::new(OnceLock::new());

    let mut builder = RegistryBuilder::new();
    builder.register(
        OperationKey::new(Verb::Get, ping::PING_PATH)?,
        ping::handler(),
    );
    builder.register(
        OperationKey::new(Verb::Get, restinfo::REST_INFO_PATH)?,
        restinfo::handler(Arc::clone(&routes)),
    );

    let registry = builder.build()?;
    // Seal the introspection map now that the full key set is known; the
    // restinfo handler reads it through the shared cell.
    let _ = routes.set(registry.route_map());
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use patchbay_core::CorrelationContext;

    use super::*;

    #[test]
    fn registry_contains_the_builtin_operations() {
        let registry = build_registry().unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.resolve(Verb::Get, ping::PING_PATH).is_some());
        assert!(registry.resolve(Verb::Get, restinfo::REST_INFO_PATH).is_some());
    }

    #[tokio::test]
    async fn restinfo_sees_the_complete_route_map() {
        let registry = build_registry().unwrap();
        let handler = registry
            .resolve(Verb::Get, restinfo::REST_INFO_PATH)
            .unwrap();

        let envelope = handler.invoke(CorrelationContext::new()).await.unwrap();
        assert_eq!(envelope.code, 200);

        let data = envelope.data.unwrap();
        let get_paths = data["GET"].as_array().unwrap();
        assert!(get_paths.iter().any(|p| p == ping::PING_PATH));
        assert!(get_paths.iter().any(|p| p == restinfo::REST_INFO_PATH));
    }
}
