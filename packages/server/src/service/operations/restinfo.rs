//! Registry introspection operation.

use std::sync::{Arc, OnceLock};

use http::StatusCode;
use patchbay_core::Envelope;
use serde_json::{json, Map};

use crate::service::handler::Handler;
use crate::service::registry::RouteMap;

/// Path the introspection operation is registered at, on both transports.
pub const REST_INFO_PATH: &str = "/api/v1/restinfo";

/// Returns a 200 envelope whose data is the full verb → registered resource
/// pattern map.
///
/// The handler is registered before the registry is finalized, so it reads
/// the map through a cell that `build_registry` seals right after `build()`.
#[must_use]
pub fn handler(routes: Arc<OnceLock<RouteMap>>) -> Handler {
    Handler::new(move |ctx| {
        let routes = Arc::clone(&routes);
        async move {
            let map = routes
                .get()
                .ok_or_else(|| anyhow::anyhow!("route map was never sealed"))?;

            let mut data = Map::new();
            for (verb, patterns) in map {
                data.insert(verb.to_string(), json!(patterns));
            }
            Ok(Envelope::build(StatusCode::OK.as_u16(), &ctx)
                .data(data)
                .finish())
        }
    })
}
