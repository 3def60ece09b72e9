use std::sync::Arc;

use tracing::{debug, warn};

use crate::endpoint::{DynEndpoint, Endpoint};
use crate::error::EndpointError;
use crate::request::Request;
use crate::response::EncodedResponse;

/// Dispatches requests to the first registered endpoint that matches.
///
/// Endpoints are registered during startup and only read afterwards, so a
/// built router can be shared behind an `Arc` without locking. When two
/// endpoints match the same request the one registered first always wins.
#[derive(Clone, Default)]
pub struct Router {
    endpoints: Vec<Arc<dyn DynEndpoint>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<E: Endpoint>(&mut self, endpoint: E) -> &mut Self {
        self.register_arc(Arc::new(endpoint))
    }

    pub fn register_arc(&mut self, endpoint: Arc<dyn DynEndpoint>) -> &mut Self {
        debug!(endpoint = endpoint.name(), position = self.endpoints.len(), "endpoint registered");
        self.endpoints.push(endpoint);
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<E: Endpoint>(mut self, endpoint: E) -> Self {
        self.register(endpoint);
        self
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Run `request` through the first matching endpoint.
    ///
    /// `Ok(None)` means no endpoint matched. Decode, handler and encode failures
    /// are returned unchanged for the transport to translate.
    pub async fn run(&self, request: Request) -> Result<Option<EncodedResponse>, EndpointError> {
        for endpoint in &self.endpoints {
            let Some(params) = endpoint.does_match(&request) else {
                continue;
            };
            debug!(
                endpoint = endpoint.name(),
                method = %request.method,
                url = %request.url,
                "route matched"
            );
            let endpoint_name = endpoint.name();
            return match endpoint.run(request, params).await {
                Ok(response) => Ok(Some(response)),
                Err(err) => {
                    if err.is_client_error() {
                        debug!(endpoint = endpoint_name, error = %err, "request rejected");
                    } else {
                        warn!(endpoint = endpoint_name, error = %err, "endpoint failed");
                    }
                    Err(err)
                }
            };
        }
        debug!(method = %request.method, url = %request.url, "no route matched");
        Ok(None)
    }
}
