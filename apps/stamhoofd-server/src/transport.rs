use axum::body::to_bytes;
use axum::extract::{Request as HttpRequest, State};
use axum::response::{IntoResponse, Response};
use simple_endpoints::{EncodedResponse, EndpointError, Request, Router as EndpointRouter};
use tracing::{debug, error, warn};

use crate::problem::{bad_request, not_found, payload_too_large, Problem, ProblemResponse};

/// State shared by the fallback handler.
#[derive(Clone)]
pub struct Endpoints {
    pub router: EndpointRouter,
    pub body_limit: usize,
}

/// Fallback handler: every request without an axum route goes through the endpoint router.
pub async fn dispatch(State(endpoints): State<Endpoints>, request: HttpRequest) -> Response {
    let (parts, body) = request.into_parts();
    let url = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| parts.uri.path().to_owned());

    let bytes = match to_bytes(body, endpoints.body_limit).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(%url, error = %err, "request body rejected");
            return payload_too_large(format!(
                "Request body exceeds {} bytes",
                endpoints.body_limit
            ))
            .into_response();
        }
    };
    let body = match String::from_utf8(bytes.to_vec()) {
        Ok(body) => body,
        Err(_) => return bad_request("Request body is not valid UTF-8").into_response(),
    };

    let mut request = Request::new(parts.method, url.clone()).with_body(body);
    request.headers = parts.headers;

    match endpoints.router.run(request).await {
        Ok(Some(encoded)) => into_http(encoded),
        Ok(None) => {
            debug!(%url, "no endpoint matched");
            let mut problem = not_found(format!("No endpoint for {url}")).0;
            problem.instance = url;
            ProblemResponse(problem).into_response()
        }
        Err(err) => failure(&url, &err),
    }
}

fn into_http(encoded: EncodedResponse) -> Response {
    let EncodedResponse {
        status,
        headers,
        body,
    } = encoded;
    (status, headers, body).into_response()
}

fn failure(url: &str, err: &EndpointError) -> Response {
    if err.is_client_error() {
        warn!(%url, status = err.status().as_u16(), code = err.code(), error = %err, "request failed");
    } else {
        error!(%url, status = err.status().as_u16(), error = ?err, "request failed");
    }
    ProblemResponse(Problem::from_endpoint_error(err).with_instance(url)).into_response()
}
