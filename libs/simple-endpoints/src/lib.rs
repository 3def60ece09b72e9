//! # simple-endpoints
//!
//! Request routing on top of `simple-encoding`.
//!
//! A [`Router`] tries its endpoints in registration order. The first whose
//! [`Endpoint::does_match`] accepts the request decodes it with its
//! [`RequestDecoder`] (the body version is picked from `Content-Type`), runs
//! the handler, and serializes the [`Response`] with its [`ResponseEncoder`]
//! (the output version is picked from `Accept`).

pub mod codec;
pub mod endpoint;
pub mod error;
pub mod params;
pub mod request;
pub mod response;
pub mod router;

pub use codec::{BodyDecoder, BodyEncoder, NoBody, NoContent, RequestDecoder, ResponseEncoder};
pub use endpoint::{DynEndpoint, Endpoint};
pub use error::EndpointError;
pub use params::{parse_parameters, parse_query, ParamKind, RouteParams, PARAM_MARKER};
pub use request::{DecodedRequest, Request};
pub use response::{EncodedResponse, Response};
pub use router::Router;
