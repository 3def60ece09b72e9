use async_trait::async_trait;

use crate::codec::{RequestDecoder, ResponseEncoder};
use crate::error::EndpointError;
use crate::params::RouteParams;
use crate::request::{DecodedRequest, Request};
use crate::response::{EncodedResponse, Response};

/// One route: how to recognize it, how to decode its input, what to do, and
/// how to encode the answer.
///
/// ```ignore
/// fn does_match(&self, request: &Request) -> Option<RouteParams> {
///     if request.method != Method::GET {
///         return None;
///     }
///     parse_parameters(request.path(), "/members/@id", &[("id", ParamKind::Number)])
/// }
/// ```
#[async_trait]
pub trait Endpoint: Send + Sync + 'static {
    type Params: Send;
    type Query: Send;
    type Body: Send;
    type ResponseBody: Send;

    /// Route parameters when this endpoint serves `request`, `None` otherwise.
    fn does_match(&self, request: &Request) -> Option<RouteParams>;

    fn request_decoder(&self) -> &RequestDecoder<Self::Params, Self::Query, Self::Body>;

    fn response_encoder(&self) -> &ResponseEncoder<Self::ResponseBody>;

    async fn handle(
        &self,
        request: DecodedRequest<Self::Params, Self::Query, Self::Body>,
    ) -> Result<Response<Self::ResponseBody>, EndpointError>;

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Object-safe view of an [`Endpoint`] so the router can hold mixed endpoints.
#[async_trait]
pub trait DynEndpoint: Send + Sync {
    fn name(&self) -> &'static str;

    fn does_match(&self, request: &Request) -> Option<RouteParams>;

    /// Decode, handle and encode a request `does_match` accepted.
    async fn run(&self, request: Request, params: RouteParams) -> Result<EncodedResponse, EndpointError>;
}

#[async_trait]
impl<E: Endpoint> DynEndpoint for E {
    fn name(&self) -> &'static str {
        Endpoint::name(self)
    }

    fn does_match(&self, request: &Request) -> Option<RouteParams> {
        Endpoint::does_match(self, request)
    }

    async fn run(&self, request: Request, params: RouteParams) -> Result<EncodedResponse, EndpointError> {
        let accept = request.accept()?;
        let decoded = self.request_decoder().decode(request, params)?;
        let response = self.handle(decoded).await?;
        self.response_encoder().encode(&accept, response)
    }
}
