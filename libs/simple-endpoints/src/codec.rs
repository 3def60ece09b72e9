//! Per-endpoint request decoding and response encoding.

use http::header::CONTENT_TYPE;
use http::HeaderValue;
use serde_json::Value;
use simple_encoding::{
    ContentType, Data, DecodeError, Decoder, EmptyDecoder, EncodeError, JsonContentDecoder,
    JsonContentEncoder,
};
use tracing::debug;

use crate::error::EndpointError;
use crate::params::{parse_query, RouteParams};
use crate::request::{DecodedRequest, Request};
use crate::response::{EncodedResponse, Response};

/// Decodes a raw request body given its declared content type.
pub trait BodyDecoder<B>: Send + Sync {
    fn decode_body(&self, content_type: Option<&ContentType>, body: &str) -> Result<B, DecodeError>;

    /// Whether `Content-Type` is parsed for this decoder at all.
    fn reads_content_type(&self) -> bool {
        true
    }
}

impl<T> BodyDecoder<T> for JsonContentDecoder<T> {
    fn decode_body(&self, content_type: Option<&ContentType>, body: &str) -> Result<T, DecodeError> {
        let content_type = content_type.ok_or(DecodeError::MissingContentType)?;
        self.decode_content(content_type, body)
    }
}

/// For endpoints that take no body. Whatever was sent is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBody;

impl BodyDecoder<()> for NoBody {
    fn decode_body(&self, _content_type: Option<&ContentType>, _body: &str) -> Result<(), DecodeError> {
        Ok(())
    }

    fn reads_content_type(&self) -> bool {
        false
    }
}

/// Serializes a typed body for the negotiated `Accept` types.
///
/// Returns `None` when the response has no body.
pub trait BodyEncoder<B>: Send + Sync {
    fn encode_body(
        &self,
        accept: &[ContentType],
        body: &B,
    ) -> Result<Option<(ContentType, String)>, EncodeError>;
}

impl<T> BodyEncoder<T> for JsonContentEncoder<T> {
    fn encode_body(
        &self,
        accept: &[ContentType],
        body: &T,
    ) -> Result<Option<(ContentType, String)>, EncodeError> {
        self.encode_content(accept, body).map(Some)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoContent;

impl BodyEncoder<()> for NoContent {
    fn encode_body(
        &self,
        _accept: &[ContentType],
        _body: &(),
    ) -> Result<Option<(ContentType, String)>, EncodeError> {
        Ok(None)
    }
}

type BoxedDecoder<T> = Box<dyn Decoder<Output = T> + Send + Sync>;

/// Decodes the route parameters, the query and the body of a matched request.
pub struct RequestDecoder<P, Q, B> {
    params: BoxedDecoder<P>,
    query: BoxedDecoder<Q>,
    body: Box<dyn BodyDecoder<B>>,
}

impl RequestDecoder<(), (), ()> {
    /// Ignores parameters, query and body.
    pub fn empty() -> Self {
        Self::new(EmptyDecoder, EmptyDecoder, NoBody)
    }
}

impl<P, Q, B> RequestDecoder<P, Q, B> {
    pub fn new(
        params: impl Decoder<Output = P> + Send + Sync + 'static,
        query: impl Decoder<Output = Q> + Send + Sync + 'static,
        body: impl BodyDecoder<B> + 'static,
    ) -> Self {
        Self {
            params: Box::new(params),
            query: Box::new(query),
            body: Box::new(body),
        }
    }

    pub fn decode(
        &self,
        request: Request,
        params: RouteParams,
    ) -> Result<DecodedRequest<P, Q, B>, EndpointError> {
        let params_value = Value::Object(params);
        let params = self.params.decode(&Data::new(&params_value))?;

        let query_value = Value::Object(parse_query(request.query()));
        let query = self.query.decode(&Data::new(&query_value))?;

        let content_type = if self.body.reads_content_type() {
            request.content_type()?
        } else {
            None
        };
        let body = self.body.decode_body(content_type.as_ref(), &request.body)?;
        if let Some(content_type) = &content_type {
            debug!(%content_type, url = %request.url, "request decoded");
        }

        Ok(DecodedRequest {
            method: request.method,
            url: request.url,
            headers: request.headers,
            params,
            query,
            body,
        })
    }
}

/// Serializes handler responses against the request's `Accept` header.
pub struct ResponseEncoder<B> {
    body: Box<dyn BodyEncoder<B>>,
}

impl ResponseEncoder<()> {
    pub fn empty() -> Self {
        Self::new(NoContent)
    }
}

impl<B> ResponseEncoder<B> {
    pub fn new(body: impl BodyEncoder<B> + 'static) -> Self {
        Self {
            body: Box::new(body),
        }
    }

    pub fn encode(
        &self,
        accept: &[ContentType],
        response: Response<B>,
    ) -> Result<EncodedResponse, EndpointError> {
        let mut headers = response.headers;
        let body = match self.body.encode_body(accept, &response.body)? {
            Some((content_type, text)) => {
                let value = HeaderValue::from_str(&content_type.to_string())
                    .map_err(|err| anyhow::anyhow!("invalid negotiated content type {content_type}: {err}"))?;
                headers.insert(CONTENT_TYPE, value);
                text
            }
            None => String::new(),
        };
        Ok(EncodedResponse {
            status: response.status,
            headers,
            body,
        })
    }
}
