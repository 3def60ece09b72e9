use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

/// Typed handler output, before the body is negotiated and serialized.
#[derive(Debug, Clone)]
pub struct Response<B> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: B,
}

impl<B> Response<B> {
    pub fn new(status: StatusCode, body: B) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    pub fn ok(body: B) -> Self {
        Self::new(StatusCode::OK, body)
    }

    pub fn created(body: B) -> Self {
        Self::new(StatusCode::CREATED, body)
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

impl Response<()> {
    pub fn no_content() -> Self {
        Self::new(StatusCode::NO_CONTENT, ())
    }
}

/// Serialized response, ready for the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl EncodedResponse {
    pub fn header(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}
