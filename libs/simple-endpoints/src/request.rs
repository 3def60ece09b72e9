use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use simple_encoding::ContentType;

use crate::error::EndpointError;

/// A normalized inbound HTTP exchange, as handed over by the transport.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Path and query, e.g. `/members/42?expand=records`.
    pub url: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: String::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// The URL without its query string.
    pub fn path(&self) -> &str {
        match self.url.split_once('?') {
            Some((path, _)) => path,
            None => &self.url,
        }
    }

    /// The raw query string, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, query)| query)
    }

    /// Header value as text; non-UTF-8 values are treated as absent.
    pub fn header(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn content_type(&self) -> Result<Option<ContentType>, EndpointError> {
        self.header(&CONTENT_TYPE)
            .map(|value| {
                ContentType::from_string(value).map_err(|source| EndpointError::InvalidHeader {
                    header: "Content-Type",
                    source,
                })
            })
            .transpose()
    }

    /// Accepted types, most preferred first. A missing header accepts anything.
    pub fn accept(&self) -> Result<Vec<ContentType>, EndpointError> {
        match self.header(&ACCEPT) {
            Some(value) => {
                ContentType::parse_accept(value).map_err(|source| EndpointError::InvalidHeader {
                    header: "Accept",
                    source,
                })
            }
            None => Ok(Vec::new()),
        }
    }
}

/// A request whose route parameters, query and body have been decoded.
#[derive(Debug)]
pub struct DecodedRequest<P, Q, B> {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub params: P,
    pub query: Q,
    pub body: B,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_path_and_query() {
        let request = Request::get("/members/42?expand=records");
        assert_eq!(request.path(), "/members/42");
        assert_eq!(request.query(), Some("expand=records"));
        assert_eq!(Request::get("/members").query(), None);
    }

    #[test]
    fn parses_negotiation_headers() {
        let request = Request::post("/members")
            .with_header(
                CONTENT_TYPE,
                HeaderValue::from_static("application/vnd.stamhoofd.Member+json;version=2"),
            )
            .with_header(ACCEPT, HeaderValue::from_static("text/html;q=0.2, application/json"));

        let content_type = request.content_type().unwrap().unwrap();
        assert_eq!(content_type.version(), Some(2));
        let accept = request.accept().unwrap();
        assert_eq!(accept[0].name(), "application/json");
    }

    #[test]
    fn malformed_content_type_is_reported() {
        let request = Request::post("/members")
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json;broken"));
        let err = request.content_type().unwrap_err();
        assert_eq!(err.code(), "invalid_header");
    }
}
