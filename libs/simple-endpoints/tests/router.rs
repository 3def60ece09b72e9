//! Dispatch, negotiation and error mapping through the router.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderValue, Method, StatusCode};
use serde_json::{json, Value};
use simple_encoding::{
    ContentDecoder, ContentEncoder, ContentType, Data, Decodable, DecodeError, Encodable,
    EncodeError, IntegerDecoder, JsonContentDecoder, JsonContentEncoder, ObjectEncoder,
    OptionalDecoder, StringDecoder, StructDecoder, Versioned, VersionedContent,
};
use simple_endpoints::{
    parse_parameters, BodyEncoder, DecodedRequest, Endpoint, EndpointError, ParamKind, Request,
    RequestDecoder, Response, ResponseEncoder, RouteParams, Router,
};

const GREETING: &str = "application/vnd.test.Greeting";

#[derive(Debug, Clone, PartialEq)]
struct GreetingV1 {
    text: String,
}

#[derive(Debug, Clone, PartialEq)]
struct GreetingV2 {
    text: String,
    language: String,
}

#[derive(Debug, Clone, PartialEq)]
enum Greeting {
    V1(GreetingV1),
    V2(GreetingV2),
}

impl Decodable for GreetingV1 {
    fn decode(data: &Data<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            text: data.field("text")?.decode(&StringDecoder)?,
        })
    }
}

impl Encodable for GreetingV1 {
    fn encode(&self) -> Value {
        ObjectEncoder::new().field("text", &self.text).finish()
    }
}

impl VersionedContent for GreetingV1 {
    fn content_types() -> Vec<ContentType> {
        vec![ContentType::new(GREETING).with_parameter("version", "1")]
    }
}

impl Decodable for GreetingV2 {
    fn decode(data: &Data<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            text: data.field("text")?.decode(&StringDecoder)?,
            language: data.field("language")?.decode(&StringDecoder)?,
        })
    }
}

impl Encodable for GreetingV2 {
    fn encode(&self) -> Value {
        ObjectEncoder::new()
            .field("text", &self.text)
            .field("language", &self.language)
            .finish()
    }
}

impl VersionedContent for GreetingV2 {
    fn content_types() -> Vec<ContentType> {
        vec![ContentType::new(GREETING).with_parameter("version", "2")]
    }
}

impl From<GreetingV1> for Greeting {
    fn from(value: GreetingV1) -> Self {
        Self::V1(value)
    }
}

impl From<GreetingV2> for Greeting {
    fn from(value: GreetingV2) -> Self {
        Self::V2(value)
    }
}

impl Encodable for Greeting {
    fn encode(&self) -> Value {
        match self {
            Self::V1(value) => value.encode(),
            Self::V2(value) => value.encode(),
        }
    }
}

#[derive(Debug)]
struct GreetingParams {
    id: i64,
}

impl Decodable for GreetingParams {
    fn decode(data: &Data<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            id: data.field("id")?.decode(&IntegerDecoder)?,
        })
    }
}

#[derive(Debug)]
struct GreetingQuery {
    shout: Option<String>,
}

impl Decodable for GreetingQuery {
    fn decode(data: &Data<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            shout: data
                .optional_field("shout")
                .map(|field| field.decode(&OptionalDecoder(StringDecoder)))
                .transpose()?
                .flatten(),
        })
    }
}

/// `PUT /greetings/@id`: echoes the body back, upgraded to the latest version.
struct PutGreeting {
    decoder: RequestDecoder<GreetingParams, GreetingQuery, Greeting>,
    encoder: ResponseEncoder<Greeting>,
    handled: Arc<AtomicUsize>,
}

impl PutGreeting {
    fn new(handled: Arc<AtomicUsize>) -> Self {
        let decoders: Vec<Box<dyn ContentDecoder<Greeting>>> = vec![
            Box::new(Versioned::<GreetingV1, Greeting>::new()),
            Box::new(Versioned::<GreetingV2, Greeting>::new()),
        ];
        let encoders: Vec<Box<dyn ContentEncoder<Greeting>>> = vec![
            Box::new(Versioned::<GreetingV1, Greeting>::new()),
            Box::new(Versioned::<GreetingV2, Greeting>::new()),
        ];
        Self {
            decoder: RequestDecoder::new(
                StructDecoder::<GreetingParams>::new(),
                StructDecoder::<GreetingQuery>::new(),
                JsonContentDecoder::new(decoders),
            ),
            encoder: ResponseEncoder::new(JsonContentEncoder::new(encoders)),
            handled,
        }
    }
}

#[async_trait]
impl Endpoint for PutGreeting {
    type Params = GreetingParams;
    type Query = GreetingQuery;
    type Body = Greeting;
    type ResponseBody = Greeting;

    fn does_match(&self, request: &Request) -> Option<RouteParams> {
        if request.method != Method::PUT {
            return None;
        }
        parse_parameters(request.path(), "/greetings/@id", &[("id", ParamKind::Number)])
    }

    fn request_decoder(&self) -> &RequestDecoder<GreetingParams, GreetingQuery, Greeting> {
        &self.decoder
    }

    fn response_encoder(&self) -> &ResponseEncoder<Greeting> {
        &self.encoder
    }

    async fn handle(
        &self,
        request: DecodedRequest<GreetingParams, GreetingQuery, Greeting>,
    ) -> Result<Response<Greeting>, EndpointError> {
        self.handled.fetch_add(1, Ordering::SeqCst);
        if request.params.id == 0 {
            return Err(EndpointError::not_found("Greeting 0 not found"));
        }
        let mut upgraded = match request.body {
            Greeting::V1(v1) => GreetingV2 {
                text: v1.text,
                language: "nl".to_string(),
            },
            Greeting::V2(v2) => v2,
        };
        if request.query.shout.is_some() {
            upgraded.text = upgraded.text.to_uppercase();
        }
        Ok(Response::ok(Greeting::V2(upgraded)))
    }
}

struct Text;

impl BodyEncoder<String> for Text {
    fn encode_body(
        &self,
        _accept: &[ContentType],
        body: &String,
    ) -> Result<Option<(ContentType, String)>, EncodeError> {
        Ok(Some((ContentType::new("text/plain"), body.clone())))
    }
}

/// `GET /ping`, answering with a fixed label.
struct Ping {
    label: &'static str,
    decoder: RequestDecoder<(), (), ()>,
    encoder: ResponseEncoder<String>,
}

impl Ping {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            decoder: RequestDecoder::empty(),
            encoder: ResponseEncoder::new(Text),
        }
    }
}

#[async_trait]
impl Endpoint for Ping {
    type Params = ();
    type Query = ();
    type Body = ();
    type ResponseBody = String;

    fn does_match(&self, request: &Request) -> Option<RouteParams> {
        if request.method != Method::GET {
            return None;
        }
        parse_parameters(request.path(), "/ping", &[])
    }

    fn request_decoder(&self) -> &RequestDecoder<(), (), ()> {
        &self.decoder
    }

    fn response_encoder(&self) -> &ResponseEncoder<String> {
        &self.encoder
    }

    async fn handle(&self, _request: DecodedRequest<(), (), ()>) -> Result<Response<String>, EndpointError> {
        Ok(Response::ok(self.label.to_string()))
    }
}

fn put_greeting(url: &str, content_type: &'static str, body: Value) -> Request {
    Request::new(Method::PUT, url)
        .with_header(CONTENT_TYPE, HeaderValue::from_static(content_type))
        .with_body(body.to_string())
}

fn greeting_router() -> (Router, Arc<AtomicUsize>) {
    let handled = Arc::new(AtomicUsize::new(0));
    (Router::new().with(PutGreeting::new(handled.clone())), handled)
}

#[tokio::test]
async fn first_registered_endpoint_wins() {
    let router = Router::new().with(Ping::new("first")).with(Ping::new("second"));
    for _ in 0..5 {
        let response = router.run(Request::get("/ping")).await.unwrap().unwrap();
        assert_eq!(response.body, "first");
        assert_eq!(response.header(&CONTENT_TYPE), Some("text/plain"));
    }
}

#[tokio::test]
async fn unmatched_requests_yield_none() {
    let (router, handled) = greeting_router();
    let wrong_method = Request::get("/greetings/1");
    assert!(router.run(wrong_method).await.unwrap().is_none());

    let not_a_number = put_greeting("/greetings/abc", "application/json", json!({}));
    assert!(router.run(not_a_number).await.unwrap().is_none());
    assert_eq!(handled.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn body_version_follows_content_type() {
    let (router, _) = greeting_router();
    let request = put_greeting(
        "/greetings/3?shout=yes",
        "application/vnd.test.Greeting+json;version=1",
        json!({ "text": "hallo", "language": "ignored" }),
    );
    let response = router.run(request).await.unwrap().unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.header(&CONTENT_TYPE),
        Some("application/vnd.test.greeting+json;version=2")
    );
    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body, json!({ "text": "HALLO", "language": "nl" }));
}

#[tokio::test]
async fn response_version_follows_accept() {
    let (router, _) = greeting_router();
    let request = put_greeting(
        "/greetings/3",
        "application/vnd.test.Greeting+json;version=2",
        json!({ "text": "hallo", "language": "en" }),
    )
    .with_header(ACCEPT, HeaderValue::from_static("application/vnd.test.Greeting+json;version=1"));
    let response = router.run(request).await.unwrap().unwrap();

    assert_eq!(
        response.header(&CONTENT_TYPE),
        Some("application/vnd.test.greeting+json;version=1")
    );
    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body, json!({ "text": "hallo" }));
}

#[tokio::test]
async fn unknown_accept_version_is_not_acceptable() {
    let (router, _) = greeting_router();
    let request = put_greeting(
        "/greetings/3",
        "application/vnd.test.Greeting;version=2",
        json!({ "text": "hallo", "language": "en" }),
    )
    .with_header(ACCEPT, HeaderValue::from_static("application/vnd.test.Greeting;version=3"));
    let err = router.run(request).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
async fn decode_failures_map_to_client_errors() {
    let (router, handled) = greeting_router();

    let missing_field = put_greeting(
        "/greetings/3",
        "application/vnd.test.Greeting;version=2",
        json!({ "text": "hallo" }),
    );
    let err = router.run(missing_field).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.to_string(), "Field language expected");

    let unknown_type = put_greeting("/greetings/3", "text/plain", json!({ "text": "hallo" }));
    let err = router.run(unknown_type).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let no_type = Request::new(Method::PUT, "/greetings/3").with_body("{}");
    let err = router.run(no_type).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    assert_eq!(handled.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn handler_errors_pass_through() {
    let (router, handled) = greeting_router();
    let request = put_greeting(
        "/greetings/0",
        "application/vnd.test.Greeting;version=1",
        json!({ "text": "hallo" }),
    );
    let err = router.run(request).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert_eq!(handled.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn bodies_without_content_type_are_unsupported() {
    let (router, handled) = greeting_router();
    let request = Request::new(Method::PUT, "/greetings/3").with_body(r#"{"text":"hallo"}"#);

    let err = router.run(request).await.unwrap_err();

    assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(err.code(), "unsupported_content_type");
    assert_eq!(err.to_string(), "Missing Content-Type");
    assert_eq!(handled.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn bodyless_endpoints_ignore_content_type() {
    let router = Router::new().with(Ping::new("pong"));
    let request = Request::get("/ping")
        .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json;broken"));

    let response = router.run(request).await.unwrap().unwrap();

    assert_eq!(response.body, "pong");
}
