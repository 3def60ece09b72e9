//! Version selection through content negotiation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};
use simple_encoding::{
    ArrayDecoder, ContentDecoder, ContentEncoder, ContentType, Data, Decodable, DecodeError,
    Encodable, EncodeError, JsonContentDecoder, JsonContentEncoder, ObjectEncoder, StringDecoder,
    Versioned, VersionedContent,
};

#[derive(Debug, Clone, PartialEq)]
struct BarV1 {
    name: String,
}

#[derive(Debug, Clone, PartialEq)]
struct BarV2 {
    name: String,
    tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum Bar {
    V1(BarV1),
    V2(BarV2),
}

impl Decodable for BarV1 {
    fn decode(data: &Data<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            name: data.field("name")?.decode(&StringDecoder)?,
        })
    }
}

impl Encodable for BarV1 {
    fn encode(&self) -> Value {
        ObjectEncoder::new().field("name", &self.name).finish()
    }
}

impl VersionedContent for BarV1 {
    fn content_types() -> Vec<ContentType> {
        vec![ContentType::new("application/vnd.foo.Bar").with_parameter("version", "1")]
    }
}

impl Decodable for BarV2 {
    fn decode(data: &Data<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            name: data.field("name")?.decode(&StringDecoder)?,
            tags: data.field("tags")?.decode(&ArrayDecoder(StringDecoder))?,
        })
    }
}

impl Encodable for BarV2 {
    fn encode(&self) -> Value {
        ObjectEncoder::new()
            .field("name", &self.name)
            .field("tags", &self.tags)
            .finish()
    }
}

impl VersionedContent for BarV2 {
    fn content_types() -> Vec<ContentType> {
        vec![ContentType::new("application/vnd.foo.Bar").with_parameter("version", "2")]
    }
}

impl From<BarV1> for Bar {
    fn from(v: BarV1) -> Self {
        Bar::V1(v)
    }
}

impl From<BarV2> for Bar {
    fn from(v: BarV2) -> Self {
        Bar::V2(v)
    }
}

impl Encodable for Bar {
    fn encode(&self) -> Value {
        match self {
            Bar::V1(v) => v.encode(),
            Bar::V2(v) => v.encode(),
        }
    }
}

/// Wraps a version decoder and counts how often it runs.
struct Counting<D> {
    inner: D,
    calls: Arc<AtomicUsize>,
}

impl<D: ContentDecoder<Bar>> ContentDecoder<Bar> for Counting<D> {
    fn content_types(&self) -> Vec<ContentType> {
        self.inner.content_types()
    }

    fn decode_content(&self, content_type: &ContentType, data: &Data<'_>) -> Result<Bar, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.decode_content(content_type, data)
    }
}

fn ct(text: &str) -> ContentType {
    text.parse().unwrap()
}

fn encoders() -> Vec<Box<dyn ContentEncoder<Bar>>> {
    vec![
        Box::new(Versioned::<BarV1, Bar>::new()) as Box<dyn ContentEncoder<Bar>>,
        Box::new(Versioned::<BarV2, Bar>::new()),
    ]
}

#[test]
fn declared_version_selects_the_decoder() {
    let v1_calls = Arc::new(AtomicUsize::new(0));
    let v2_calls = Arc::new(AtomicUsize::new(0));
    let group = JsonContentDecoder::new(vec![
        Box::new(Counting {
            inner: Versioned::<BarV1, Bar>::new(),
            calls: v1_calls.clone(),
        }) as Box<dyn ContentDecoder<Bar>>,
        Box::new(Counting {
            inner: Versioned::<BarV2, Bar>::new(),
            calls: v2_calls.clone(),
        }),
    ]);
    let body = r#"{"name":"x","tags":["a"]}"#;

    for _ in 0..3 {
        let decoded = group
            .decode_content(&ct("application/vnd.foo.Bar+json;version=1"), body)
            .unwrap();
        assert_eq!(decoded, Bar::V1(BarV1 { name: "x".into() }));
    }
    assert_eq!(v1_calls.load(Ordering::SeqCst), 3);
    assert_eq!(v2_calls.load(Ordering::SeqCst), 0);

    let decoded = group
        .decode_content(&ct("application/vnd.foo.Bar+json;version=2"), body)
        .unwrap();
    assert!(matches!(decoded, Bar::V2(_)));
    assert_eq!(v2_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn unknown_version_is_rejected() {
    let group = JsonContentDecoder::new(vec![
        Box::new(Versioned::<BarV1, Bar>::new()) as Box<dyn ContentDecoder<Bar>>,
        Box::new(Versioned::<BarV2, Bar>::new()),
    ]);
    let err = group
        .decode_content(&ct("application/vnd.foo.Bar;version=3"), r#"{"name":"x"}"#)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Could not decode JSON to contentType application/vnd.foo.bar;version=3"
    );
    assert!(err.is_negotiation_failure());

    let err = group
        .decode_content(&ct("application/json"), r#"{"name":"x"}"#)
        .unwrap_err();
    assert!(err.is_negotiation_failure());
}

#[test]
fn unversioned_type_matches_no_version() {
    let group = JsonContentDecoder::new(vec![
        Box::new(Versioned::<BarV1, Bar>::new()) as Box<dyn ContentDecoder<Bar>>,
        Box::new(Versioned::<BarV2, Bar>::new()),
    ]);
    let err = group
        .decode_content(&ct("application/vnd.foo.Bar+json"), r#"{"name":"x"}"#)
        .unwrap_err();
    assert!(err.is_negotiation_failure());
    assert_eq!(
        err.to_string(),
        "Could not decode JSON to contentType application/vnd.foo.bar+json"
    );
}

#[test]
fn unversioned_accept_is_not_acceptable() {
    let encoder = JsonContentEncoder::new(encoders());
    let value = Bar::V1(BarV1 { name: "x".into() });
    let err = encoder
        .encode_content(&[ct("application/vnd.foo.Bar+json")], &value)
        .unwrap_err();
    assert!(err.is_negotiation_failure());
}

#[test]
fn malformed_json_fails_before_negotiation() {
    let group = JsonContentDecoder::new(vec![
        Box::new(Versioned::<BarV1, Bar>::new()) as Box<dyn ContentDecoder<Bar>>
    ]);
    let err = group
        .decode_content(&ct("application/vnd.foo.Bar;version=1"), "{not json")
        .unwrap_err();
    assert!(matches!(err, DecodeError::InvalidJson(_)));
}

#[test]
fn accept_projects_newer_values_onto_older_versions() {
    let encoder = JsonContentEncoder::new(encoders());
    let value = Bar::V2(BarV2 {
        name: "x".into(),
        tags: vec!["a".into()],
    });

    let accept = ContentType::parse_accept("application/vnd.foo.Bar+json;version=1").unwrap();
    let (content_type, body) = encoder.encode_content(&accept, &value).unwrap();
    assert_eq!(content_type.to_string(), "application/vnd.foo.bar+json;version=1");
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({ "name": "x" }));
}

#[test]
fn older_values_cannot_fill_newer_versions() {
    let encoder = JsonContentEncoder::new(encoders());
    let value = Bar::V1(BarV1 { name: "x".into() });
    let accept = vec![ct("application/vnd.foo.Bar;version=2")];
    let err = encoder.encode_content(&accept, &value).unwrap_err();
    assert!(matches!(err, EncodeError::Structure(_)));
}

#[test]
fn missing_encoder_for_requested_version_is_rejected() {
    let encoder = JsonContentEncoder::new(encoders());
    let value = Bar::V1(BarV1 { name: "x".into() });
    let accept = vec![ct("application/vnd.foo.Bar;version=9")];
    let err = encoder.encode_content(&accept, &value).unwrap_err();
    assert!(err.is_negotiation_failure());
}

#[test]
fn wildcard_uses_latest_encoder_and_pretty_prints() {
    let encoder = JsonContentEncoder::new(encoders()).pretty(true);
    let value = Bar::V2(BarV2 {
        name: "x".into(),
        tags: vec![],
    });
    let (content_type, body) = encoder
        .encode_content(&[ct("*/*")], &value)
        .unwrap();
    assert_eq!(content_type.version(), Some(2));
    assert_eq!(content_type.suffix(), Some("json"));
    assert!(body.contains('\n'));
}
