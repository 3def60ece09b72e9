//! JSON bodies negotiated across several schema versions.

use serde_json::Value;
use tracing::debug;

use crate::content_type::ContentType;
use crate::data::Data;
use crate::decoder::ContentDecoder;
use crate::encoder::ContentEncoder;
use crate::error::{DecodeError, EncodeError};
use crate::negotiate;

/// Structured-syntax suffix added to negotiated response types.
pub const JSON_SUFFIX: &str = "json";

/// Decodes JSON bodies with the version whose content type matches the request.
///
/// The declared `Content-Type` decides which version runs, not the shape of the
/// payload.
pub struct JsonContentDecoder<T> {
    decoders: Vec<Box<dyn ContentDecoder<T>>>,
}

impl<T> JsonContentDecoder<T> {
    pub fn new(decoders: Vec<Box<dyn ContentDecoder<T>>>) -> Self {
        Self { decoders }
    }

    /// Every content type accepted by any registered version.
    pub fn content_types(&self) -> Vec<ContentType> {
        self.decoders
            .iter()
            .flat_map(|decoder| decoder.content_types())
            .collect()
    }

    pub fn decode_content(&self, content_type: &ContentType, body: &str) -> Result<T, DecodeError> {
        let value: Value = serde_json::from_str(body)?;
        self.decode_value(content_type, &value)
    }

    pub fn decode_value(&self, content_type: &ContentType, value: &Value) -> Result<T, DecodeError> {
        let decoder = negotiate::select(&self.decoders, |d| d.content_types(), content_type)
            .ok_or_else(|| DecodeError::UnsupportedContentType {
                content_type: content_type.to_string(),
            })?;
        decoder.decode_content(content_type, &Data::new(value))
    }
}

/// Selects the encoder for the first acceptable type.
pub struct ContentEncoderGroup<T> {
    encoders: Vec<Box<dyn ContentEncoder<T>>>,
}

impl<T> ContentEncoderGroup<T> {
    pub fn new(encoders: Vec<Box<dyn ContentEncoder<T>>>) -> Self {
        Self { encoders }
    }

    pub fn content_types(&self) -> Vec<ContentType> {
        self.encoders
            .iter()
            .flat_map(|encoder| encoder.content_types())
            .collect()
    }

    /// Encode `value` for the first entry of `accept` some encoder produces.
    ///
    /// An empty list or `*/*` expresses no preference and gets the latest
    /// registered encoder; this applies to `Accept` only, decoding always needs
    /// a matching type. Returns the content type the chosen encoder declares
    /// together with the JSON value.
    pub fn encode_content(
        &self,
        accept: &[ContentType],
        value: &T,
    ) -> Result<(ContentType, Value), EncodeError> {
        if accept.is_empty() {
            return self.encode_unspecified(value);
        }

        for requested in accept {
            if requested.is_wildcard() {
                return self.encode_unspecified(value);
            }
            if let Some(encoder) =
                negotiate::select(&self.encoders, |e| e.content_types(), requested)
            {
                let declared = preferred_type(encoder.content_types(), requested);
                let encoded = encoder.encode_content(requested, value)?;
                return Ok((declared, encoded));
            }
        }

        Err(EncodeError::UnsupportedContentType {
            content_type: accept
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    fn encode_unspecified(&self, value: &T) -> Result<(ContentType, Value), EncodeError> {
        let encoder = self
            .encoders
            .last()
            .ok_or_else(|| EncodeError::UnsupportedContentType {
                content_type: "*/*".to_string(),
            })?;
        let declared = encoder
            .content_types()
            .into_iter()
            .next()
            .ok_or_else(|| EncodeError::UnsupportedContentType {
                content_type: "*/*".to_string(),
            })?;
        debug!(content_type = %declared, "no specific type requested, using latest encoder");
        let encoded = encoder.encode_content(&declared, value)?;
        Ok((declared, encoded))
    }
}

/// The declared type that matched the request, else the encoder's first one.
fn preferred_type(declared: Vec<ContentType>, requested: &ContentType) -> ContentType {
    let fallback = declared.first().cloned();
    declared
        .into_iter()
        .find(|candidate| candidate.matches(requested))
        .or(fallback)
        .unwrap_or_else(|| requested.clone())
}

/// Serializes the negotiated encoder's output as JSON text.
pub struct JsonContentEncoder<T> {
    group: ContentEncoderGroup<T>,
    pretty: bool,
}

impl<T> JsonContentEncoder<T> {
    pub fn new(encoders: Vec<Box<dyn ContentEncoder<T>>>) -> Self {
        Self {
            group: ContentEncoderGroup::new(encoders),
            pretty: false,
        }
    }

    /// Pretty-print output; meant for development builds.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn content_types(&self) -> Vec<ContentType> {
        self.group.content_types()
    }

    /// Returns the response content type (with a `+json` suffix) and the body text.
    pub fn encode_content(
        &self,
        accept: &[ContentType],
        value: &T,
    ) -> Result<(ContentType, String), EncodeError> {
        let (content_type, encoded) = self.group.encode_content(accept, value)?;
        let body = if self.pretty {
            serde_json::to_string_pretty(&encoded)?
        } else {
            serde_json::to_string(&encoded)?
        };
        let content_type = match content_type.suffix() {
            Some(_) => content_type,
            None => content_type.with_suffix(JSON_SUFFIX),
        };
        Ok((content_type, body))
    }
}
