//! # simple-encoding
//!
//! Content-type driven decoding and encoding of JSON payloads.
//!
//! - [`ContentType`] parses `type/subtype[+suffix][;key=value]*` and matches
//!   directionally: unset parts of the pattern are wildcards.
//! - [`Data`] is a read-only cursor over parsed JSON that decoders navigate.
//! - [`Decoder`] and [`Encodable`] convert between `Data` and typed values.
//! - [`JsonContentDecoder`] and [`JsonContentEncoder`] hold one codec per
//!   schema version and select by negotiated content type, so a request
//!   declaring `;version=1` is always read by the version 1 decoder.

pub mod content_type;
pub mod data;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod json;
mod negotiate;
pub mod versioned;

pub use content_type::{ContentType, VERSION_PARAMETER};
pub use data::Data;
pub use decoder::{
    ArrayDecoder, BooleanDecoder, ContentDecoder, Decodable, DecodeFn, Decoder, EmptyDecoder,
    EnumDecoder, IntegerDecoder, NumberDecoder, OptionalDecoder, StringDecoder, StructDecoder,
};
pub use encoder::{ContentEncoder, Encodable, ObjectEncoder};
pub use error::{ContentTypeError, DecodeError, EncodeError};
pub use json::{ContentEncoderGroup, JsonContentDecoder, JsonContentEncoder, JSON_SUFFIX};
pub use versioned::{Versioned, VersionedContent};
