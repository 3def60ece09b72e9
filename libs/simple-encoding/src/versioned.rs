//! Glue between one schema version and the negotiated codec groups.
//!
//! Generated schema modules declare one struct per version and an `All` enum
//! over them. [`Versioned<V, T>`] registers version `V` in a group whose
//! values are `T` (usually that `All` enum).

use std::marker::PhantomData;

use serde_json::Value;

use crate::content_type::ContentType;
use crate::data::Data;
use crate::decoder::{ContentDecoder, Decodable};
use crate::encoder::{ContentEncoder, Encodable};
use crate::error::{DecodeError, EncodeError};

/// One generation of a versioned record.
pub trait VersionedContent: Decodable + Encodable {
    /// Types this version is negotiated under, most specific first.
    fn content_types() -> Vec<ContentType>;
}

pub struct Versioned<V, T> {
    _marker: PhantomData<fn() -> (V, T)>,
}

impl<V, T> Versioned<V, T> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<V, T> Default for Versioned<V, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, T> ContentDecoder<T> for Versioned<V, T>
where
    V: VersionedContent + Into<T>,
{
    fn content_types(&self) -> Vec<ContentType> {
        V::content_types()
    }

    fn decode_content(&self, _content_type: &ContentType, data: &Data<'_>) -> Result<T, DecodeError> {
        V::decode(data).map(Into::into)
    }
}

impl<V, T> ContentEncoder<T> for Versioned<V, T>
where
    V: VersionedContent,
    T: Encodable,
{
    fn content_types(&self) -> Vec<ContentType> {
        V::content_types()
    }

    /// Accepts a value of any version and projects it onto `V`: the value is
    /// encoded, read back through `V`'s decoder and encoded again, so fields `V`
    /// does not know are dropped and fields it requires must be present.
    fn encode_content(&self, _content_type: &ContentType, value: &T) -> Result<Value, EncodeError> {
        let source = value.encode();
        let projected = V::decode(&Data::new(&source))?;
        Ok(projected.encode())
    }
}
