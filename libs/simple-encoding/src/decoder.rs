use std::marker::PhantomData;

use crate::content_type::ContentType;
use crate::data::Data;
use crate::error::DecodeError;

/// Turns a [`Data`] node into a typed value.
///
/// Decoders are stateless values; scalar decoders are unit structs.
pub trait Decoder {
    type Output;

    fn decode(&self, data: &Data<'_>) -> Result<Self::Output, DecodeError>;
}

impl<D: Decoder + ?Sized> Decoder for &D {
    type Output = D::Output;

    fn decode(&self, data: &Data<'_>) -> Result<Self::Output, DecodeError> {
        (**self).decode(data)
    }
}

impl<D: Decoder + ?Sized> Decoder for Box<D> {
    type Output = D::Output;

    fn decode(&self, data: &Data<'_>) -> Result<Self::Output, DecodeError> {
        (**self).decode(data)
    }
}

/// Record types that know how to decode themselves.
pub trait Decodable: Sized {
    fn decode(data: &Data<'_>) -> Result<Self, DecodeError>;
}

/// A decoder that also declares which content types it understands.
///
/// Several of these, one per schema version, are grouped into a
/// [`JsonContentDecoder`](crate::JsonContentDecoder) that picks one by
/// negotiation.
pub trait ContentDecoder<T>: Send + Sync {
    fn content_types(&self) -> Vec<ContentType>;

    fn decode_content(&self, content_type: &ContentType, data: &Data<'_>)
        -> Result<T, DecodeError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StringDecoder;

impl Decoder for StringDecoder {
    type Output = String;

    fn decode(&self, data: &Data<'_>) -> Result<String, DecodeError> {
        data.string().map(str::to_owned)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NumberDecoder;

impl Decoder for NumberDecoder {
    type Output = f64;

    fn decode(&self, data: &Data<'_>) -> Result<f64, DecodeError> {
        data.number()
    }
}

/// Whole numbers only; `3.0` is accepted, `3.5` is not.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerDecoder;

impl Decoder for IntegerDecoder {
    type Output = i64;

    fn decode(&self, data: &Data<'_>) -> Result<i64, DecodeError> {
        if let Some(value) = data.value().as_i64() {
            return Ok(value);
        }
        match data.value().as_f64() {
            Some(value) if value.fract() == 0.0 && value.abs() < i64::MAX as f64 => {
                Ok(value as i64)
            }
            _ => Err(DecodeError::type_mismatch("an integer", data.path())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanDecoder;

impl Decoder for BooleanDecoder {
    type Output = bool;

    fn decode(&self, data: &Data<'_>) -> Result<bool, DecodeError> {
        data.boolean()
    }
}

/// A string restricted to a fixed set of values.
#[derive(Debug, Clone)]
pub struct EnumDecoder {
    allowed: Vec<String>,
}

impl EnumDecoder {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }
}

impl Decoder for EnumDecoder {
    type Output = String;

    fn decode(&self, data: &Data<'_>) -> Result<String, DecodeError> {
        let value = data.string()?;
        if self.allowed.iter().any(|allowed| allowed == value) {
            Ok(value.to_owned())
        } else {
            Err(DecodeError::UnknownValue {
                value: value.to_owned(),
                allowed: self.allowed.clone(),
                path: data.path().to_owned(),
            })
        }
    }
}

/// Decodes every element of an array node with the inner decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayDecoder<D>(pub D);

impl<D: Decoder> Decoder for ArrayDecoder<D> {
    type Output = Vec<D::Output>;

    fn decode(&self, data: &Data<'_>) -> Result<Self::Output, DecodeError> {
        data.items()?
            .iter()
            .map(|item| self.0.decode(item))
            .collect()
    }
}

/// `null` becomes `None`; anything else goes through the inner decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalDecoder<D>(pub D);

impl<D: Decoder> Decoder for OptionalDecoder<D> {
    type Output = Option<D::Output>;

    fn decode(&self, data: &Data<'_>) -> Result<Self::Output, DecodeError> {
        if data.is_null() {
            Ok(None)
        } else {
            self.0.decode(data).map(Some)
        }
    }
}

/// Adapts a [`Decodable`] record type into a decoder value.
pub struct StructDecoder<T>(PhantomData<fn() -> T>);

impl<T> StructDecoder<T> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for StructDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for StructDecoder<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StructDecoder<T> {}

impl<T: Decodable> Decoder for StructDecoder<T> {
    type Output = T;

    fn decode(&self, data: &Data<'_>) -> Result<T, DecodeError> {
        T::decode(data)
    }
}

/// Adapts a plain function or closure into a decoder.
#[derive(Clone, Copy)]
pub struct DecodeFn<F>(pub F);

impl<F, T> Decoder for DecodeFn<F>
where
    F: Fn(&Data<'_>) -> Result<T, DecodeError>,
{
    type Output = T;

    fn decode(&self, data: &Data<'_>) -> Result<T, DecodeError> {
        (self.0)(data)
    }
}

/// Accepts any input and produces `()`; used where an endpoint expects nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyDecoder;

impl Decoder for EmptyDecoder {
    type Output = ();

    fn decode(&self, _data: &Data<'_>) -> Result<(), DecodeError> {
        Ok(())
    }
}
