use serde_json::Value;

use crate::decoder::Decoder;
use crate::error::DecodeError;

/// One node of a parsed JSON document, navigated while decoding.
///
/// Navigation never mutates: `field` and `index` return new nodes that borrow
/// from the same document and remember where they are (`$.records[0].name`).
#[derive(Debug, Clone)]
pub struct Data<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Data<'a> {
    /// Root node of a document.
    pub fn new(value: &'a Value) -> Self {
        Self {
            value,
            path: "$".to_string(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw JSON value of this node.
    pub fn value(&self) -> &'a Value {
        self.value
    }

    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// Required object member.
    ///
    /// A field is absent only when the key is missing (or this node is not an
    /// object). `0`, `""`, `false` and `null` are present values and are left to
    /// the field's decoder to accept or reject.
    pub fn field(&self, name: &str) -> Result<Data<'a>, DecodeError> {
        match self.value.as_object().and_then(|object| object.get(name)) {
            Some(value) => Ok(self.child(value, format!("{}.{}", self.path, name))),
            None => Err(DecodeError::FieldExpected {
                field: name.to_string(),
                path: self.path.clone(),
            }),
        }
    }

    /// Optional object member; missing keys and `null` both yield `None`.
    pub fn optional_field(&self, name: &str) -> Option<Data<'a>> {
        self.value
            .as_object()
            .and_then(|object| object.get(name))
            .filter(|value| !value.is_null())
            .map(|value| self.child(value, format!("{}.{}", self.path, name)))
    }

    pub fn index(&self, index: usize) -> Result<Data<'a>, DecodeError> {
        match self.value.as_array().and_then(|items| items.get(index)) {
            Some(value) => Ok(self.child(value, format!("{}[{}]", self.path, index))),
            None => Err(DecodeError::IndexExpected {
                index,
                path: self.path.clone(),
            }),
        }
    }

    /// All elements of an array node.
    pub fn items(&self) -> Result<Vec<Data<'a>>, DecodeError> {
        let items = self
            .value
            .as_array()
            .ok_or_else(|| DecodeError::type_mismatch("an array", &self.path))?;
        Ok(items
            .iter()
            .enumerate()
            .map(|(i, value)| self.child(value, format!("{}[{}]", self.path, i)))
            .collect())
    }

    pub fn string(&self) -> Result<&'a str, DecodeError> {
        self.value
            .as_str()
            .ok_or_else(|| DecodeError::type_mismatch("a string", &self.path))
    }

    pub fn number(&self) -> Result<f64, DecodeError> {
        self.value
            .as_f64()
            .ok_or_else(|| DecodeError::type_mismatch("a number", &self.path))
    }

    pub fn boolean(&self) -> Result<bool, DecodeError> {
        self.value
            .as_bool()
            .ok_or_else(|| DecodeError::type_mismatch("a boolean", &self.path))
    }

    pub fn decode<D>(&self, decoder: &D) -> Result<D::Output, DecodeError>
    where
        D: Decoder + ?Sized,
    {
        decoder.decode(self)
    }

    fn child(&self, value: &'a Value, path: String) -> Data<'a> {
        Data { value, path }
    }
}
