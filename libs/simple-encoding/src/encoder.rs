use serde_json::{Map, Value};

use crate::content_type::ContentType;
use crate::error::EncodeError;

/// Values that render themselves as JSON; the output-side counterpart of
/// [`Decodable`](crate::Decodable).
pub trait Encodable {
    fn encode(&self) -> Value;
}

/// An encoder that declares which content types it produces.
pub trait ContentEncoder<T>: Send + Sync {
    fn content_types(&self) -> Vec<ContentType>;

    fn encode_content(&self, content_type: &ContentType, value: &T) -> Result<Value, EncodeError>;
}

impl Encodable for String {
    fn encode(&self) -> Value {
        Value::String(self.clone())
    }
}

impl Encodable for str {
    fn encode(&self) -> Value {
        Value::String(self.to_owned())
    }
}

impl Encodable for f64 {
    fn encode(&self) -> Value {
        serde_json::Number::from_f64(*self)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

impl Encodable for i64 {
    fn encode(&self) -> Value {
        Value::from(*self)
    }
}

impl Encodable for bool {
    fn encode(&self) -> Value {
        Value::Bool(*self)
    }
}

impl Encodable for Value {
    fn encode(&self) -> Value {
        self.clone()
    }
}

impl Encodable for () {
    fn encode(&self) -> Value {
        Value::Null
    }
}

impl<T: Encodable> Encodable for Vec<T> {
    fn encode(&self) -> Value {
        Value::Array(self.iter().map(Encodable::encode).collect())
    }
}

impl<T: Encodable> Encodable for Option<T> {
    fn encode(&self) -> Value {
        self.as_ref().map_or(Value::Null, Encodable::encode)
    }
}

impl<T: Encodable + ?Sized> Encodable for &T {
    fn encode(&self) -> Value {
        (**self).encode()
    }
}

impl<T: Encodable + ?Sized> Encodable for Box<T> {
    fn encode(&self) -> Value {
        (**self).encode()
    }
}

/// Helper for record encoders: collects `key → value` pairs into a JSON object.
#[derive(Debug, Default)]
pub struct ObjectEncoder {
    map: Map<String, Value>,
}

impl ObjectEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field<T: Encodable + ?Sized>(mut self, key: &str, value: &T) -> Self {
        self.map.insert(key.to_owned(), value.encode());
        self
    }

    /// Like [`field`](Self::field) but leaves the key out when the value is `None`.
    pub fn optional_field<T: Encodable>(mut self, key: &str, value: &Option<T>) -> Self {
        if let Some(value) = value {
            self.map.insert(key.to_owned(), value.encode());
        }
        self
    }

    pub fn finish(self) -> Value {
        Value::Object(self.map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_and_collections_encode() {
        assert_eq!("x".to_string().encode(), json!("x"));
        assert_eq!(1.5f64.encode(), json!(1.5));
        assert_eq!(7i64.encode(), json!(7));
        assert_eq!(vec![true, false].encode(), json!([true, false]));
        assert_eq!(None::<String>.encode(), Value::Null);
        assert_eq!(f64::NAN.encode(), Value::Null);
    }

    #[test]
    fn object_encoder_skips_absent_optionals() {
        let value = ObjectEncoder::new()
            .field("firstName", "Simon")
            .optional_field("nickname", &None::<String>)
            .optional_field("age", &Some(30i64))
            .finish();
        assert_eq!(value, json!({ "firstName": "Simon", "age": 30 }));
    }
}
