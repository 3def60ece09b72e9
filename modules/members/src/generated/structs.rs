// @generated by struct-builder. Do not edit by hand.

use serde_json::Value;
use simple_encoding::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
}

impl Decodable for Record {
    fn decode(data: &Data<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            name: data.field("name")?.decode(&StringDecoder)?,
        })
    }
}

impl Encodable for Record {
    fn encode(&self) -> Value {
        ObjectEncoder::new()
            .field("name", &self.name)
            .finish()
    }
}

impl VersionedContent for Record {
    fn content_types() -> Vec<ContentType> {
        vec![ContentType::new("application/vnd.stamhoofd.Record")]
    }
}

pub mod member {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub struct Version1 {
        pub first_name: String,
        pub last_name: String,
    }

    impl Decodable for Version1 {
        fn decode(data: &Data<'_>) -> Result<Self, DecodeError> {
            Ok(Self {
                first_name: data.field("firstName")?.decode(&StringDecoder)?,
                last_name: data.field("lastName")?.decode(&StringDecoder)?,
            })
        }
    }

    impl Encodable for Version1 {
        fn encode(&self) -> Value {
            ObjectEncoder::new()
                .field("firstName", &self.first_name)
                .field("lastName", &self.last_name)
                .finish()
        }
    }

    impl VersionedContent for Version1 {
        fn content_types() -> Vec<ContentType> {
            vec![ContentType::new("application/vnd.stamhoofd.Member").with_parameter("version", "1")]
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Version2 {
        pub first_name: String,
        pub last_name: String,
        pub records: Vec<Record>,
    }

    impl Decodable for Version2 {
        fn decode(data: &Data<'_>) -> Result<Self, DecodeError> {
            Ok(Self {
                first_name: data.field("firstName")?.decode(&StringDecoder)?,
                last_name: data.field("lastName")?.decode(&StringDecoder)?,
                records: data.field("records")?.decode(&ArrayDecoder(StructDecoder::<Record>::new()))?,
            })
        }
    }

    impl Encodable for Version2 {
        fn encode(&self) -> Value {
            ObjectEncoder::new()
                .field("firstName", &self.first_name)
                .field("lastName", &self.last_name)
                .field("records", &self.records)
                .finish()
        }
    }

    impl VersionedContent for Version2 {
        fn content_types() -> Vec<ContentType> {
            vec![ContentType::new("application/vnd.stamhoofd.Member").with_parameter("version", "2")]
        }
    }

    /// Every version of `Member`.
    #[derive(Debug, Clone, PartialEq)]
    pub enum All {
        Version1(Version1),
        Version2(Version2),
    }

    impl From<Version1> for All {
        fn from(value: Version1) -> Self {
            Self::Version1(value)
        }
    }

    impl From<Version2> for All {
        fn from(value: Version2) -> Self {
            Self::Version2(value)
        }
    }

    impl Encodable for All {
        fn encode(&self) -> Value {
            match self {
                Self::Version1(value) => value.encode(),
                Self::Version2(value) => value.encode(),
            }
        }
    }

    pub fn all_decoders() -> Vec<Box<dyn ContentDecoder<All>>> {
        vec![
            Box::new(Versioned::<Version1, All>::new()),
            Box::new(Versioned::<Version2, All>::new()),
        ]
    }

    pub fn all_encoders() -> Vec<Box<dyn ContentEncoder<All>>> {
        vec![
            Box::new(Versioned::<Version1, All>::new()),
            Box::new(Versioned::<Version2, All>::new()),
        ]
    }
}
