//! Declarative schema descriptions.
//!
//! Every operation that derives a schema returns a new value; a dictionary
//! that already served as one version is never changed by deriving the next.

use crate::error::BuildError;
use crate::render::{identifier, type_name};

/// Prefix of every negotiated schema content type.
pub const CONTENT_TYPE_PREFIX: &str = "application/vnd.stamhoofd.";

#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
    Array(Box<FieldType>),
    /// Missing or `null` on input, left out on output when absent.
    Optional(Box<FieldType>),
    Dictionary(Dictionary),
}

impl FieldType {
    pub fn array(items: FieldType) -> Self {
        Self::Array(Box::new(items))
    }

    pub fn optional(inner: FieldType) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// The nested record this type refers to, if any.
    pub(crate) fn dictionary(&self) -> Option<&Dictionary> {
        match self {
            Self::Array(inner) | Self::Optional(inner) => inner.dictionary(),
            Self::Dictionary(dictionary) => Some(dictionary),
            Self::String | Self::Number | Self::Integer | Self::Boolean => None,
        }
    }
}

/// One named field of a dictionary; `key` is the JSON key.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub field_type: FieldType,
}

/// A named record: one version of a schema, or a plain nested record.
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
    name: String,
    fields: Vec<Field>,
}

impl Dictionary {
    pub fn new<K: Into<String>>(
        name: impl Into<String>,
        keys: impl IntoIterator<Item = (K, FieldType)>,
    ) -> Result<Self, BuildError> {
        let name = name.into();
        check_identifier(&name)?;
        check_type_name(&name)?;
        Self {
            name,
            fields: Vec::new(),
        }
        .add(keys)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&FieldType> {
        self.fields
            .iter()
            .find(|field| field.key == key)
            .map(|field| &field.field_type)
    }

    pub fn content_type(&self) -> String {
        format!("{CONTENT_TYPE_PREFIX}{}", self.name)
    }

    /// A copy with `keys` appended.
    pub fn add<K: Into<String>>(
        &self,
        keys: impl IntoIterator<Item = (K, FieldType)>,
    ) -> Result<Self, BuildError> {
        let mut next = self.clone();
        for (key, field_type) in keys {
            let key = key.into();
            check_identifier(&key)?;
            let field = identifier(&key);
            if let Some(existing) = next.fields.iter().find(|f| identifier(&f.key) == field) {
                return Err(if existing.key == key {
                    BuildError::DuplicateKey {
                        dictionary: self.name.clone(),
                        key,
                    }
                } else {
                    BuildError::IdentifierCollision {
                        dictionary: self.name.clone(),
                        existing: existing.key.clone(),
                        key,
                        field,
                    }
                });
            }
            next.fields.push(Field { key, field_type });
        }
        Ok(next)
    }

    /// A copy without `keys`. Every key must exist.
    pub fn remove(&self, keys: &[&str]) -> Result<Self, BuildError> {
        let mut next = self.clone();
        for key in keys {
            let position = next
                .fields
                .iter()
                .position(|field| field.key == *key)
                .ok_or_else(|| BuildError::UnknownKey {
                    dictionary: self.name.clone(),
                    key: (*key).to_string(),
                })?;
            next.fields.remove(position);
        }
        Ok(next)
    }
}

/// All generations of one logical entity, numbered from 1 in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedDictionary {
    versions: Vec<Dictionary>,
}

impl VersionedDictionary {
    pub fn new(base: Dictionary) -> Self {
        Self {
            versions: vec![base],
        }
    }

    /// Append the next version. It must carry the entity's name.
    pub fn add_version(&mut self, next: Dictionary) -> Result<&mut Self, BuildError> {
        if next.name != self.name() {
            return Err(BuildError::VersionNameMismatch {
                expected: self.name().to_string(),
                found: next.name,
                version: self.versions.len() + 1,
            });
        }
        self.versions.push(next);
        Ok(self)
    }

    pub fn with_version(mut self, next: Dictionary) -> Result<Self, BuildError> {
        self.add_version(next)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.versions[0].name
    }

    pub fn versions(&self) -> &[Dictionary] {
        &self.versions
    }

    /// Version numbers paired with their dictionaries.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &Dictionary)> {
        self.versions.iter().enumerate().map(|(index, d)| (index + 1, d))
    }

    pub fn latest(&self) -> &Dictionary {
        &self.versions[self.versions.len() - 1]
    }

    pub fn content_type(&self, version: usize) -> String {
        format!("{CONTENT_TYPE_PREFIX}{};version={version}", self.name())
    }
}

/// A top-level entry of a generated file.
#[derive(Debug, Clone, PartialEq)]
pub enum Struct {
    Dictionary(Dictionary),
    Versioned(VersionedDictionary),
}

impl Struct {
    pub fn name(&self) -> &str {
        match self {
            Self::Dictionary(dictionary) => dictionary.name(),
            Self::Versioned(versioned) => versioned.name(),
        }
    }
}

impl From<Dictionary> for Struct {
    fn from(dictionary: Dictionary) -> Self {
        Self::Dictionary(dictionary)
    }
}

impl From<VersionedDictionary> for Struct {
    fn from(versioned: VersionedDictionary) -> Self {
        Self::Versioned(versioned)
    }
}

fn check_identifier(name: &str) -> Result<(), BuildError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(BuildError::InvalidIdentifier(name.to_string()))
    }
}

/// Generated files import `Value` and versioned modules define `All` and
/// `Version<N>`; a record by one of those names would shadow them.
fn check_type_name(name: &str) -> Result<(), BuildError> {
    let rendered = type_name(name);
    let reserved = match rendered.strip_prefix("Version") {
        Some(number) => !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit()),
        None => matches!(rendered.as_str(), "Value" | "All"),
    };
    if reserved {
        Err(BuildError::ReservedName(rendered))
    } else {
        Ok(())
    }
}
