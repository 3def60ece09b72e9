//! MIME types with structured-syntax suffixes and parameters.
//!
//! Matching is directional: a [`ContentType`] acts as a pattern where every
//! suffix or parameter it leaves unset is a wildcard. A general decoder type
//! such as `application/vnd.foo.bar` therefore matches the more specific
//! `application/vnd.foo.bar+json;version=2`, while `...;version=2` rejects
//! `...;version=1`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ContentTypeError;

/// Parameter that carries the schema generation of a negotiated type.
pub const VERSION_PARAMETER: &str = "version";

/// Weight parameter of `Accept` entries.
const QUALITY_PARAMETER: &str = "q";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentType {
    name: String,
    suffix: Option<String>,
    parameters: BTreeMap<String, String>,
}

impl ContentType {
    /// Build a content type without suffix or parameters. The name is trimmed and lower-cased.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: name.as_ref().trim().to_ascii_lowercase(),
            suffix: None,
            parameters: BTreeMap::new(),
        }
    }

    /// Parse `type/subtype[+suffix][;key=value]*`.
    pub fn from_string(text: &str) -> Result<Self, ContentTypeError> {
        let mut segments = text.split(';');
        let base = segments.next().map(str::trim).unwrap_or_default();
        if base.is_empty() {
            return Err(ContentTypeError::Empty);
        }

        let (name, suffix) = match base.rsplit_once('+') {
            Some((name, suffix)) if !suffix.trim().is_empty() => {
                (name, Some(suffix.trim().to_ascii_lowercase()))
            }
            Some((name, _)) => (name, None),
            None => (base, None),
        };

        let mut parameters = BTreeMap::new();
        for segment in segments {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let (key, value) =
                segment
                    .split_once('=')
                    .ok_or_else(|| ContentTypeError::MissingEquals {
                        segment: segment.to_string(),
                    })?;
            parameters.insert(
                key.trim().to_ascii_lowercase(),
                value.trim().trim_matches('"').to_string(),
            );
        }

        Ok(Self {
            name: name.trim().to_ascii_lowercase(),
            suffix,
            parameters,
        })
    }

    /// Parse an `Accept` header into its entries, most preferred first.
    ///
    /// Entries are ordered by their `q` weight; equal weights keep header order.
    /// Entries with `q=0` are dropped, and the `q` parameter itself is removed.
    pub fn parse_accept(header: &str) -> Result<Vec<ContentType>, ContentTypeError> {
        let mut weighted = Vec::new();
        for entry in header.split(',') {
            if entry.trim().is_empty() {
                continue;
            }
            let mut content_type = Self::from_string(entry)?;
            let quality = content_type
                .parameters
                .remove(QUALITY_PARAMETER)
                .and_then(|q| q.parse::<f32>().ok())
                .unwrap_or(1.0);
            if quality > 0.0 {
                weighted.push((quality, content_type));
            }
        }
        weighted.sort_by(|a, b| b.0.total_cmp(&a.0));
        Ok(weighted.into_iter().map(|(_, ct)| ct).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Value of the `version` parameter, if present and numeric.
    pub fn version(&self) -> Option<u32> {
        self.parameter(VERSION_PARAMETER)?.parse().ok()
    }

    /// `*/*`
    pub fn is_wildcard(&self) -> bool {
        self.name == "*/*"
    }

    pub fn with_suffix(mut self, suffix: impl AsRef<str>) -> Self {
        self.suffix = Some(suffix.as_ref().trim().to_ascii_lowercase());
        self
    }

    pub fn with_parameter(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.parameters
            .insert(key.as_ref().trim().to_ascii_lowercase(), value.into());
        self
    }

    pub fn remove_suffix(&self) -> Self {
        Self {
            suffix: None,
            ..self.clone()
        }
    }

    pub fn remove_parameters(&self) -> Self {
        Self {
            parameters: BTreeMap::new(),
            ..self.clone()
        }
    }

    pub fn remove_parameter(&self, key: &str) -> Self {
        let mut copy = self.clone();
        copy.parameters.remove(&key.to_ascii_lowercase());
        copy
    }

    /// Whether `other` satisfies this type used as a pattern.
    ///
    /// Names must be equal. A suffix or parameter set on `self` must be present
    /// with the same value on `other`; anything unset on `self` is not checked.
    pub fn matches(&self, other: &ContentType) -> bool {
        if self.name != other.name {
            return false;
        }
        if let Some(suffix) = &self.suffix {
            if other.suffix.as_ref() != Some(suffix) {
                return false;
            }
        }
        self.parameters
            .iter()
            .all(|(key, value)| other.parameters.get(key) == Some(value))
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(suffix) = &self.suffix {
            write!(f, "+{suffix}")?;
        }
        for (key, value) in &self.parameters {
            write!(f, ";{key}={value}")?;
        }
        Ok(())
    }
}

impl FromStr for ContentType {
    type Err = ContentTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}
