//! # struct-builder
//!
//! Build-time generator for versioned schema types.
//!
//! Schemas are described with [`Dictionary`] and [`VersionedDictionary`];
//! [`save`] turns a list of them into a Rust module that implements
//! `simple_encoding`'s decoding, encoding and content negotiation traits.
//!
//! ```ignore
//! let v1 = Dictionary::new("Member", [("firstName", FieldType::String)])?;
//! let v2 = v1.add([("lastName", FieldType::String)])?;
//! let member = VersionedDictionary::new(v1).with_version(v2)?;
//! struct_builder::save(&[member.into()], "src/generated/structs.rs")?;
//! ```

pub mod error;
pub mod render;
pub mod schema;

use std::fs;
use std::path::Path;

use tracing::info;

pub use error::BuildError;
pub use render::{render, HEADER};
pub use schema::{Dictionary, Field, FieldType, Struct, VersionedDictionary, CONTENT_TYPE_PREFIX};

/// Render `structs` and write them to `path` as a single file.
pub fn save(structs: &[Struct], path: impl AsRef<Path>) -> Result<(), BuildError> {
    let path = path.as_ref();
    let source = render(structs)?;
    let io_error = |source| BuildError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, &source).map_err(io_error)?;
    info!(path = %path.display(), structs = structs.len(), bytes = source.len(), "generated structs written");
    Ok(())
}
