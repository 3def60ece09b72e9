//! Rust source emission for schema descriptions.
//!
//! A plain dictionary becomes a top-level struct. A versioned dictionary
//! becomes a module named after the entity holding `Version1..N`, an `All`
//! enum over them, and `all_decoders`/`all_encoders` for the negotiated
//! codec groups. Nested dictionaries are emitted before their first user and
//! only once.

use std::collections::HashMap;
use std::fmt::Write;

use heck::{ToSnakeCase, ToUpperCamelCase};
use tracing::debug;

use crate::error::BuildError;
use crate::schema::{Dictionary, FieldType, Struct, VersionedDictionary};

/// Prepended to every generated file.
pub const HEADER: &str = "\
// @generated by struct-builder. Do not edit by hand.

use serde_json::Value;
use simple_encoding::*;
";

const INDENT: &str = "    ";

const STRICT_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Render `structs` into the source of one module file.
pub fn render(structs: &[Struct]) -> Result<String, BuildError> {
    let mut renderer = Renderer::default();
    renderer.out.push_str(HEADER);
    for item in structs {
        renderer.export(item)?;
    }
    Ok(renderer.out)
}

#[derive(Default)]
struct Renderer {
    out: String,
    records: HashMap<String, Dictionary>,
    modules: HashMap<String, VersionedDictionary>,
}

impl Renderer {
    fn export(&mut self, item: &Struct) -> Result<(), BuildError> {
        match item {
            Struct::Dictionary(dictionary) => self.export_record(dictionary),
            Struct::Versioned(versioned) => self.export_module(versioned),
        }
    }

    fn export_record(&mut self, dictionary: &Dictionary) -> Result<(), BuildError> {
        let type_name = type_name(dictionary.name());
        if let Some(existing) = self.records.get(&type_name) {
            return if existing == dictionary {
                Ok(())
            } else {
                Err(BuildError::ConflictingDefinition(type_name))
            };
        }
        self.records.insert(type_name.clone(), dictionary.clone());
        self.export_dependencies(dictionary)?;

        let content_type = format!("ContentType::new({:?})", dictionary.content_type());
        self.out.push('\n');
        write_record(&mut self.out, &type_name, dictionary, &content_type)?;
        debug!(name = %type_name, "exported record");
        Ok(())
    }

    fn export_module(&mut self, versioned: &VersionedDictionary) -> Result<(), BuildError> {
        let module = identifier(versioned.name());
        if let Some(existing) = self.modules.get(&module) {
            return if existing == versioned {
                Ok(())
            } else {
                Err(BuildError::ConflictingDefinition(module))
            };
        }
        self.modules.insert(module.clone(), versioned.clone());
        for version in versioned.versions() {
            self.export_dependencies(version)?;
        }

        let mut body = String::new();
        for (number, dictionary) in versioned.numbered() {
            let content_type = format!(
                "ContentType::new({:?}).with_parameter(\"version\", \"{number}\")",
                dictionary.content_type()
            );
            write_record(&mut body, &version_name(number), dictionary, &content_type)?;
            body.push('\n');
        }
        write_all(&mut body, versioned)?;

        writeln!(self.out)?;
        writeln!(self.out, "pub mod {module} {{")?;
        writeln!(self.out, "{INDENT}use super::*;")?;
        writeln!(self.out)?;
        for line in body.lines() {
            if line.is_empty() {
                writeln!(self.out)?;
            } else {
                writeln!(self.out, "{INDENT}{line}")?;
            }
        }
        writeln!(self.out, "}}")?;
        debug!(module = %module, versions = versioned.versions().len(), "exported versioned struct");
        Ok(())
    }

    fn export_dependencies(&mut self, dictionary: &Dictionary) -> Result<(), BuildError> {
        for field in dictionary.fields() {
            if let Some(nested) = field.field_type.dictionary() {
                self.export_record(nested)?;
            }
        }
        Ok(())
    }
}

/// Struct definition plus its `Decodable`, `Encodable` and `VersionedContent` impls.
fn write_record(
    out: &mut String,
    type_name: &str,
    dictionary: &Dictionary,
    content_type: &str,
) -> Result<(), BuildError> {
    let fields = dictionary.fields();

    writeln!(out, "#[derive(Debug, Clone, PartialEq)]")?;
    if fields.is_empty() {
        writeln!(out, "pub struct {type_name} {{}}")?;
    } else {
        writeln!(out, "pub struct {type_name} {{")?;
        for field in fields {
            writeln!(
                out,
                "    pub {}: {},",
                identifier(&field.key),
                rust_type(&field.field_type)
            )?;
        }
        writeln!(out, "}}")?;
    }
    writeln!(out)?;

    let data = if fields.is_empty() { "_data" } else { "data" };
    writeln!(out, "impl Decodable for {type_name} {{")?;
    writeln!(out, "    fn decode({data}: &Data<'_>) -> Result<Self, DecodeError> {{")?;
    if fields.is_empty() {
        writeln!(out, "        Ok(Self {{}})")?;
    } else {
        writeln!(out, "        Ok(Self {{")?;
        for field in fields {
            writeln!(
                out,
                "            {}: {},",
                identifier(&field.key),
                decode_expression(&field.key, &field.field_type)
            )?;
        }
        writeln!(out, "        }})")?;
    }
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "impl Encodable for {type_name} {{")?;
    writeln!(out, "    fn encode(&self) -> Value {{")?;
    writeln!(out, "        ObjectEncoder::new()")?;
    for field in fields {
        let method = match field.field_type {
            FieldType::Optional(_) => "optional_field",
            _ => "field",
        };
        writeln!(
            out,
            "            .{method}({:?}, &self.{})",
            field.key,
            identifier(&field.key)
        )?;
    }
    writeln!(out, "            .finish()")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "impl VersionedContent for {type_name} {{")?;
    writeln!(out, "    fn content_types() -> Vec<ContentType> {{")?;
    writeln!(out, "        vec![{content_type}]")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    Ok(())
}

/// The `All` enum and the codec lists of a versioned module.
fn write_all(out: &mut String, versioned: &VersionedDictionary) -> Result<(), BuildError> {
    let names: Vec<String> = versioned
        .numbered()
        .map(|(number, _)| version_name(number))
        .collect();

    writeln!(out, "/// Every version of `{}`.", versioned.name())?;
    writeln!(out, "#[derive(Debug, Clone, PartialEq)]")?;
    writeln!(out, "pub enum All {{")?;
    for name in &names {
        writeln!(out, "    {name}({name}),")?;
    }
    writeln!(out, "}}")?;

    for name in &names {
        writeln!(out)?;
        writeln!(out, "impl From<{name}> for All {{")?;
        writeln!(out, "    fn from(value: {name}) -> Self {{")?;
        writeln!(out, "        Self::{name}(value)")?;
        writeln!(out, "    }}")?;
        writeln!(out, "}}")?;
    }

    writeln!(out)?;
    writeln!(out, "impl Encodable for All {{")?;
    writeln!(out, "    fn encode(&self) -> Value {{")?;
    writeln!(out, "        match self {{")?;
    for name in &names {
        writeln!(out, "            Self::{name}(value) => value.encode(),")?;
    }
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;

    for (function, codec) in [("all_decoders", "ContentDecoder"), ("all_encoders", "ContentEncoder")] {
        writeln!(out)?;
        writeln!(out, "pub fn {function}() -> Vec<Box<dyn {codec}<All>>> {{")?;
        writeln!(out, "    vec![")?;
        for name in &names {
            writeln!(out, "        Box::new(Versioned::<{name}, All>::new()),")?;
        }
        writeln!(out, "    ]")?;
        writeln!(out, "}}")?;
    }
    Ok(())
}

fn decode_expression(key: &str, field_type: &FieldType) -> String {
    match field_type {
        FieldType::Optional(inner) => format!(
            "data.optional_field({key:?}).map(|field| field.decode(&{})).transpose()?",
            decoder(inner)
        ),
        _ => format!("data.field({key:?})?.decode(&{})?", decoder(field_type)),
    }
}

fn decoder(field_type: &FieldType) -> String {
    match field_type {
        FieldType::String => "StringDecoder".to_string(),
        FieldType::Number => "NumberDecoder".to_string(),
        FieldType::Integer => "IntegerDecoder".to_string(),
        FieldType::Boolean => "BooleanDecoder".to_string(),
        FieldType::Array(items) => format!("ArrayDecoder({})", decoder(items)),
        FieldType::Optional(inner) => format!("OptionalDecoder({})", decoder(inner)),
        FieldType::Dictionary(dictionary) => {
            format!("StructDecoder::<{}>::new()", type_name(dictionary.name()))
        }
    }
}

fn rust_type(field_type: &FieldType) -> String {
    match field_type {
        FieldType::String => "String".to_string(),
        FieldType::Number => "f64".to_string(),
        FieldType::Integer => "i64".to_string(),
        FieldType::Boolean => "bool".to_string(),
        FieldType::Array(items) => format!("Vec<{}>", rust_type(items)),
        FieldType::Optional(inner) => format!("Option<{}>", rust_type(inner)),
        FieldType::Dictionary(dictionary) => type_name(dictionary.name()),
    }
}

pub(crate) fn type_name(name: &str) -> String {
    name.to_upper_camel_case()
}

fn version_name(number: usize) -> String {
    format!("Version{number}")
}

/// snake_case identifier, escaped when it collides with a keyword.
pub(crate) fn identifier(name: &str) -> String {
    let snake = name.to_snake_case();
    if matches!(snake.as_str(), "self" | "super" | "crate") {
        format!("{snake}_")
    } else if STRICT_KEYWORDS.contains(&snake.as_str()) {
        format!("r#{snake}")
    } else {
        snake
    }
}
