use struct_builder::{BuildError, Dictionary, FieldType, Struct, VersionedDictionary};

pub fn record() -> Result<Dictionary, BuildError> {
    Dictionary::new("Record", [("name", FieldType::String)])
}

/// Version 2 adds the member's records.
pub fn member() -> Result<VersionedDictionary, BuildError> {
    let v1 = Dictionary::new(
        "Member",
        [("firstName", FieldType::String), ("lastName", FieldType::String)],
    )?;
    let v2 = v1.add([("records", FieldType::array(FieldType::Dictionary(record()?)))])?;
    VersionedDictionary::new(v1).with_version(v2)
}

/// Everything exported to the members module, in output order.
pub fn all() -> Result<Vec<Struct>, BuildError> {
    Ok(vec![member()?.into(), record()?.into()])
}
