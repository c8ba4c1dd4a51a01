//! Decoding of one schema document plus the normalization passes that only
//! need that document: definition titling and reference qualification.

use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::path_de::from_slice_with_path;
use crate::schema::Schema;

/// Key under which a file is registered in the document set: its file stem.
pub fn reference_key(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

pub fn load_file(path: &Path) -> Result<(String, Schema)> {
    let bytes = std::fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let key = reference_key(path);
    let schema = load(&bytes, &key)?;
    Ok((key, schema))
}

/// Decode `bytes` and normalize the resulting tree for the document `reference`.
pub fn load(bytes: &[u8], reference: &str) -> Result<Schema> {
    let mut schema: Schema = from_slice_with_path(bytes, reference)?;
    title_definitions(&mut schema);
    qualify_references(&mut schema, reference);
    debug!(reference, "loaded schema document");
    Ok(schema)
}

/// Give every untitled definition its key as title.
pub fn title_definitions(schema: &mut Schema) {
    for (key, definition) in schema.definitions.iter_mut() {
        if !definition.has_name() {
            definition.title = key.clone();
        }
        title_definitions(definition);
    }
}

/// Prefix same-document references with the document's key so they can be
/// resolved once every document is loaded.
pub fn qualify_references(schema: &mut Schema, reference: &str) {
    for (_, child) in schema.keyed_children_mut() {
        qualify_references(child, reference);
    }
    if let Some(items) = schema.items.as_deref_mut() {
        qualify_references(items, reference);
    }
    if schema.is_placeholder() {
        schema.reference = qualify(&schema.reference, reference);
    }
}

fn qualify(pointer: &str, reference: &str) -> String {
    if pointer.starts_with('#') {
        format!("{reference}{pointer}")
    } else if !pointer.contains('#') {
        let path = pointer.trim_start_matches('/');
        format!("{reference}#/{path}")
    } else {
        pointer.to_string()
    }
}
