//! Cross-document `$ref` flattening.
//!
//! Every placeholder node is overwritten with a deep copy of the node its
//! reference points at, so later passes only ever see concrete schemas.

use tracing::debug;

use crate::error::ReferenceError;
use crate::schema::{DocumentSet, Schema, SchemaMap};

/// Position reached while walking a reference path.
#[derive(Debug, Clone, Copy)]
enum Cursor<'a> {
    /// Nothing selected yet; the path must name a document first.
    Start,
    Node(&'a Schema),
    Map(&'a SchemaMap),
}

pub struct Resolver<'a> {
    documents: &'a DocumentSet,
}

impl<'a> Resolver<'a> {
    pub fn new(documents: &'a DocumentSet) -> Self {
        Self { documents }
    }

    /// Resolve every reference in `schema`, a tree belonging to `document`.
    pub fn resolve(&self, document: &str, schema: &mut Schema) -> Result<(), ReferenceError> {
        let mut active = Vec::new();
        self.resolve_node(document, schema, &mut active)
    }

    /// `active` holds the references being expanded between the root and `schema`.
    fn resolve_node(
        &self,
        document: &str,
        schema: &mut Schema,
        active: &mut Vec<String>,
    ) -> Result<(), ReferenceError> {
        let depth = active.len();

        // The copied content may itself be a placeholder; keep following the chain.
        while schema.is_placeholder() {
            let reference = std::mem::take(&mut schema.reference);
            if active.contains(&reference) {
                let mut chain = active.clone();
                chain.push(reference);
                return Err(ReferenceError::Cycle {
                    document: document.to_string(),
                    chain,
                });
            }
            let target = self.lookup(document, &reference)?;
            *schema = target.clone();
            debug!(document, reference = %reference, "inlined reference");
            active.push(reference);
        }

        for (_, child) in schema.keyed_children_mut() {
            self.resolve_node(document, child, active)?;
        }
        if let Some(items) = schema.items.as_deref_mut() {
            self.resolve_node(document, items, active)?;
        }

        active.truncate(depth);
        Ok(())
    }

    /// Walk `reference` from the top and return the schema it names.
    pub fn lookup(&self, document: &str, reference: &str) -> Result<&'a Schema, ReferenceError> {
        let mut cursor = Cursor::Start;
        for segment in reference.split('/').filter(|s| !s.is_empty()) {
            cursor = self.step(document, reference, cursor, segment)?;
        }
        match cursor {
            Cursor::Node(schema) => Ok(schema),
            Cursor::Start | Cursor::Map(_) => Err(ReferenceError::NotASchema {
                document: document.to_string(),
                reference: reference.to_string(),
            }),
        }
    }

    fn step(
        &self,
        document: &str,
        reference: &str,
        cursor: Cursor<'a>,
        segment: &str,
    ) -> Result<Cursor<'a>, ReferenceError> {
        let missing = || ReferenceError::MissingPath {
            document: document.to_string(),
            reference: reference.to_string(),
            segment: segment.to_string(),
        };
        let invalid = || ReferenceError::InvalidSegment {
            document: document.to_string(),
            reference: reference.to_string(),
            segment: segment.to_string(),
        };

        if segment == "#" {
            return Err(ReferenceError::MissingDocument {
                document: document.to_string(),
                reference: reference.to_string(),
            });
        }
        if let Some(target) = segment.strip_suffix('#') {
            return self
                .documents
                .get(target)
                .map(Cursor::Node)
                .ok_or_else(|| ReferenceError::UnknownDocument {
                    document: document.to_string(),
                    target: target.to_string(),
                });
        }

        match cursor {
            Cursor::Start => Err(invalid()),
            Cursor::Node(schema) => match segment {
                "definitions" => Ok(Cursor::Map(&schema.definitions)),
                "properties" => schema.properties.as_ref().map(Cursor::Map).ok_or_else(missing),
                "patternProperties" => schema
                    .pattern_properties
                    .as_ref()
                    .map(Cursor::Map)
                    .ok_or_else(missing),
                "items" => schema.items.as_deref().map(Cursor::Node).ok_or_else(missing),
                _ => Err(invalid()),
            },
            Cursor::Map(map) => map
                .get(unescape(segment).as_str())
                .map(Cursor::Node)
                .ok_or_else(missing),
        }
    }
}

/// JSON-pointer unescaping of one path segment.
fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}
