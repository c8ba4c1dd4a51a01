//! In-memory model of a JSON Schema document.
//!
//! Only the keywords the generator understands are modelled; everything else
//! in the input is ignored on decode.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

pub type SchemaMap = IndexMap<String, Schema>;

/// The closed set of `type` values. `Any` stands for an absent `type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SchemaType {
    #[default]
    Any,
    Array,
    Boolean,
    Integer,
    Number,
    Null,
    Object,
    String,
}

impl SchemaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Any => "any",
            SchemaType::Array => "array",
            SchemaType::Boolean => "boolean",
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
            SchemaType::Null => "null",
            SchemaType::Object => "object",
            SchemaType::String => "string",
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, SchemaType::Any)
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "array" => Ok(SchemaType::Array),
            "boolean" => Ok(SchemaType::Boolean),
            "integer" => Ok(SchemaType::Integer),
            "number" => Ok(SchemaType::Number),
            "null" => Ok(SchemaType::Null),
            "object" => Ok(SchemaType::Object),
            "string" => Ok(SchemaType::String),
            other => Err(format!("unknown schema type \"{other}\"")),
        }
    }
}

impl<'de> Deserialize<'de> for SchemaType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

impl Serialize for SchemaType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One node of a schema document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    #[serde(default, alias = "$id", skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(rename = "type", default, skip_serializing_if = "SchemaType::is_any")]
    pub kind: SchemaType,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty", serialize_with = "sorted")]
    pub definitions: SchemaMap,

    /// `Some` whenever the keyword is present, even as `{}`.
    #[serde(default, skip_serializing_if = "absent_or_empty", serialize_with = "sorted_if_present")]
    pub properties: Option<SchemaMap>,

    #[serde(default, skip_serializing_if = "absent_or_empty", serialize_with = "sorted_if_present")]
    pub pattern_properties: Option<SchemaMap>,

    /// Unresolved `$ref` pointer; empty once resolved.
    #[serde(rename = "$ref", default, skip_serializing_if = "String::is_empty")]
    pub reference: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
}

impl Schema {
    pub fn new(kind: SchemaType) -> Self {
        Self { kind, ..Self::default() }
    }

    /// The node's name: its title, falling back to its id.
    pub fn name(&self) -> &str {
        if self.title.is_empty() { &self.id } else { &self.title }
    }

    pub fn has_name(&self) -> bool {
        !self.name().is_empty()
    }

    pub fn is_placeholder(&self) -> bool {
        !self.reference.is_empty()
    }

    /// Children held in keyed maps: definitions, then properties, then pattern properties.
    pub fn keyed_children_mut(&mut self) -> impl Iterator<Item = (&String, &mut Schema)> {
        self.definitions
            .iter_mut()
            .chain(self.properties.iter_mut().flatten())
            .chain(self.pattern_properties.iter_mut().flatten())
    }

    #[cfg(test)]
    pub(crate) fn property(&self, key: &str) -> &Schema {
        &self.properties.as_ref().expect("properties present")[key]
    }

    #[cfg(test)]
    pub(crate) fn pattern_property(&self, key: &str) -> &Schema {
        &self.pattern_properties.as_ref().expect("patternProperties present")[key]
    }

    /// Pretty JSON rendering used in generated comments.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

fn absent_or_empty(map: &Option<SchemaMap>) -> bool {
    map.as_ref().is_none_or(|map| map.is_empty())
}

/// Keyed children serialize in key order so comment blocks don't depend on
/// the order of the source document.
fn sorted<S: Serializer>(map: &SchemaMap, serializer: S) -> Result<S::Ok, S::Error> {
    let mut entries: Vec<(&String, &Schema)> = map.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
    serializer.collect_map(entries)
}

fn sorted_if_present<S: Serializer>(
    map: &Option<SchemaMap>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match map {
        Some(map) => sorted(map, serializer),
        None => serializer.serialize_none(),
    }
}

/// Every loaded document, keyed by the reference key of its source file.
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    documents: IndexMap<String, Schema>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, returning the one it replaced under the same key.
    pub fn insert(&mut self, key: impl Into<String>, schema: Schema) -> Option<Schema> {
        self.documents.insert(key.into(), schema)
    }

    /// Look a document up by key. `a.json` falls back to `a`.
    pub fn get(&self, key: &str) -> Option<&Schema> {
        self.documents.get(key).or_else(|| {
            key.strip_suffix(".json")
                .and_then(|stem| self.documents.get(stem))
        })
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Schema> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }
}
