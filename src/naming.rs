//! Canonical names for schema nodes.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::{Schema, SchemaType};

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z0-9]+").expect("valid word regex"));

const ACRONYM_SUFFIXES: [&str; 4] = ["Id", "Url", "Json", "Xml"];
const ACRONYM_PREFIXES: [&str; 3] = ["Url", "Json", "Xml"];

/// Counter behind `AnonymousObject<N>` names. One per processing session.
#[derive(Debug, Clone, Default)]
pub struct AnonymousNames {
    count: usize,
}

impl AnonymousNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_name(&mut self) -> String {
        self.count += 1;
        format!("AnonymousObject{}", self.count)
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// Title an untitled object root after its document's reference key, so the
/// struct it declares has a name. Other roots are left to `assign_names`.
pub fn assign_root_name(reference: &str, schema: &mut Schema) {
    if schema.kind == SchemaType::Object && !schema.has_name() {
        schema.title = reference.to_string();
    }
}

/// Name every unnamed node below `schema`. Must run after reference resolution.
pub fn assign_names(schema: &mut Schema, anonymous: &mut AnonymousNames) {
    for (key, child) in schema.keyed_children_mut() {
        if !child.has_name() {
            child.title = key.clone();
        }
        assign_names(child, anonymous);
    }

    let unnamed_items = schema.items.as_deref().is_some_and(|items| !items.has_name());
    if unnamed_items && !schema.has_name() {
        schema.title = anonymous.next_name();
    }
    let array_name = schema.name().to_string();
    if let Some(items) = schema.items.as_deref_mut() {
        if !items.has_name() {
            items.title = format!("{array_name}Item");
        }
        assign_names(items, anonymous);
    }
}

/// Identifier form of a schema name: alphanumeric words, each capitalized,
/// with common acronyms upper-cased (`user_id` -> `UserID`).
pub fn camel_case(name: &str) -> String {
    let joined: String = WORD
        .find_iter(name)
        .map(|word| capitalize(word.as_str()))
        .collect();

    for suffix in ACRONYM_SUFFIXES {
        if let Some(stem) = joined.strip_suffix(suffix) {
            return format!("{stem}{}", suffix.to_uppercase());
        }
    }
    for prefix in ACRONYM_PREFIXES {
        if let Some(rest) = joined.strip_prefix(prefix) {
            return format!("{}{rest}", prefix.to_uppercase());
        }
    }
    joined
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaMap;

    #[test]
    fn camel_case_words_and_acronyms() {
        assert_eq!(camel_case("user_id"), "UserID");
        assert_eq!(camel_case("image_url"), "ImageURL");
        assert_eq!(camel_case("imageURL"), "ImageURL");
        assert_eq!(camel_case("url_path"), "URLPath");
        assert_eq!(camel_case("json-blob"), "JSONBlob");
        assert_eq!(camel_case("raw xml"), "RawXML");
        assert_eq!(camel_case("id"), "ID");
        assert_eq!(camel_case("count"), "Count");
        assert_eq!(camel_case("first.name/last"), "FirstNameLast");
        assert_eq!(camel_case("v2 api"), "V2Api");
        assert_eq!(camel_case(""), "");
    }

    #[test]
    fn suffix_takes_precedence_over_prefix() {
        assert_eq!(camel_case("url_id"), "UrlID");
    }

    #[test]
    fn keys_name_children() {
        let mut root = Schema::new(SchemaType::Object);
        let properties = root.properties.get_or_insert_with(SchemaMap::new);
        properties.insert("owner".into(), Schema::new(SchemaType::Object));
        let mut titled = Schema::new(SchemaType::Object);
        titled.title = "Kept".into();
        properties.insert("other".into(), titled);
        root.pattern_properties = Some(SchemaMap::from_iter([(
            "^x-".to_string(),
            Schema::new(SchemaType::String),
        )]));
        root.definitions.insert("Def".into(), Schema::new(SchemaType::Integer));

        assign_names(&mut root, &mut AnonymousNames::new());

        assert_eq!(root.property("owner").title, "owner");
        assert_eq!(root.property("other").title, "Kept");
        assert_eq!(root.pattern_property("^x-").title, "^x-");
        assert_eq!(root.definitions["Def"].title, "Def");
    }

    #[test]
    fn items_are_named_after_their_array() {
        let mut root = Schema::new(SchemaType::Object);
        let mut tags = Schema::new(SchemaType::Array);
        tags.items = Some(Box::new(Schema::new(SchemaType::Object)));
        root.properties = Some(SchemaMap::from_iter([("tags".to_string(), tags)]));

        let mut anonymous = AnonymousNames::new();
        assign_names(&mut root, &mut anonymous);

        let tags = root.property("tags");
        assert_eq!(tags.items.as_ref().unwrap().title, "tagsItem");
        assert_eq!(anonymous.count(), 0);
    }

    #[test]
    fn anonymous_arrays_get_counter_names() {
        let mut nested = Schema::new(SchemaType::Array);
        nested.items = Some(Box::new(Schema::new(SchemaType::String)));
        let mut outer = Schema::new(SchemaType::Array);
        outer.items = Some(Box::new(nested));

        let mut anonymous = AnonymousNames::new();
        assign_names(&mut outer, &mut anonymous);

        assert_eq!(outer.title, "AnonymousObject1");
        let inner = outer.items.as_ref().unwrap();
        assert_eq!(inner.title, "AnonymousObject1Item");
        assert_eq!(inner.items.as_ref().unwrap().title, "AnonymousObject1ItemItem");

        let mut another = Schema::new(SchemaType::Array);
        another.items = Some(Box::new(Schema::new(SchemaType::Integer)));
        assign_names(&mut another, &mut anonymous);
        assert_eq!(another.title, "AnonymousObject2");
    }

    #[test]
    fn assigning_twice_changes_nothing() {
        let mut root = Schema::new(SchemaType::Array);
        root.items = Some(Box::new(Schema::new(SchemaType::Object)));
        let mut anonymous = AnonymousNames::new();
        assign_names(&mut root, &mut anonymous);
        let once = root.clone();
        assign_names(&mut root, &mut anonymous);
        assert_eq!(root, once);
        assert_eq!(anonymous.count(), 1);
    }

    #[test]
    fn root_takes_reference_key_only_when_unnamed() {
        let mut root = Schema::new(SchemaType::Object);
        assign_root_name("b", &mut root);
        assert_eq!(root.title, "b");

        let mut root = Schema::new(SchemaType::Object);
        root.id = "given".into();
        assign_root_name("b", &mut root);
        assert_eq!(root.name(), "given");

        let mut root = Schema::new(SchemaType::Array);
        assign_root_name("b", &mut root);
        assert!(!root.has_name());
    }
}
