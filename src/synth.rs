//! Mapping from resolved, named schema nodes to Go types.
//!
//! Structs, named maps and named slices become declarations handed to the
//! sink; everything else is returned as an inline type reference. Every name
//! reaches the sink at most once per session.

use tracing::debug;

use crate::emit::{ProcessedTypes, Sink};
use crate::error::{Error, Result};
use crate::ir::GoType;
use crate::naming::camel_case;
use crate::schema::{Schema, SchemaMap, SchemaType};

pub struct Synthesizer<'s, S: Sink + ?Sized> {
    processed: &'s mut ProcessedTypes,
    sink: &'s mut S,
    comments: bool,
}

impl<'s, S: Sink + ?Sized> Synthesizer<'s, S> {
    pub fn new(processed: &'s mut ProcessedTypes, sink: &'s mut S, comments: bool) -> Self {
        Self { processed, sink, comments }
    }

    /// Return the Go type for `schema`, emitting any declarations it needs.
    pub fn synthesize(&mut self, schema: &Schema) -> Result<GoType> {
        if schema.is_placeholder() {
            return Err(Error::Synthesis(format!(
                "unresolved reference `{}`",
                schema.reference
            )));
        }
        match schema.kind {
            SchemaType::Object => self.object(schema),
            SchemaType::Array => self.array(schema),
            SchemaType::Boolean => Ok(GoType::Bool),
            SchemaType::Integer => Ok(GoType::Int),
            SchemaType::Number => Ok(GoType::Float64),
            SchemaType::Null | SchemaType::Any => Ok(GoType::Interface),
            SchemaType::String => Ok(GoType::String),
        }
    }

    /// Dispatches on which keyword is present; `"properties": {}` still declares a struct.
    fn object(&mut self, schema: &Schema) -> Result<GoType> {
        if let Some(properties) = &schema.properties {
            self.structure(schema, properties)
        } else if let Some(patterns) = &schema.pattern_properties {
            self.pattern_map(schema, patterns)
        } else {
            Ok(GoType::map(GoType::Interface))
        }
    }

    fn structure(&mut self, schema: &Schema, properties: &SchemaMap) -> Result<GoType> {
        let name = camel_case(schema.name());
        if name.is_empty() {
            return Err(Error::Synthesis(
                "object with properties has no name".to_string(),
            ));
        }

        let mut fields = String::new();
        for key in sorted_keys(properties) {
            let field_type = self.synthesize(&properties[key])?;
            fields.push_str(&format!(
                "    {} {field_type} `json:\"{key},omitempty\" yaml:\"{key},omitempty\"`\n",
                camel_case(key),
            ));
        }

        let code = format!(
            "{}type {name} struct {{\n{fields}}}\n\n",
            self.comment(schema, &name)
        );
        self.emit(&name, &code)?;
        Ok(GoType::Struct(name))
    }

    /// With several patterns the last one in sorted order decides the result.
    fn pattern_map(&mut self, schema: &Schema, patterns: &SchemaMap) -> Result<GoType> {
        let mut result = GoType::map(GoType::Interface);
        for key in sorted_keys(patterns) {
            let value = self.synthesize(&patterns[key])?;
            result = match value.declared_name() {
                Some(base) => {
                    let name = format!("{base}Map");
                    let code = format!(
                        "{}type {name} map[string]{value}\n\n",
                        self.comment(schema, &name)
                    );
                    self.emit(&name, &code)?;
                    GoType::Named(name)
                }
                None => GoType::map(value),
            };
        }
        Ok(result)
    }

    fn array(&mut self, schema: &Schema) -> Result<GoType> {
        let item = match schema.items.as_deref() {
            Some(items) => self.synthesize(items)?,
            None => GoType::Interface,
        };

        let mut name = camel_case(schema.name());
        if name.is_empty() {
            if let Some(base) = item.declared_name() {
                name = plural(base);
            }
        }
        if name.is_empty() {
            return Ok(GoType::slice(item));
        }

        let code = format!("{}type {name} []{item}\n\n", self.comment(schema, &name));
        self.emit(&name, &code)?;
        Ok(GoType::Named(name))
    }

    fn emit(&mut self, name: &str, code: &str) -> Result<()> {
        if !self.processed.mark(name) {
            debug!(name, "declaration already emitted");
            return Ok(());
        }
        debug!(name, "emitting declaration");
        self.sink.write(name, code)?;
        Ok(())
    }

    fn comment(&self, schema: &Schema, name: &str) -> String {
        if !self.comments {
            return String::new();
        }
        let pretty = schema.to_pretty_json().replace('\n', "\n// ");
        format!("// {name} defined from schema:\n// {pretty}\n")
    }
}

fn sorted_keys(map: &SchemaMap) -> Vec<&str> {
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys
}

fn plural(name: &str) -> String {
    if name.ends_with('s') {
        format!("{name}es")
    } else {
        format!("{name}s")
    }
}
