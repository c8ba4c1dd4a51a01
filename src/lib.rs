//! Generate Go type declarations from JSON Schema documents.
//!
//! Pipeline: [`loader`] decodes and normalizes each document, [`resolve`]
//! inlines `$ref`s across the whole document set, [`naming`] gives every
//! declared node a name, and [`synth`] turns the tree into Go types, handing
//! each declaration to an [`emit::Sink`] once. [`processor::Processor`] runs
//! the whole thing for one session.

pub mod cli;
pub mod emit;
pub mod error;
pub mod ir;
pub mod loader;
pub mod naming;
pub mod path_de;
pub mod processor;
pub mod resolve;
pub mod schema;
pub mod settings;
pub mod synth;

pub use emit::{FileSink, MemorySink, Sink, StreamSink};
pub use error::{Error, Result};
pub use ir::GoType;
pub use processor::Processor;
pub use schema::{Schema, SchemaType};
pub use settings::Settings;
