//! One generation session: load documents, resolve, name, synthesize.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::emit::{ProcessedTypes, Sink};
use crate::error::Result;
use crate::ir::GoType;
use crate::loader;
use crate::naming::{self, AnonymousNames};
use crate::resolve::Resolver;
use crate::schema::{DocumentSet, Schema};
use crate::synth::Synthesizer;

/// Owns all per-run state. A fresh processor starts a fresh naming and
/// deduplication scope.
pub struct Processor<S: Sink> {
    documents: DocumentSet,
    anonymous: AnonymousNames,
    processed: ProcessedTypes,
    sink: S,
    comments: bool,
}

impl<S: Sink> Processor<S> {
    pub fn new(sink: S, comments: bool) -> Self {
        Self {
            documents: DocumentSet::new(),
            anonymous: AnonymousNames::new(),
            processed: ProcessedTypes::new(),
            sink,
            comments,
        }
    }

    pub fn documents(&self) -> &DocumentSet {
        &self.documents
    }

    pub fn processed(&self) -> &ProcessedTypes {
        &self.processed
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Decode and normalize one document and register it under `reference`.
    pub fn load(&mut self, bytes: &[u8], reference: &str) -> Result<()> {
        let schema = loader::load(bytes, reference)?;
        self.insert(reference.to_string(), schema);
        Ok(())
    }

    pub fn load_files(&mut self, paths: &[PathBuf]) -> Result<()> {
        for path in paths {
            let (reference, schema) = loader::load_file(path)?;
            debug!(path = %path.display(), reference, "loaded file");
            self.insert(reference, schema);
        }
        Ok(())
    }

    fn insert(&mut self, reference: String, schema: Schema) {
        if self.documents.insert(reference.clone(), schema).is_some() {
            warn!(reference, "reference key loaded twice, keeping the later document");
        }
    }

    /// Resolve and name every loaded root, then synthesize them in load order.
    /// Returns the type reference of each root.
    pub fn process(&mut self) -> Result<Vec<GoType>> {
        let roots = self.prepare()?;

        let mut synth = Synthesizer::new(&mut self.processed, &mut self.sink, self.comments);
        let mut types = Vec::with_capacity(roots.len());
        for (reference, root) in &roots {
            let ty = synth.synthesize(root)?;
            debug!(reference, %ty, "synthesized root");
            types.push(ty);
        }
        Ok(types)
    }

    /// Resolved, fully named copy of every root, in load order.
    pub fn prepare(&mut self) -> Result<Vec<(String, Schema)>> {
        let resolver = Resolver::new(&self.documents);
        let mut roots = Vec::with_capacity(self.documents.len());
        for (reference, document) in self.documents.iter() {
            let mut root = document.clone();
            resolver.resolve(reference, &mut root)?;
            naming::assign_root_name(reference, &mut root);
            naming::assign_names(&mut root, &mut self.anonymous);
            roots.push((reference.clone(), root));
        }
        debug!(roots = roots.len(), anonymous = self.anonymous.count(), "prepared roots");
        Ok(roots)
    }
}
