//! In-memory RDF documents: a sophia graph plus its prefix bindings.
//!
//! All syntax work is done by sophia:
//! - N-Triples, Turtle and N3 (as its Turtle subset) via `sophia::turtle`
//! - RDF/XML via `sophia::xml`
//! - JSON-LD via `sophia::jsonld` (quads are folded into the default graph)

use sophia::api::prelude::*;
use sophia::api::term::{BnodeId, SimpleTerm};
use sophia::api::MownStr;
use sophia::inmem::graph::LightGraph;
use sophia::jsonld::JsonLdParser;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

use crate::error::{RdfxError, Result};
use crate::format::RdfFormat;
use crate::namespaces::{declared_namespaces, default_namespaces, NamespaceBinding};

const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// A triple rendered in N-Triples term syntax, for order-independent
/// comparison of graphs.
pub type TripleKey = (String, String, String);

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct GraphSinkError {
    message: String,
}

pub struct RdfDocument {
    graph: LightGraph,
    declared: Vec<NamespaceBinding>,
    sources: usize,
}

impl Default for RdfDocument {
    fn default() -> Self {
        Self {
            graph: LightGraph::new(),
            declared: Vec::new(),
            sources: 0,
        }
    }
}

impl std::fmt::Debug for RdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RdfDocument")
            .field("triples", &self.len())
            .field("declared", &self.declared)
            .field("sources", &self.sources)
            .finish()
    }
}

impl RdfDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `path`, resolving its format from the file name.
    pub fn from_file(path: &Path) -> Result<Self> {
        let format = RdfFormat::guess_from_path(path)?;
        Self::from_file_with_format(path, format)
    }

    pub fn from_file_with_format(path: &Path, format: RdfFormat) -> Result<Self> {
        let mut doc = Self::new();
        doc.add_file(path, format)?;
        Ok(doc)
    }

    pub fn parse_str(text: &str, format: RdfFormat) -> Result<Self> {
        let mut doc = Self::new();
        doc.add_str(text, format, Path::new("<memory>"))?;
        Ok(doc)
    }

    /// Parse `path` into this document. Returns the number of triples read.
    pub fn add_file(&mut self, path: &Path, format: RdfFormat) -> Result<usize> {
        let bytes = std::fs::read(path).map_err(|e| RdfxError::io(path, e))?;
        let text = String::from_utf8(bytes).map_err(|e| RdfxError::Parse {
            path: path.to_path_buf(),
            format,
            message: format!("not valid UTF-8: {e}"),
        })?;
        self.add_str(&text, format, path)
    }

    /// Parse `text` into this document; `origin` only labels errors.
    ///
    /// Blank nodes of every source after the first are relabelled so that
    /// unrelated `_:b0`s from different files stay distinct.
    pub fn add_str(&mut self, text: &str, format: RdfFormat, origin: &Path) -> Result<usize> {
        let scope = if self.sources == 0 {
            String::new()
        } else {
            format!("s{}_", self.sources)
        };
        let before = self.len();

        let graph = &mut self.graph;
        let mut insert = |s: SimpleTerm<'static>,
                          p: SimpleTerm<'static>,
                          o: SimpleTerm<'static>|
         -> std::result::Result<(), GraphSinkError> {
            graph.insert(s, p, o).map(|_| ()).map_err(|e| GraphSinkError {
                message: e.to_string(),
            })
        };

        let reader = std::io::BufReader::new(text.as_bytes());
        let parsed: std::result::Result<(), String> = match format {
            RdfFormat::Turtle | RdfFormat::N3 => {
                sophia::turtle::parser::turtle::parse_bufread(reader)
                    .try_for_each_triple(|t| {
                        insert(
                            scoped_term(t.s(), &scope),
                            scoped_term(t.p(), &scope),
                            scoped_term(t.o(), &scope),
                        )
                    })
                    .map_err(|e| e.to_string())
            }
            RdfFormat::NTriples => sophia::turtle::parser::nt::parse_bufread(reader)
                .try_for_each_triple(|t| {
                    insert(
                        scoped_term(t.s(), &scope),
                        scoped_term(t.p(), &scope),
                        scoped_term(t.o(), &scope),
                    )
                })
                .map_err(|e| e.to_string()),
            RdfFormat::RdfXml => sophia::xml::parser::parse_bufread(reader)
                .try_for_each_triple(|t| {
                    insert(
                        scoped_term(t.s(), &scope),
                        scoped_term(t.p(), &scope),
                        scoped_term(t.o(), &scope),
                    )
                })
                .map_err(|e| e.to_string()),
            RdfFormat::JsonLd => JsonLdParser::new()
                .parse(reader)
                .try_for_each_quad(|q| {
                    insert(
                        scoped_term(q.s(), &scope),
                        scoped_term(q.p(), &scope),
                        scoped_term(q.o(), &scope),
                    )
                })
                .map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| RdfxError::Parse {
            path: origin.to_path_buf(),
            format,
            message,
        })?;

        for binding in declared_namespaces(text, format) {
            self.declare(binding);
        }
        self.sources += 1;

        let added = self.len() - before;
        debug!(
            source = %origin.display(),
            %format,
            added,
            total = self.len(),
            "parsed RDF source"
        );
        Ok(added)
    }

    /// Record a binding declared by a source. The first binding of a prefix
    /// wins, and a namespace is only bound once.
    pub fn declare(&mut self, binding: NamespaceBinding) -> bool {
        let clash = self
            .declared
            .iter()
            .any(|b| b.prefix == binding.prefix || b.namespace == binding.namespace);
        if clash {
            return false;
        }
        self.declared.push(binding);
        true
    }

    /// Declared bindings followed by the defaults they do not shadow.
    pub fn namespaces(&self) -> Vec<NamespaceBinding> {
        let mut out = self.declared.clone();
        for default in default_namespaces() {
            let shadowed = out
                .iter()
                .any(|b| b.prefix == default.prefix || b.namespace == default.namespace);
            if !shadowed {
                out.push(default);
            }
        }
        out
    }

    pub fn graph(&self) -> &LightGraph {
        &self.graph
    }

    pub fn len(&self) -> usize {
        self.graph.triples().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of sources parsed into this document.
    pub fn sources(&self) -> usize {
        self.sources
    }

    /// Every IRI mentioned by the graph: subjects, predicates, objects and
    /// non-trivial literal datatypes.
    pub fn iris(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        for t in self.graph.triples().flatten() {
            for term in [t.s(), t.p(), t.o()] {
                if let Some(iri) = term.iri() {
                    let iri: &str = &iri;
                    out.insert(iri.to_string());
                } else if let Some(datatype) = term.datatype() {
                    let datatype: &str = &datatype;
                    if datatype != XSD_STRING && datatype != RDF_LANG_STRING {
                        out.insert(datatype.to_string());
                    }
                }
            }
        }
        out
    }

    pub fn triple_keys(&self) -> BTreeSet<TripleKey> {
        self.graph
            .triples()
            .flatten()
            .map(|t| (term_key(t.s()), term_key(t.p()), term_key(t.o())))
            .collect()
    }
}

/// Owned copy of `term`, with blank node labels prefixed by `scope`.
fn scoped_term<T: Term>(term: T, scope: &str) -> SimpleTerm<'static> {
    if !scope.is_empty() {
        if let Some(id) = term.bnode_id() {
            let id: &str = &id;
            let label = format!("{scope}{id}");
            return SimpleTerm::BlankNode(BnodeId::new_unchecked(MownStr::from(label)));
        }
    }
    term.into_term()
}

/// N-Triples rendering of a single term.
pub fn term_key<T: Term>(term: T) -> String {
    if let Some(iri) = term.iri() {
        let iri: &str = &iri;
        return format!("<{iri}>");
    }
    if let Some(id) = term.bnode_id() {
        let id: &str = &id;
        return format!("_:{id}");
    }
    if let Some(lexical) = term.lexical_form() {
        let quoted = format!("\"{}\"", escape_literal(&lexical));
        if let Some(tag) = term.language_tag() {
            let tag: &str = &tag;
            return format!("{quoted}@{tag}");
        }
        return match term.datatype() {
            Some(dt) => {
                let dt: &str = &dt;
                if dt == XSD_STRING {
                    quoted
                } else {
                    format!("{quoted}^^<{dt}>")
                }
            }
            None => quoted,
        };
    }
    String::from("?")
}

fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}
