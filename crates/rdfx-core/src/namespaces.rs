//! Namespace prefix bindings: discovery from source text, defaults, and
//! pruning down to the namespaces a graph actually uses.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::document::RdfDocument;
use crate::format::RdfFormat;

pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

/// A `(prefix, namespace IRI)` pair used for compact serialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamespaceBinding {
    pub prefix: String,
    pub namespace: String,
}

impl NamespaceBinding {
    pub fn new(prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            namespace: namespace.into(),
        }
    }
}

/// Bindings every document starts with, before any source is parsed.
pub fn default_namespaces() -> Vec<NamespaceBinding> {
    vec![
        NamespaceBinding::new("owl", OWL_NS),
        NamespaceBinding::new("rdf", RDF_NS),
        NamespaceBinding::new("rdfs", RDFS_NS),
        NamespaceBinding::new("xsd", XSD_NS),
    ]
}

fn turtle_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:^|[.>\s])(?:@prefix|(?i:prefix))\s+([A-Za-z][\w.\-]*)?:\s*<([^>\s]*)>")
            .expect("valid prefix regex")
    })
}

fn xmlns_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"xmlns:([A-Za-z_][\w.\-]*)\s*=\s*["']([^"']*)["']"#)
            .expect("valid xmlns regex")
    })
}

/// Prefix bindings declared in `text`, in declaration order.
///
/// N-Triples has no prefix syntax and yields nothing. Text that cannot be
/// scanned (e.g. malformed JSON) also yields nothing; the parser reports
/// the real error.
pub fn declared_namespaces(text: &str, format: RdfFormat) -> Vec<NamespaceBinding> {
    match format {
        RdfFormat::Turtle | RdfFormat::N3 => turtle_prefix_re()
            .captures_iter(text)
            .map(|cap| {
                NamespaceBinding::new(
                    cap.get(1).map(|m| m.as_str()).unwrap_or(""),
                    &cap[2],
                )
            })
            .collect(),
        RdfFormat::RdfXml => xmlns_re()
            .captures_iter(text)
            .map(|cap| NamespaceBinding::new(&cap[1], &cap[2]))
            .collect(),
        RdfFormat::JsonLd => jsonld_context_namespaces(text),
        RdfFormat::NTriples => Vec::new(),
    }
}

fn jsonld_context_namespaces(text: &str) -> Vec<NamespaceBinding> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(text) else {
        return Vec::new();
    };

    let mut contexts = Vec::new();
    let roots: Vec<&serde_json::Value> = match &value {
        serde_json::Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };
    for root in roots {
        match root.get("@context") {
            Some(serde_json::Value::Array(items)) => contexts.extend(items.iter()),
            Some(ctx) => contexts.push(ctx),
            None => {}
        }
    }

    let mut out = Vec::new();
    for ctx in contexts {
        let Some(terms) = ctx.as_object() else {
            continue;
        };
        for (term, definition) in terms {
            if term.starts_with('@') {
                continue;
            }
            if let Some(iri) = definition.as_str() {
                if iri.ends_with('/') || iri.ends_with('#') {
                    out.push(NamespaceBinding::new(term.clone(), iri));
                }
            }
        }
    }
    out
}

/// The bound namespaces of `doc` that at least one IRI in the graph
/// contains, sorted by prefix.
///
/// Containment is a plain substring test, so a namespace that happens to
/// occur inside an unrelated IRI is kept as well.
pub fn used_namespaces(doc: &RdfDocument) -> Vec<NamespaceBinding> {
    let iris = doc.iris();
    let used: BTreeSet<NamespaceBinding> = doc
        .namespaces()
        .into_iter()
        .filter(|binding| {
            !binding.namespace.is_empty()
                && iris.iter().any(|iri| iri.contains(binding.namespace.as_str()))
        })
        .collect();

    let mut used: Vec<NamespaceBinding> = used.into_iter().collect();
    used.sort_by(|a, b| a.prefix.cmp(&b.prefix));
    used
}
