//! Graph → text, one sophia serializer per output format.

use sophia::api::prefix::Prefix;
use sophia::api::prelude::*;
use sophia::iri::Iri;
use sophia::jsonld::JsonLdSerializer;
use sophia::turtle::serializer::nt::NtSerializer;
use sophia::turtle::serializer::turtle::{TurtleConfig, TurtleSerializer};
use sophia::xml::serializer::{RdfXmlConfig, RdfXmlSerializer};

use crate::document::RdfDocument;
use crate::error::{RdfxError, Result};
use crate::format::RdfFormat;
use crate::namespaces::NamespaceBinding;

/// Serialize `doc` as `format`.
///
/// `namespaces` drives prefix abbreviation for Turtle and N3 and is
/// written in the order given. The other formats ignore it.
pub fn serialize(
    doc: &RdfDocument,
    format: RdfFormat,
    namespaces: &[NamespaceBinding],
) -> Result<String> {
    let fail = |message: String| RdfxError::Serialize { format, message };

    match format {
        RdfFormat::Turtle | RdfFormat::N3 => {
            let config = TurtleConfig::new()
                .with_pretty(true)
                .with_own_prefix_map(prefix_map(namespaces)?);
            let mut serializer = TurtleSerializer::new_stringifier_with_config(config);
            serializer
                .serialize_graph(doc.graph())
                .map_err(|e| fail(e.to_string()))?;
            Ok(turtle_style_prefixes(serializer.as_str()))
        }
        RdfFormat::NTriples => {
            let mut serializer = NtSerializer::new_stringifier();
            serializer
                .serialize_graph(doc.graph())
                .map_err(|e| fail(e.to_string()))?;
            // Sorted lines keep the output stable across runs.
            let mut lines: Vec<String> = serializer
                .as_str()
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(spaced_terminator)
                .collect();
            lines.sort_unstable();
            let mut out = lines.join("\n");
            if !out.is_empty() {
                out.push('\n');
            }
            Ok(out)
        }
        RdfFormat::RdfXml => {
            let config = RdfXmlConfig::new().with_indentation(2);
            let mut serializer = RdfXmlSerializer::new_stringifier_with_config(config);
            serializer
                .serialize_graph(doc.graph())
                .map_err(|e| fail(e.to_string()))?;
            Ok(serializer.as_str().to_owned())
        }
        RdfFormat::JsonLd => {
            let mut serializer = JsonLdSerializer::new_stringifier();
            serializer
                .serialize_dataset(&doc.graph().as_dataset())
                .map_err(|e| fail(e.to_string()))?;
            let value: serde_json::Value =
                serde_json::from_str(serializer.as_str()).map_err(|e| fail(e.to_string()))?;
            let mut out = serde_json::to_string_pretty(&value).map_err(|e| fail(e.to_string()))?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// Rewrite the SPARQL-style `PREFIX p: <ns>` header the serializer emits
/// as `@prefix p: <ns> .`. Only the header is touched.
fn turtle_style_prefixes(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut in_header = true;
    for line in text.split_inclusive('\n') {
        if in_header {
            if let Some(rest) = line.trim_end().strip_prefix("PREFIX ") {
                out.push_str("@prefix ");
                out.push_str(rest.trim());
                out.push_str(" .\n");
                continue;
            }
            if !line.trim().is_empty() {
                in_header = false;
            }
        }
        out.push_str(line);
    }
    out
}

/// `<s> <p> <o>.` becomes `<s> <p> <o> .`
fn spaced_terminator(line: &str) -> String {
    let line = line.trim_end();
    match line.strip_suffix('.') {
        Some(body) => format!("{} .", body.trim_end()),
        None => line.to_string(),
    }
}

fn prefix_map(namespaces: &[NamespaceBinding]) -> Result<Vec<(Prefix<Box<str>>, Iri<Box<str>>)>> {
    namespaces
        .iter()
        .map(|binding| {
            let invalid = |message: String| RdfxError::InvalidBinding {
                prefix: binding.prefix.clone(),
                namespace: binding.namespace.clone(),
                message,
            };
            let prefix = Prefix::new(Box::from(binding.prefix.as_str()))
                .map_err(|e| invalid(e.to_string()))?;
            let iri = Iri::new(Box::from(binding.namespace.as_str()))
                .map_err(|e| invalid(e.to_string()))?;
            Ok((prefix, iri))
        })
        .collect()
}
