//! Core of `rdfx`: convert, merge and clean RDF files.
//!
//! Parsing and serialization go through **Sophia**. Supported syntaxes:
//! - Turtle (`.ttl`, `.turtle`)
//! - N-Triples (`.nt`, `.ntriples`)
//! - Notation3 (`.n3`, read and written as Turtle)
//! - RDF/XML (`.rdf`, `.owl`, `.xml`)
//! - JSON-LD (`.json`, `.jsonld`, `.json-ld`)
//!
//! The crate is organised around [`RdfDocument`] (a graph plus the prefix
//! bindings its sources declared) and [`PersistenceSystem`] (where the
//! serialized result goes). The [`convert`], [`merge`] and [`clean`]
//! operations combine the two.

pub mod comments;
pub mod document;
pub mod error;
pub mod files;
pub mod format;
pub mod namespaces;
pub mod ops;
pub mod persistence;
pub mod serialize;

pub use comments::{leading_block, leading_comments, render_comment_block};
pub use document::{RdfDocument, TripleKey};
pub use error::{RdfxError, Result};
pub use files::prepare_files_list;
pub use format::{RdfFormat, RDF_FILE_ENDINGS};
pub use namespaces::{default_namespaces, used_namespaces, NamespaceBinding};
pub use ops::{clean, convert, convert_all, merge, output_file_name};
pub use persistence::{FileSink, MemorySink, PersistenceSystem, WriteRequest};
pub use serialize::serialize;
