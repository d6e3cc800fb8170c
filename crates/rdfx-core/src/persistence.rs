//! Where serialized graphs go.
//!
//! A [`PersistenceSystem`] takes a parsed document plus a [`WriteRequest`]
//! and stores the serialized text somewhere: the local file system
//! ([`FileSink`]) or memory ([`MemorySink`]). A remote triple store would
//! plug in behind the same trait.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::comments::{leading_comments_from_str, render_comment_block};
use crate::document::RdfDocument;
use crate::error::{RdfxError, Result};
use crate::format::RdfFormat;
use crate::namespaces::{used_namespaces, NamespaceBinding};
use crate::serialize::serialize;

/// What to write and how.
#[derive(Debug, Clone)]
pub struct WriteRequest {
    /// Output file name without extension.
    pub filename: String,
    pub format: RdfFormat,
    pub leading_comments: Vec<String>,
    /// Comment lines to write exactly as given, `#` included. Takes the
    /// place of `leading_comments` when set.
    pub comment_block: Option<Vec<String>>,
    /// Prefixes to bind, in order. `None` binds the document's namespaces
    /// that the graph uses, sorted by prefix.
    pub namespaces: Option<Vec<NamespaceBinding>>,
}

impl WriteRequest {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            format: RdfFormat::Turtle,
            leading_comments: Vec::new(),
            comment_block: None,
            namespaces: None,
        }
    }

    pub fn with_format(mut self, format: RdfFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_comments<S: AsRef<str>>(mut self, comments: &[S]) -> Self {
        self.leading_comments = comments.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    pub fn with_comment_block(mut self, lines: Vec<String>) -> Self {
        self.comment_block = Some(lines);
        self
    }

    pub fn with_namespaces(mut self, namespaces: Vec<NamespaceBinding>) -> Self {
        self.namespaces = Some(namespaces);
        self
    }

    /// `<filename>.<ext>` for the requested format.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.filename, self.format.output_extension())
    }

    /// The full output text: comment block (where the format allows one)
    /// followed by the serialized graph.
    pub fn render(&self, doc: &RdfDocument) -> Result<String> {
        let namespaces = match &self.namespaces {
            Some(ns) => ns.clone(),
            None => used_namespaces(doc),
        };
        let body = serialize(doc, self.format, &namespaces)?;

        let header = match &self.comment_block {
            Some(lines) if !lines.is_empty() => {
                let mut header = lines.join("\n");
                header.push_str("\n\n");
                header
            }
            Some(_) => String::new(),
            None => render_comment_block(&self.leading_comments),
        };
        if header.is_empty() {
            return Ok(body);
        }
        if !self.format.supports_line_comments() {
            warn!(
                format = %self.format,
                dropped = header.lines().filter(|l| !l.is_empty()).count(),
                "format has no line comments; leading comments not written"
            );
            return Ok(body);
        }
        Ok(header + &body)
    }
}

pub trait PersistenceSystem {
    /// Store `doc` as described by `request`. Returns where it went.
    fn write(&self, doc: &RdfDocument, request: &WriteRequest) -> Result<PathBuf>;

    /// Load a previously written asset: its leading comments and graph.
    fn read(&self, location: &Path) -> Result<(Vec<String>, RdfDocument)>;
}

/// Writes into a directory on the local file system.
#[derive(Debug, Clone)]
pub struct FileSink {
    directory: PathBuf,
}

impl FileSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn output_path(&self, request: &WriteRequest) -> PathBuf {
        self.directory.join(request.file_name())
    }
}

impl PersistenceSystem for FileSink {
    fn write(&self, doc: &RdfDocument, request: &WriteRequest) -> Result<PathBuf> {
        let text = request.render(doc)?;
        let path = self.output_path(request);

        std::fs::create_dir_all(&self.directory).map_err(|e| RdfxError::io(&self.directory, e))?;
        write_atomically(&path, text.as_bytes())?;

        info!(path = %path.display(), triples = doc.len(), format = %request.format, "wrote RDF file");
        Ok(path)
    }

    fn read(&self, location: &Path) -> Result<(Vec<String>, RdfDocument)> {
        let path = if location.is_absolute() {
            location.to_path_buf()
        } else {
            self.directory.join(location)
        };
        let format = RdfFormat::guess_from_path(&path)?;
        let bytes = std::fs::read(&path).map_err(|e| RdfxError::io(&path, e))?;
        let text = String::from_utf8_lossy(&bytes);

        let comments = leading_comments_from_str(&text);
        let mut doc = RdfDocument::new();
        doc.add_str(&text, format, &path)?;
        Ok((comments, doc))
    }
}

/// Write `bytes` to a temporary file next to `path`, then rename it over
/// `path`. Readers never observe a half-written file.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| RdfxError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| RdfxError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| RdfxError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| RdfxError::io(path, e.error))?;
    Ok(())
}

/// Keeps rendered documents in memory, keyed by file name.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: RefCell<BTreeMap<PathBuf, String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.files.borrow().get(Path::new(name)).cloned()
    }

    pub fn names(&self) -> Vec<PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }
}

impl PersistenceSystem for MemorySink {
    fn write(&self, doc: &RdfDocument, request: &WriteRequest) -> Result<PathBuf> {
        let text = request.render(doc)?;
        let name = PathBuf::from(request.file_name());
        self.files.borrow_mut().insert(name.clone(), text);
        Ok(name)
    }

    fn read(&self, location: &Path) -> Result<(Vec<String>, RdfDocument)> {
        let files = self.files.borrow();
        let text = files
            .get(location)
            .ok_or_else(|| RdfxError::PathNotFound(location.to_path_buf()))?;
        let format = RdfFormat::guess_from_path(location)?;
        let comments = leading_comments_from_str(text);
        let mut doc = RdfDocument::new();
        doc.add_str(text, format, location)?;
        Ok((comments, doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
@prefix ex: <http://example.org/> .
ex:a ex:b ex:c .
"#;

    #[test]
    fn file_sink_writes_comments_then_graph() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path());
        let doc = RdfDocument::parse_str(SAMPLE, RdfFormat::Turtle).unwrap();

        let request = WriteRequest::new("out").with_comments(&["A", "B"]);
        let path = sink.write(&doc, &request).unwrap();
        assert_eq!(path, dir.path().join("out.ttl"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# A\n# B\n\n"), "{text}");

        let (comments, back) = sink.read(Path::new("out.ttl")).unwrap();
        assert_eq!(comments, vec!["A", "B"]);
        assert_eq!(back.triple_keys(), doc.triple_keys());
    }

    #[test]
    fn comments_are_dropped_for_xml() {
        let sink = MemorySink::new();
        let doc = RdfDocument::parse_str(SAMPLE, RdfFormat::Turtle).unwrap();
        let request = WriteRequest::new("out")
            .with_format(RdfFormat::RdfXml)
            .with_comments(&["not legal here"]);
        sink.write(&doc, &request).unwrap();

        let text = sink.get("out.xml").unwrap();
        assert!(!text.contains("not legal here"));
        let (_, back) = sink.read(Path::new("out.xml")).unwrap();
        assert_eq!(back.len(), 1);
    }

    #[test]
    fn comment_block_is_written_verbatim() {
        let sink = MemorySink::new();
        let doc = RdfDocument::parse_str(SAMPLE, RdfFormat::Turtle).unwrap();
        let request = WriteRequest::new("out")
            .with_comments(&["ignored"])
            .with_comment_block(vec!["#tight".to_string(), "##  double".to_string()]);
        sink.write(&doc, &request).unwrap();

        let text = sink.get("out.ttl").unwrap();
        assert!(text.starts_with("#tight\n##  double\n\n"), "{text}");
        assert!(!text.contains("ignored"));
    }

    #[test]
    fn file_sink_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("nested/out"));
        let doc = RdfDocument::parse_str(SAMPLE, RdfFormat::Turtle).unwrap();
        let path = sink
            .write(&doc, &WriteRequest::new("g").with_format(RdfFormat::NTriples))
            .unwrap();
        assert!(path.ends_with("nested/out/g.nt"));
        assert!(path.exists());
    }

    #[test]
    fn atomic_write_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.ttl");
        std::fs::write(&path, "old").unwrap();
        write_atomically(&path, b"new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn memory_sink_read_of_unknown_name_fails() {
        let sink = MemorySink::new();
        assert!(matches!(
            sink.read(Path::new("nope.ttl")),
            Err(RdfxError::PathNotFound(_))
        ));
    }
}
