//! The three user-facing operations: convert, merge and clean.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::comments::leading_block;
use crate::document::RdfDocument;
use crate::error::{RdfxError, Result};
use crate::format::{has_known_suffix, known_endings, RdfFormat};
use crate::namespaces::used_namespaces;
use crate::persistence::{write_atomically, PersistenceSystem, WriteRequest};

/// Stem of the output file for `input`: its file name without the last
/// extension.
///
/// Same-format conversions get a `.new` suffix unless `in_place` is set, so
/// the source is not silently replaced.
pub fn output_file_name(
    input: &Path,
    input_format: RdfFormat,
    output_format: RdfFormat,
    in_place: bool,
) -> String {
    let mut stem = input
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if input_format == output_format && !in_place {
        stem.push_str(".new");
    }
    stem
}

/// Parse `input` and hand it to `sink` in `output_format`.
///
/// Without an explicit `output_name` the name is derived with
/// [`output_file_name`].
pub fn convert<P: PersistenceSystem + ?Sized, S: AsRef<str>>(
    input: &Path,
    sink: &P,
    output_name: Option<&str>,
    output_format: RdfFormat,
    comments: &[S],
) -> Result<PathBuf> {
    let input_format = RdfFormat::guess_from_path(input)?;
    let doc = RdfDocument::from_file_with_format(input, input_format)?;

    let filename = match output_name {
        Some(name) => name.to_string(),
        None => output_file_name(input, input_format, output_format, false),
    };
    let request = WriteRequest::new(filename)
        .with_format(output_format)
        .with_comments(comments);

    let written = sink.write(&doc, &request)?;
    info!(
        input = %input.display(),
        output = %written.display(),
        from = %input_format,
        to = %output_format,
        "converted"
    );
    Ok(written)
}

/// Convert every file in `files` into `sink`, one output per input.
///
/// Output names are derived and checked up front: when two inputs would
/// land on the same output (`a.ttl` and `a.rdf` both becoming `a.nt`)
/// nothing is written.
pub fn convert_all<P: AsRef<Path>, K: PersistenceSystem + ?Sized, S: AsRef<str>>(
    files: &[P],
    sink: &K,
    output_format: RdfFormat,
    comments: &[S],
) -> Result<Vec<PathBuf>> {
    let mut planned: HashMap<String, PathBuf> = HashMap::new();
    for file in files {
        let file = file.as_ref();
        let input_format = RdfFormat::guess_from_path(file)?;
        let name = output_file_name(file, input_format, output_format, false);
        let target = format!("{name}.{}", output_format.output_extension());
        if let Some(first) = planned.insert(target.clone(), file.to_path_buf()) {
            return Err(RdfxError::OutputCollision {
                first,
                second: file.to_path_buf(),
                output: PathBuf::from(target),
            });
        }
    }

    files
        .iter()
        .map(|file| convert(file.as_ref(), sink, None, output_format, comments))
        .collect()
}

/// Union every file in `files` into one graph and hand it to `sink`.
///
/// All suffixes are checked before anything is parsed, so a bad input
/// fails the whole merge up front.
pub fn merge<P: AsRef<Path>, K: PersistenceSystem + ?Sized, S: AsRef<str>>(
    files: &[P],
    sink: &K,
    output_format: RdfFormat,
    output_name: &str,
    comments: &[S],
) -> Result<PathBuf> {
    for file in files {
        let file = file.as_ref();
        if !has_known_suffix(file) {
            return Err(RdfxError::UnknownSuffix {
                path: file.to_path_buf(),
                known: known_endings(),
            });
        }
    }

    let mut doc = RdfDocument::new();
    for file in files {
        let file = file.as_ref();
        let format = RdfFormat::guess_from_path(file)?;
        let added = doc.add_file(file, format)?;
        debug!(file = %file.display(), added, "merged");
    }

    let request = WriteRequest::new(output_name)
        .with_format(output_format)
        .with_comments(comments);
    let written = sink.write(&doc, &request)?;
    info!(
        inputs = files.len(),
        triples = doc.len(),
        output = %written.display(),
        "merged"
    );
    Ok(written)
}

/// Rewrite `input` as Turtle with only the prefixes it uses, sorted, and
/// its leading comment block preserved as written.
///
/// The result is written to `<stem>.ttl` next to the input through a
/// temporary file and rename. The input is removed afterwards when its
/// name differs (e.g. `data.turtle` becomes `data.ttl`). An existing file
/// of that other name is never replaced.
pub fn clean(input: &Path) -> Result<PathBuf> {
    let block = leading_block(input)?;
    let doc = RdfDocument::from_file(input)?;
    let namespaces = used_namespaces(&doc);
    debug!(
        file = %input.display(),
        kept = namespaces.len(),
        declared = doc.namespaces().len(),
        "pruned namespaces"
    );

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let request = WriteRequest::new(stem)
        .with_format(RdfFormat::Turtle)
        .with_comment_block(block)
        .with_namespaces(namespaces);

    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    let output = dir.join(request.file_name());
    let renamed = output != input;
    if renamed && output.exists() {
        return Err(RdfxError::OutputExists {
            input: input.to_path_buf(),
            output,
        });
    }

    let text = request.render(&doc)?;
    write_atomically(&output, text.as_bytes())?;

    if renamed {
        std::fs::remove_file(input).map_err(|e| RdfxError::io(input, e))?;
    }
    info!(file = %output.display(), triples = doc.len(), "cleaned");
    Ok(output)
}
