//! Leading `#` comment blocks.
//!
//! RDF parsers discard comments, so the block at the top of a file is
//! lifted out before parsing and written back in front of the serialized
//! graph.

use std::path::Path;

use crate::error::{RdfxError, Result};

/// Read `path` and return its leading comment block.
///
/// Invalid UTF-8 is replaced rather than rejected; only the comment text
/// matters here.
pub fn leading_comments(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).map_err(|e| RdfxError::io(path, e))?;
    Ok(leading_comments_from_str(&String::from_utf8_lossy(&bytes)))
}

/// Collect the comment lines at the very top of `text`, markers stripped.
///
/// The block starts at the first line and ends at the first non-blank
/// line that is not a comment. Blank lines inside the block are skipped.
/// A file whose first line is blank has no leading block.
pub fn leading_comments_from_str(text: &str) -> Vec<String> {
    leading_block_from_str(text)
        .into_iter()
        .map(|line| strip_marker(&line).to_string())
        .collect()
}

/// Read `path` and return its leading comment block as written, `#`
/// markers included.
pub fn leading_block(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).map_err(|e| RdfxError::io(path, e))?;
    Ok(leading_block_from_str(&String::from_utf8_lossy(&bytes)))
}

/// The raw lines of the leading comment block of `text`. Same block rules
/// as [`leading_comments_from_str`].
pub fn leading_block_from_str(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut in_block = false;

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        let is_comment = line.starts_with('#');

        if !line.is_empty() && is_comment && (index == 0 || in_block) {
            out.push(line.to_string());
            in_block = true;
        } else if !line.is_empty() && !is_comment {
            in_block = false;
        } else if !in_block {
            break;
        }
    }

    out
}

fn strip_marker(line: &str) -> &str {
    let body = line.trim_start_matches('#');
    body.strip_prefix(' ').unwrap_or(body)
}

/// Flatten user-supplied comments into individual lines. An empty entry
/// stays one empty line.
pub fn comment_lines<S: AsRef<str>>(comments: &[S]) -> Vec<String> {
    comments
        .iter()
        .flat_map(|c| {
            let c = c.as_ref();
            if c.is_empty() {
                vec![String::new()]
            } else {
                c.lines().map(str::to_string).collect::<Vec<_>>()
            }
        })
        .collect()
}

/// Render `lines` as a `# `-prefixed block followed by one blank line.
pub fn render_comment_block<S: AsRef<str>>(lines: &[S]) -> String {
    let lines = comment_lines(lines);
    if lines.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    for line in &lines {
        if line.is_empty() {
            out.push_str("#\n");
        } else {
            out.push_str("# ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn collects_contiguous_header() {
        let text = "# title\n# second line\n@prefix ex: <http://example.org/> .\n# trailing\n";
        assert_eq!(
            leading_comments_from_str(text),
            vec!["title".to_string(), "second line".to_string()]
        );
    }

    #[test]
    fn blank_first_line_means_no_block() {
        let text = "\n# not leading\nex:a ex:b ex:c .\n";
        assert!(leading_comments_from_str(text).is_empty());
    }

    #[test]
    fn content_first_means_no_block() {
        let text = "@prefix ex: <http://example.org/> .\n# later\n";
        assert!(leading_comments_from_str(text).is_empty());
    }

    #[test]
    fn blank_lines_inside_block_are_skipped() {
        let text = "# one\n\n# two\n\n<a:> <b:> <c:> .\n";
        assert_eq!(leading_comments_from_str(text), vec!["one", "two"]);
    }

    #[test]
    fn marker_without_space_keeps_text() {
        assert_eq!(leading_comments_from_str("#tight\n"), vec!["tight"]);
        assert_eq!(leading_comments_from_str("##  double\n"), vec![" double"]);
    }

    #[test]
    fn renders_block_with_separator() {
        assert_eq!(render_comment_block(&["A", "B"]), "# A\n# B\n\n");
        assert_eq!(render_comment_block::<&str>(&[]), "");
    }

    #[test]
    fn multi_line_entries_are_split() {
        assert_eq!(render_comment_block(&["A\nB"]), "# A\n# B\n\n");
    }

    #[test]
    fn bare_marker_line_survives_a_rewrite() {
        let text = "# Sample\n#\n# End\n\n<a:> <b:> <c:> .\n";
        let comments = leading_comments_from_str(text);
        assert_eq!(comments, vec!["Sample", "", "End"]);
        assert_eq!(render_comment_block(&comments), "# Sample\n#\n# End\n\n");
    }

    #[test]
    fn raw_block_keeps_markers_as_written() {
        let text = "#tight\n##  double\n#\n<a:> <b:> <c:> .\n";
        assert_eq!(leading_block_from_str(text), vec!["#tight", "##  double", "#"]);
    }

    #[test]
    fn reads_from_file_with_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.ttl");
        std::fs::write(&path, b"# caf\xe9\n<a:> <b:> <c:> .\n").unwrap();
        let comments = leading_comments(&path).unwrap();
        assert_eq!(comments.len(), 1);
        assert!(comments[0].starts_with("caf"));
    }

    proptest! {
        #[test]
        fn rendered_block_reads_back(lines in proptest::collection::vec("[A-Za-z0-9][A-Za-z0-9 .,:-]{0,30}", 1..6)) {
            let lines: Vec<String> = lines.into_iter().map(|l| l.trim_end().to_string()).collect();
            let text = format!("{}<a:> <b:> <c:> .\n", render_comment_block(&lines));
            prop_assert_eq!(leading_comments_from_str(&text), lines);
        }
    }
}
