//! RDF syntax identification.
//!
//! Formats are resolved from file names only; file contents are never
//! sniffed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{RdfxError, Result};

/// Known file endings and the format each one denotes.
pub const RDF_FILE_ENDINGS: &[(&str, RdfFormat)] = &[
    ("ttl", RdfFormat::Turtle),
    ("turtle", RdfFormat::Turtle),
    ("json", RdfFormat::JsonLd),
    ("json-ld", RdfFormat::JsonLd),
    ("jsonld", RdfFormat::JsonLd),
    ("owl", RdfFormat::RdfXml),
    ("xml", RdfFormat::RdfXml),
    ("rdf", RdfFormat::RdfXml),
    ("nt", RdfFormat::NTriples),
    ("n3", RdfFormat::N3),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RdfFormat {
    Turtle,
    RdfXml,
    JsonLd,
    NTriples,
    N3,
}

impl RdfFormat {
    pub const ALL: [RdfFormat; 5] = [
        RdfFormat::Turtle,
        RdfFormat::RdfXml,
        RdfFormat::JsonLd,
        RdfFormat::NTriples,
        RdfFormat::N3,
    ];

    /// The token naming this format on the command line and in messages.
    pub fn token(self) -> &'static str {
        match self {
            RdfFormat::Turtle => "turtle",
            RdfFormat::RdfXml => "xml",
            RdfFormat::JsonLd => "json-ld",
            RdfFormat::NTriples => "nt",
            RdfFormat::N3 => "n3",
        }
    }

    /// Extension given to files written in this format.
    pub fn output_extension(self) -> &'static str {
        match self {
            RdfFormat::Turtle => "ttl",
            RdfFormat::RdfXml => "xml",
            RdfFormat::JsonLd => "json-ld",
            RdfFormat::NTriples => "nt",
            RdfFormat::N3 => "n3",
        }
    }

    /// Whether `#` line comments are legal at the top of a document.
    pub fn supports_line_comments(self) -> bool {
        matches!(
            self,
            RdfFormat::Turtle | RdfFormat::NTriples | RdfFormat::N3
        )
    }

    /// Resolve the format of `path` from its extension.
    ///
    /// Falls back to JSON-LD for names ending in `json-ld`/`jsonld` that
    /// have no usable extension (e.g. `data_jsonld`).
    pub fn guess_from_path(path: &Path) -> Result<Self> {
        if let Some(format) = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_ending)
        {
            return Ok(format);
        }

        let name = path.to_string_lossy().to_lowercase();
        if name.ends_with("json-ld") || name.ends_with("jsonld") {
            return Ok(RdfFormat::JsonLd);
        }

        Err(RdfxError::UnknownFormat {
            path: path.to_path_buf(),
        })
    }

    fn from_ending(ending: &str) -> Option<Self> {
        let ending = ending.to_lowercase();
        RDF_FILE_ENDINGS
            .iter()
            .find(|(known, _)| *known == ending)
            .map(|(_, format)| *format)
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for RdfFormat {
    type Err = RdfxError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_lowercase();
        if let Some(format) = Self::from_ending(&lowered) {
            return Ok(format);
        }
        Self::ALL
            .into_iter()
            .find(|format| format.token() == lowered)
            .ok_or_else(|| RdfxError::InvalidFormatToken(s.to_string()))
    }
}

/// True iff the file name of `path` ends with one of [`RDF_FILE_ENDINGS`].
pub fn has_known_suffix(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let name = name.to_lowercase();
    RDF_FILE_ENDINGS
        .iter()
        .any(|(ending, _)| {
            name.len() > ending.len()
                && name.ends_with(ending)
                && name[..name.len() - ending.len()].ends_with('.')
        })
}

/// Comma-separated list of known endings, for error messages.
pub fn known_endings() -> String {
    RDF_FILE_ENDINGS
        .iter()
        .map(|(ending, _)| *ending)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn guesses_from_extension() {
        let cases = [
            ("a.ttl", RdfFormat::Turtle),
            ("a.TTL", RdfFormat::Turtle),
            ("dir/b.rdf", RdfFormat::RdfXml),
            ("c.owl", RdfFormat::RdfXml),
            ("d.json", RdfFormat::JsonLd),
            ("e.jsonld", RdfFormat::JsonLd),
            ("f.nt", RdfFormat::NTriples),
            ("g.n3", RdfFormat::N3),
        ];
        for (path, expected) in cases {
            assert_eq!(
                RdfFormat::guess_from_path(Path::new(path)).unwrap(),
                expected,
                "{path}"
            );
        }
    }

    #[test]
    fn json_ld_extension_is_recognized() {
        // `Path::extension` of "x.json-ld" is "json-ld".
        assert_eq!(
            RdfFormat::guess_from_path(Path::new("x.json-ld")).unwrap(),
            RdfFormat::JsonLd
        );
    }

    #[test]
    fn falls_back_to_jsonld_name_suffix() {
        assert_eq!(
            RdfFormat::guess_from_path(Path::new("people_jsonld")).unwrap(),
            RdfFormat::JsonLd
        );
    }

    #[test]
    fn unknown_extension_names_the_path() {
        let err = RdfFormat::guess_from_path(Path::new("notes.txt")).unwrap_err();
        match &err {
            RdfxError::UnknownFormat { path } => assert_eq!(path, &PathBuf::from("notes.txt")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("notes.txt"));
    }

    #[test]
    fn parses_cli_tokens() {
        assert_eq!("turtle".parse::<RdfFormat>().unwrap(), RdfFormat::Turtle);
        assert_eq!("ttl".parse::<RdfFormat>().unwrap(), RdfFormat::Turtle);
        assert_eq!("rdf".parse::<RdfFormat>().unwrap(), RdfFormat::RdfXml);
        assert_eq!("JSON-LD".parse::<RdfFormat>().unwrap(), RdfFormat::JsonLd);
        assert!("trix".parse::<RdfFormat>().is_err());
    }

    #[test]
    fn output_extension_round_trips_through_guess() {
        for format in RdfFormat::ALL {
            let name = format!("out.{}", format.output_extension());
            assert_eq!(RdfFormat::guess_from_path(Path::new(&name)).unwrap(), format);
        }
    }

    #[test]
    fn known_suffix_check() {
        assert!(has_known_suffix(Path::new("a/b.ttl")));
        assert!(has_known_suffix(Path::new("b.json-ld")));
        assert!(!has_known_suffix(Path::new("README.md")));
        assert!(!has_known_suffix(Path::new("ttl")));
    }
}
