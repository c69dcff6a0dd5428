//! # Multi-Document YAML Loading
//!
//! Schema files and example files may hold several `---`-separated
//! documents. Documents are parsed lazily in file order. A document that
//! fails to convert (a duplicate mapping key, say) yields an error and the
//! stream moves on to the next document. After a syntax error the parser
//! reports the same failure for every later read, so the stream ends there.

use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;

use crate::error::DocumentError;

/// Lazy iterator over the documents of a YAML stream.
///
/// Yields `Ok(value)` for each document in order. An empty document
/// (`---` followed by nothing) yields `Value::Null`. A failing document
/// yields `Err` once; the iterator is exhausted when the parser repeats a
/// failure it already reported.
pub struct YamlDocuments<'a> {
    inner: serde_yaml::Deserializer<'a>,
    last_error: Option<ErrorSignature>,
    done: bool,
}

/// Position and message of a reported failure.
#[derive(Debug, PartialEq, Eq)]
struct ErrorSignature {
    index: Option<usize>,
    message: String,
}

impl ErrorSignature {
    fn of(error: &serde_yaml::Error) -> Self {
        Self {
            index: error.location().map(|l| l.index()),
            message: error.to_string(),
        }
    }
}

impl Iterator for YamlDocuments<'_> {
    type Item = Result<Value, DocumentError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let document = self.inner.next()?;
        match Value::deserialize(document) {
            Ok(value) => {
                self.last_error = None;
                Some(Ok(value))
            }
            Err(e) => {
                let signature = ErrorSignature::of(&e);
                if self.last_error.as_ref() == Some(&signature) {
                    self.done = true;
                    return None;
                }
                self.last_error = Some(signature);
                Some(Err(DocumentError::Parse(e)))
            }
        }
    }
}

/// Iterate the documents in `content`.
pub fn parse_documents(content: &str) -> YamlDocuments<'_> {
    YamlDocuments {
        inner: serde_yaml::Deserializer::from_str(content),
        last_error: None,
        done: false,
    }
}

/// Read `path` into memory for [`parse_documents`].
///
/// # Errors
///
/// Returns `DocumentError::Read` if the file cannot be read.
pub fn read_document_source(path: &Path) -> Result<String, DocumentError> {
    std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_document() {
        let docs: Vec<_> = parse_documents("kind: Widget\n").collect();
        assert_eq!(docs.len(), 1);
        let doc = docs[0].as_ref().unwrap();
        assert_eq!(doc.get("kind").and_then(Value::as_str), Some("Widget"));
    }

    #[test]
    fn multiple_documents_in_order() {
        let content = "kind: A\n---\nkind: B\n---\nkind: C\n";
        let kinds: Vec<String> = parse_documents(content)
            .map(|d| {
                d.unwrap()
                    .get("kind")
                    .and_then(Value::as_str)
                    .unwrap()
                    .to_string()
            })
            .collect();
        assert_eq!(kinds, ["A", "B", "C"]);
    }

    #[test]
    fn empty_document_is_null() {
        let docs: Vec<_> = parse_documents("kind: A\n---\n---\nkind: B\n")
            .map(|d| d.unwrap())
            .collect();
        assert_eq!(docs.len(), 3);
        assert!(docs[1].is_null());
    }

    #[test]
    fn empty_input_has_only_null_documents() {
        assert!(parse_documents("").all(|d| d.unwrap().is_null()));
    }

    #[test]
    fn parse_error_ends_stream() {
        let content = "kind: A\n---\nkind: [unclosed\n---\nkind: C\n";
        let docs: Vec<_> = parse_documents(content).collect();
        assert!(docs[0].is_ok());
        assert!(docs.last().unwrap().is_err());
        assert!(docs.iter().filter(|d| d.is_err()).count() == 1);
        assert!(docs.len() <= 2);
    }

    #[test]
    fn duplicate_key_document_does_not_end_stream() {
        let content = "kind: A\n---\nname: x\nname: y\n---\nkind: C\n";
        let docs: Vec<_> = parse_documents(content).collect();
        assert_eq!(docs.len(), 3);
        assert!(docs[1].is_err());
        let last = docs[2].as_ref().unwrap();
        assert_eq!(last.get("kind").and_then(Value::as_str), Some("C"));
    }

    #[test]
    fn read_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_document_source(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, DocumentError::Read { .. }));
        assert!(err.to_string().contains("absent.yaml"));
    }

    #[test]
    fn read_returns_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.yaml");
        std::fs::write(&path, "kind: A\n").unwrap();
        let content = read_document_source(&path).unwrap();
        assert_eq!(parse_documents(&content).count(), 1);
    }
}
