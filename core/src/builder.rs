use crate::error::{IndexError, Result};
use crate::index::{DocId, InvertedIndex};
use crate::tokenizer::parse_record;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Abort when a document id is lower than the one before it.
    /// Otherwise a warning is logged and the record is indexed anyway.
    pub strict_order: bool,
}

/// Read a document source into memory, one record per line.
pub fn load_documents<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| IndexError::io(path, e))?;
    Ok(text.lines().map(str::to_owned).collect())
}

/// Build an index with default options.
pub fn build_inverted_index<I, S>(documents: I) -> Result<InvertedIndex>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    build_inverted_index_with(documents, BuildOptions::default())
}

pub fn build_inverted_index_with<I, S>(documents: I, options: BuildOptions) -> Result<InvertedIndex>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut index = InvertedIndex::new();
    let mut previous: Option<DocId> = None;
    let mut num_docs = 0usize;

    for (n, document) in documents.into_iter().enumerate() {
        let record_no = n + 1;
        let Some(record) = parse_record(document.as_ref(), record_no)? else { continue };

        if let Some(prev) = previous {
            if record.doc_id < prev {
                if options.strict_order {
                    return Err(IndexError::OutOfOrder { record: record_no, previous: prev, id: record.doc_id });
                }
                tracing::warn!(record = record_no, previous = prev, doc_id = record.doc_id, "document ids out of order, postings may not be sorted");
            }
        }
        previous = Some(record.doc_id);

        for word in record.words {
            index.add_posting(word, record.doc_id);
        }
        num_docs += 1;
    }

    tracing::info!(num_docs, num_terms = index.len(), "built inverted index");
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_expected_postings() {
        let index = build_inverted_index(["1  a   b", "2 c    d a"]).unwrap();
        let expected: InvertedIndex =
            [("a", vec![1, 2]), ("b", vec![1]), ("c", vec![2]), ("d", vec![2])].into_iter().collect();
        assert_eq!(index, expected);
    }

    #[test]
    fn repeated_word_in_one_document() {
        let index = build_inverted_index(["3 x x y x"]).unwrap();
        assert_eq!(index.postings("x"), &[3]);
    }

    #[test]
    fn parse_error_aborts_build() {
        let err = build_inverted_index(["1 a", "oops b", "3 c"]).unwrap_err();
        assert!(matches!(err, IndexError::Parse { record: 2, ref token } if token == "oops"));
    }

    #[test]
    fn out_of_order_ids() {
        let docs = ["2 a", "1 a", "2 a"];
        let lenient = build_inverted_index(docs).unwrap();
        assert_eq!(lenient.postings("a"), &[2, 1, 2]);

        let err = build_inverted_index_with(docs, BuildOptions { strict_order: true }).unwrap_err();
        assert!(matches!(err, IndexError::OutOfOrder { record: 2, previous: 2, id: 1 }));
    }

    #[test]
    fn blank_records_are_skipped() {
        let index = build_inverted_index(["1 a", "", "  ", "2 a"]).unwrap();
        assert_eq!(index.postings("a"), &[1, 2]);
    }
}
