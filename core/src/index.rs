use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Document identifier. The on-disk formats store it as a 2-byte integer,
/// so 65535 is a hard ceiling.
pub type DocId = u16;
pub type Term = String;
pub type Postings = Vec<DocId>;

/// Mapping from term to the ids of the documents containing it.
///
/// Terms that were never indexed behave as if they had an empty postings list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvertedIndex {
    terms: HashMap<Term, Postings>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Append `doc_id` to the postings of `term` unless it is already the last entry.
    ///
    /// Only adjacent duplicates are collapsed; postings stay increasing as long
    /// as documents are fed in non-decreasing id order.
    pub fn add_posting(&mut self, term: &str, doc_id: DocId) {
        let postings = self.terms.entry(term.to_string()).or_default();
        if postings.last() != Some(&doc_id) {
            postings.push(doc_id);
        }
    }

    /// Replace the postings of `term` wholesale. Used by the decoders.
    pub(crate) fn insert(&mut self, term: Term, postings: Postings) -> Option<Postings> {
        self.terms.insert(term, postings)
    }

    pub fn postings(&self, term: &str) -> &[DocId] {
        self.terms.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_term(&self, term: &str) -> bool { self.terms.contains_key(term) }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    pub fn terms(&self) -> impl Iterator<Item = &str> { self.terms.keys().map(String::as_str) }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DocId])> {
        self.terms.iter().map(|(t, p)| (t.as_str(), p.as_slice()))
    }
}

impl<T: Into<Term>> FromIterator<(T, Postings)> for InvertedIndex {
    fn from_iter<I: IntoIterator<Item = (T, Postings)>>(iter: I) -> Self {
        Self { terms: iter.into_iter().map(|(t, p)| (t.into(), p)).collect() }
    }
}
