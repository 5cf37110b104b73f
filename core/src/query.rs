use crate::error::{IndexError, Result};
use crate::index::{DocId, InvertedIndex};
use std::collections::HashSet;

/// Documents that contain every one of `words`.
///
/// Unknown words have empty postings, so a single miss empties the result.
/// An empty word list has no meaningful intersection and is rejected.
pub fn query<S: AsRef<str>>(index: &InvertedIndex, words: &[S]) -> Result<HashSet<DocId>> {
    let mut lists: Vec<&[DocId]> = words.iter().map(|w| index.postings(w.as_ref())).collect();
    if lists.is_empty() {
        return Err(IndexError::EmptyQuery);
    }
    // start from the shortest list to keep the candidate set small
    lists.sort_by_key(|p| p.len());
    let mut result: HashSet<DocId> = lists[0].iter().copied().collect();
    for postings in &lists[1..] {
        if result.is_empty() {
            break;
        }
        let other: HashSet<DocId> = postings.iter().copied().collect();
        result.retain(|id| other.contains(id));
    }
    Ok(result)
}

/// Run a whitespace-separated query line.
pub fn query_line(index: &InvertedIndex, line: &str) -> Result<HashSet<DocId>> {
    let words: Vec<&str> = line.split_whitespace().collect();
    query(index, &words)
}

/// Comma-separated ids, ascending.
pub fn format_result(ids: &HashSet<DocId>) -> String {
    let mut sorted: Vec<DocId> = ids.iter().copied().collect();
    sorted.sort_unstable();
    sorted.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",")
}

impl InvertedIndex {
    pub fn query<S: AsRef<str>>(&self, words: &[S]) -> Result<HashSet<DocId>> {
        query(self, words)
    }
}
