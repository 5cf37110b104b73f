use crate::error::{IndexError, Result};
use crate::index::DocId;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DOC_ID: Regex = Regex::new(r"^[0-9]+$").expect("valid regex");
}

/// One parsed document line: the id plus its words in order of appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    pub doc_id: DocId,
    pub words: Vec<&'a str>,
}

/// Parse `<doc_id> <word> <word> ...`. `record` is the 1-based line number used in errors.
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_record(line: &str, record: usize) -> Result<Option<Record<'_>>> {
    let mut tokens = line.split_whitespace();
    let Some(first) = tokens.next() else { return Ok(None) };
    if !DOC_ID.is_match(first) {
        return Err(IndexError::Parse { record, token: first.to_string() });
    }
    // all-digit tokens only fail to parse as u64 on overflow
    let id: u64 = first.parse().map_err(|_| IndexError::DocIdOutOfRange { record, id: u64::MAX })?;
    let doc_id = DocId::try_from(id).map_err(|_| IndexError::DocIdOutOfRange { record, id })?;
    Ok(Some(Record { doc_id, words: tokens.collect() }))
}
