//! Sentinel-delimited binary format.
//!
//! ```text
//! term bytes | SENTINEL | doc ids as u16 LE, back to back | SENTINEL
//! ```
//!
//! repeated once per term, with nothing between entries. `SENTINEL` is the
//! UTF-8 encoding of U+7A120. The format has no escaping: a term or a packed
//! postings block that contains the sentinel bytes would be split in the wrong
//! place on load. The encoder refuses such fields instead of writing them.
//! No proper suffix of the sentinel is also a prefix of it, so a match can
//! never straddle a field boundary and checking each field on its own is enough.

use crate::error::{IndexError, Result};
use crate::index::{DocId, InvertedIndex};
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

pub const SENTINEL: &[u8] = b"\xF1\xBA\x84\xA0";

const ID_WIDTH: usize = std::mem::size_of::<DocId>();

/// Encode the whole index in memory.
pub fn encode(index: &InvertedIndex) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut packed = Vec::new();
    for (term, postings) in index.iter() {
        packed.clear();
        for &id in postings {
            packed.write_u16::<LittleEndian>(id)?;
        }
        if contains_sentinel(term.as_bytes()) || contains_sentinel(&packed) {
            return Err(IndexError::SentinelCollision { term: term.to_string() });
        }
        out.extend_from_slice(term.as_bytes());
        out.extend_from_slice(SENTINEL);
        out.extend_from_slice(&packed);
        out.extend_from_slice(SENTINEL);
    }
    Ok(out)
}

pub fn decode(bytes: &[u8]) -> Result<InvertedIndex> {
    let mut chunks = split(bytes);
    // a well-formed stream ends with a sentinel, leaving one empty chunk
    let tail = chunks.pop().unwrap_or_default();
    if !tail.is_empty() {
        return Err(IndexError::TrailingChunk { len: tail.len() });
    }
    if chunks.len() % 2 != 0 {
        let orphan = chunks.last().map_or(0, |c| c.len());
        return Err(IndexError::TrailingChunk { len: orphan });
    }

    let mut index = InvertedIndex::new();
    for pair in chunks.chunks_exact(2) {
        let term = std::str::from_utf8(pair[0])?;
        let packed = pair[1];
        if packed.len() % ID_WIDTH != 0 {
            return Err(IndexError::OddPostingsChunk { term: term.to_string(), len: packed.len() });
        }
        let mut postings = vec![0; packed.len() / ID_WIDTH];
        LittleEndian::read_u16_into(packed, &mut postings);
        if index.insert(term.to_string(), postings).is_some() {
            return Err(IndexError::DuplicateTerm(term.to_string()));
        }
    }
    Ok(index)
}

fn contains_sentinel(field: &[u8]) -> bool {
    field.windows(SENTINEL.len()).any(|w| w == SENTINEL)
}

/// Split on every sentinel occurrence, like `bytes.split(SENTINEL)`.
fn split(bytes: &[u8]) -> Vec<&[u8]> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut pos = 0;
    while pos + SENTINEL.len() <= bytes.len() {
        if &bytes[pos..pos + SENTINEL.len()] == SENTINEL {
            chunks.push(&bytes[start..pos]);
            pos += SENTINEL.len();
            start = pos;
        } else {
            pos += 1;
        }
    }
    chunks.push(&bytes[start..]);
    chunks
}
