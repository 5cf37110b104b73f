//! Length-prefixed binary format.
//!
//! Same conceptual layout as the sentinel format, but every field carries its
//! length so no byte pattern is reserved:
//!
//! ```text
//! magic "IIDX" | version u8 | term count u32
//! per term: term len u32 | term bytes | posting count u32 | ids u16 ...
//! ```
//!
//! All integers are little-endian.

use crate::error::{IndexError, Result};
use crate::index::InvertedIndex;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read};

pub const MAGIC: [u8; 4] = *b"IIDX";
pub const VERSION: u8 = 1;

pub fn encode(index: &InvertedIndex) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.extend_from_slice(&MAGIC);
    out.write_u8(VERSION)?;
    out.write_u32::<LittleEndian>(len_u32(index.len(), "index")?)?;
    for (term, postings) in index.iter() {
        out.write_u32::<LittleEndian>(len_u32(term.len(), term)?)?;
        out.extend_from_slice(term.as_bytes());
        out.write_u32::<LittleEndian>(len_u32(postings.len(), term)?)?;
        for &id in postings {
            out.write_u16::<LittleEndian>(id)?;
        }
    }
    Ok(out)
}

pub fn decode(bytes: &[u8]) -> Result<InvertedIndex> {
    let mut cur = Cursor::new(bytes);

    let mut magic = [0u8; 4];
    cur.read_exact(&mut magic).map_err(|_| IndexError::Truncated("magic"))?;
    if magic != MAGIC {
        return Err(IndexError::BadMagic(magic));
    }
    let version = cur.read_u8().map_err(|_| IndexError::Truncated("version"))?;
    if version != VERSION {
        return Err(IndexError::UnsupportedVersion(version));
    }
    let num_terms = cur.read_u32::<LittleEndian>().map_err(|_| IndexError::Truncated("term count"))?;

    let mut index = InvertedIndex::new();
    for _ in 0..num_terms {
        let term_len = cur.read_u32::<LittleEndian>().map_err(|_| IndexError::Truncated("term length"))? as usize;
        let term_bytes = take(&mut cur, term_len, "term")?;
        let term = std::str::from_utf8(term_bytes)?.to_string();

        let count = cur.read_u32::<LittleEndian>().map_err(|_| IndexError::Truncated("posting count"))? as usize;
        // check the remaining length before allocating for a hostile count
        let packed = take(&mut cur, count.saturating_mul(2), "postings")?;
        let mut postings = Vec::with_capacity(count);
        let mut ids = Cursor::new(packed);
        for _ in 0..count {
            postings.push(ids.read_u16::<LittleEndian>()?);
        }

        if index.contains_term(&term) {
            return Err(IndexError::DuplicateTerm(term));
        }
        index.insert(term, postings);
    }

    let rest = bytes.len() - cur.position() as usize;
    if rest != 0 {
        return Err(IndexError::TrailingChunk { len: rest });
    }
    Ok(index)
}

fn take<'a>(cur: &mut Cursor<&'a [u8]>, len: usize, what: &'static str) -> Result<&'a [u8]> {
    let data: &'a [u8] = *cur.get_ref();
    let start = cur.position() as usize;
    let end = start.checked_add(len).filter(|&end| end <= data.len()).ok_or(IndexError::Truncated(what))?;
    cur.set_position(end as u64);
    Ok(&data[start..end])
}

fn len_u32(len: usize, term: &str) -> Result<u32> {
    u32::try_from(len).map_err(|_| IndexError::TermTooLong(term.to_string()))
}
