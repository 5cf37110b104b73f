use anyhow::{bail, Context, Result};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1251};
use invindex::{build_inverted_index_with, dump_to_path, format_result, load_documents, load_from_path, query_line, BuildOptions, IndexError, StorageFormat};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

pub const DEFAULT_DATASET_PATH: &str = "../resourses/wikipedia.sample";
pub const DEFAULT_INVERTED_INDEX_STORE_PATH: &str = "inverted.index";

/// Text encoding of a query file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryEncoding {
    Utf8,
    Cp1251,
}

impl QueryEncoding {
    fn encoding(self) -> &'static Encoding {
        match self {
            QueryEncoding::Utf8 => UTF_8,
            QueryEncoding::Cp1251 => WINDOWS_1251,
        }
    }
}

/// Where queries come from: words given on the command line form a single
/// query, a file (or `-` for stdin) holds one query per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySource {
    Words(Vec<String>),
    File { path: String, encoding: QueryEncoding },
}

pub fn process_build(dataset: &Path, output: &Path, format: StorageFormat, options: BuildOptions) -> Result<()> {
    tracing::info!(dataset = %dataset.display(), "building index");
    let documents = load_documents(dataset).context("failed to read dataset")?;
    let index = build_inverted_index_with(&documents, options)
        .with_context(|| format!("failed to build index from {}", dataset.display()))?;
    dump_to_path(&index, output, format.policy().as_ref())
        .with_context(|| format!("failed to write index to {}", output.display()))?;
    tracing::info!(output = %output.display(), "index build complete");
    Ok(())
}

/// Load the index and write one comma-separated result line per query to `out`.
pub fn process_queries<W: Write>(index_path: &Path, format: StorageFormat, source: &QuerySource, out: &mut W) -> Result<()> {
    let index = load_from_path(index_path, format.policy().as_ref())
        .with_context(|| format!("failed to load index from {}", index_path.display()))?;

    let queries = match source {
        QuerySource::Words(words) => words.join(" "),
        QuerySource::File { path, encoding } => {
            tracing::info!(path = %path, ?encoding, "read queries from");
            read_queries(path, *encoding)?
        }
    };

    for line in queries.lines() {
        let line = line.trim();
        match query_line(&index, line) {
            Ok(ids) => writeln!(out, "{}", format_result(&ids))?,
            Err(IndexError::EmptyQuery) => {
                tracing::warn!("empty query line");
                writeln!(out)?;
            }
            Err(e) => return Err(e).context("query failed"),
        }
    }
    out.flush()?;
    Ok(())
}

fn read_queries(path: &str, encoding: QueryEncoding) -> Result<String> {
    let bytes = if path == "-" {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf).context("failed to read queries from stdin")?;
        buf
    } else {
        fs::read(path).with_context(|| format!("can't open '{path}'"))?
    };
    decode_queries(&bytes, encoding).with_context(|| format!("failed to decode queries from '{path}'"))
}

pub fn decode_queries(bytes: &[u8], encoding: QueryEncoding) -> Result<String> {
    let (text, had_errors) = encoding.encoding().decode_without_bom_handling(bytes);
    if had_errors {
        bail!("input is not valid {}", encoding.encoding().name());
    }
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_cp1251() {
        // "привет" in windows-1251
        let bytes = [0xEF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2];
        assert_eq!(decode_queries(&bytes, QueryEncoding::Cp1251).unwrap(), "привет");
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert!(decode_queries(&[0xEF, 0xF0], QueryEncoding::Utf8).is_err());
        assert_eq!(decode_queries("мир".as_bytes(), QueryEncoding::Utf8).unwrap(), "мир");
    }
}
