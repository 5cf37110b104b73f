use crate::error::{IndexError, Result};
use crate::{codec, framed, InvertedIndex};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// A swappable on-disk encoding for an [`InvertedIndex`].
///
/// Building and querying never look at bytes directly, they go through a policy.
pub trait StoragePolicy {
    fn name(&self) -> &'static str;
    fn dump(&self, index: &InvertedIndex, writer: &mut dyn Write) -> Result<()>;
    fn load(&self, reader: &mut dyn Read) -> Result<InvertedIndex>;
}

/// Term bytes and packed u16 ids separated by a reserved 4-byte sentinel.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentinelPolicy;

/// Length-prefixed fields behind an `IIDX` header; no reserved byte patterns.
#[derive(Debug, Clone, Copy, Default)]
pub struct FramedPolicy;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPolicy;

#[derive(Debug, Clone, Copy, Default)]
pub struct BincodePolicy;

impl StoragePolicy for SentinelPolicy {
    fn name(&self) -> &'static str { "sentinel" }

    fn dump(&self, index: &InvertedIndex, writer: &mut dyn Write) -> Result<()> {
        // encode fully first so a collision never leaves half an index behind
        let bytes = codec::encode(index)?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    fn load(&self, reader: &mut dyn Read) -> Result<InvertedIndex> {
        codec::decode(&read_all(reader)?)
    }
}

impl StoragePolicy for FramedPolicy {
    fn name(&self) -> &'static str { "framed" }

    fn dump(&self, index: &InvertedIndex, writer: &mut dyn Write) -> Result<()> {
        let bytes = framed::encode(index)?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    fn load(&self, reader: &mut dyn Read) -> Result<InvertedIndex> {
        framed::decode(&read_all(reader)?)
    }
}

impl StoragePolicy for JsonPolicy {
    fn name(&self) -> &'static str { "json" }

    fn dump(&self, index: &InvertedIndex, writer: &mut dyn Write) -> Result<()> {
        let json = serde_json::to_string(index)?;
        writer.write_all(json.as_bytes())?;
        Ok(())
    }

    fn load(&self, reader: &mut dyn Read) -> Result<InvertedIndex> {
        let index = serde_json::from_slice(&read_all(reader)?)?;
        Ok(index)
    }
}

impl StoragePolicy for BincodePolicy {
    fn name(&self) -> &'static str { "bincode" }

    fn dump(&self, index: &InvertedIndex, writer: &mut dyn Write) -> Result<()> {
        let bytes = bincode::serialize(index)?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    fn load(&self, reader: &mut dyn Read) -> Result<InvertedIndex> {
        let index = bincode::deserialize(&read_all(reader)?)?;
        Ok(index)
    }
}

/// Policy selector, e.g. for command line flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    #[default]
    Sentinel,
    Framed,
    Json,
    Bincode,
}

impl StorageFormat {
    pub fn policy(self) -> Box<dyn StoragePolicy> {
        match self {
            StorageFormat::Sentinel => Box::new(SentinelPolicy),
            StorageFormat::Framed => Box::new(FramedPolicy),
            StorageFormat::Json => Box::new(JsonPolicy),
            StorageFormat::Bincode => Box::new(BincodePolicy),
        }
    }
}

impl std::str::FromStr for StorageFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sentinel" => Ok(StorageFormat::Sentinel),
            "framed" => Ok(StorageFormat::Framed),
            "json" => Ok(StorageFormat::Json),
            "bincode" => Ok(StorageFormat::Bincode),
            other => Err(format!("unknown storage format {other:?}, expected one of sentinel, framed, json, bincode")),
        }
    }
}

impl std::fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.policy().name())
    }
}

fn read_all(reader: &mut dyn Read) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Write `index` to `path` through `policy`.
///
/// The bytes go to a sibling temporary file which is renamed over `path` once
/// complete, so readers see either the old file or the whole new one.
pub fn dump_to_path<P: AsRef<Path>>(index: &InvertedIndex, path: P, policy: &dyn StoragePolicy) -> Result<()> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), format = policy.name(), num_terms = index.len(), "dump index to");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| IndexError::io(parent, e))?;
    }
    let tmp = tmp_path(path);
    let written = write_file(index, &tmp, policy).and_then(|_| fs::rename(&tmp, path).map_err(|e| IndexError::io(path, e)));
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}

fn write_file(index: &InvertedIndex, tmp: &Path, policy: &dyn StoragePolicy) -> Result<()> {
    let mut f = File::create(tmp).map_err(|e| IndexError::io(tmp, e))?;
    policy.dump(index, &mut f).map_err(|e| with_path(e, tmp))?;
    f.sync_all().map_err(|e| IndexError::io(tmp, e))?;
    Ok(())
}

/// Read and decode the whole file at `path`.
pub fn load_from_path<P: AsRef<Path>>(path: P, policy: &dyn StoragePolicy) -> Result<InvertedIndex> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), format = policy.name(), "load index from");
    let mut f = File::open(path).map_err(|e| IndexError::io(path, e))?;
    let index = policy.load(&mut f).map_err(|e| with_path(e, path))?;
    tracing::debug!(num_terms = index.len(), "index loaded");
    Ok(index)
}

fn with_path(err: IndexError, path: &Path) -> IndexError {
    match err {
        IndexError::Stream(source) => IndexError::io(path, source),
        other => other,
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names_match_policies() {
        for format in [StorageFormat::Sentinel, StorageFormat::Framed, StorageFormat::Json, StorageFormat::Bincode] {
            let expected = serde_json::to_string(&format).unwrap();
            assert_eq!(expected.trim_matches('"'), format.policy().name());
        }
    }

    #[test]
    fn format_from_str() {
        assert_eq!("Framed".parse::<StorageFormat>().unwrap(), StorageFormat::Framed);
        assert_eq!(StorageFormat::default().to_string(), "sentinel");
        assert!("zlib".parse::<StorageFormat>().is_err());
    }

    #[test]
    fn tmp_path_is_sibling() {
        assert_eq!(tmp_path(Path::new("out/inverted.index")), PathBuf::from("out/inverted.index.tmp"));
    }

    #[test]
    fn policies_roundtrip_through_memory() {
        let index: InvertedIndex = [("a", vec![1, 2]), ("b", vec![1])].into_iter().collect();
        for format in [StorageFormat::Sentinel, StorageFormat::Framed, StorageFormat::Json, StorageFormat::Bincode] {
            let policy = format.policy();
            let mut buf = Vec::new();
            policy.dump(&index, &mut buf).unwrap();
            let loaded = policy.load(&mut buf.as_slice()).unwrap();
            assert_eq!(loaded, index, "{}", policy.name());
        }
    }
}
