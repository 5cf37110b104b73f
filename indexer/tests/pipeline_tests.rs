use indexer::{process_build, process_queries, QueryEncoding, QuerySource};
use invindex::{BuildOptions, StorageFormat};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const DATASET: &str = "\
1 the quick brown fox
2 the lazy dog
3 quick dog runs
4 привет мир
";

fn build(dir: &Path, format: StorageFormat) -> std::path::PathBuf {
    let dataset = dir.join("wiki.sample");
    let output = dir.join("inverted.index");
    fs::write(&dataset, DATASET).unwrap();
    process_build(&dataset, &output, format, BuildOptions::default()).unwrap();
    output
}

fn run(index: &Path, format: StorageFormat, source: QuerySource) -> String {
    let mut out = Vec::new();
    process_queries(index, format, &source, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn query_file_prints_one_line_per_query() {
    let dir = tempdir().unwrap();
    let index = build(dir.path(), StorageFormat::Sentinel);
    let queries = dir.path().join("queries.txt");
    fs::write(&queries, "the\nquick dog\n\nmissing\nthe dog\n").unwrap();

    let out = run(&index, StorageFormat::Sentinel, QuerySource::File { path: queries.to_string_lossy().into(), encoding: QueryEncoding::Utf8 });
    assert_eq!(out, "1,2\n3\n\n\n2\n");
    assert!(!out.contains("load"));
}

#[test]
fn command_line_words_are_one_query() {
    let dir = tempdir().unwrap();
    let index = build(dir.path(), StorageFormat::Framed);
    let out = run(&index, StorageFormat::Framed, QuerySource::Words(vec!["quick".into(), "brown".into()]));
    assert_eq!(out, "1\n");
}

#[test]
fn cp1251_query_file() {
    let dir = tempdir().unwrap();
    let index = build(dir.path(), StorageFormat::Sentinel);
    let queries = dir.path().join("queries.cp1251");
    // "мир\n" in windows-1251
    fs::write(&queries, [0xEC, 0xE8, 0xF0, b'\n']).unwrap();

    let out = run(&index, StorageFormat::Sentinel, QuerySource::File { path: queries.to_string_lossy().into(), encoding: QueryEncoding::Cp1251 });
    assert_eq!(out, "4\n");
}

#[test]
fn malformed_dataset_aborts_build() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("bad.sample");
    let output = dir.path().join("inverted.index");
    fs::write(&dataset, "1 ok\nabc not a number\n").unwrap();

    let err = process_build(&dataset, &output, StorageFormat::Sentinel, BuildOptions::default()).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("bad.sample"), "{msg}");
    assert!(msg.contains("\"abc\""), "{msg}");
    assert!(!output.exists());
}

#[test]
fn missing_index_names_the_path() {
    let dir = tempdir().unwrap();
    let mut out = Vec::new();
    let err = process_queries(&dir.path().join("absent.index"), StorageFormat::Sentinel, &QuerySource::Words(vec!["a".into()]), &mut out).unwrap_err();
    assert!(format!("{err:#}").contains("absent.index"));
    assert!(out.is_empty());
}
