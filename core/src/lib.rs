//! Inverted index over whitespace-tokenized documents: build it from
//! `<doc_id> <word>...` records, persist it through a [`StoragePolicy`], load it
//! back and answer all-terms intersection queries.

pub mod builder;
pub mod codec;
pub mod error;
pub mod framed;
pub mod index;
pub mod persist;
pub mod query;
pub mod tokenizer;

pub use builder::{build_inverted_index, build_inverted_index_with, load_documents, BuildOptions};
pub use error::{IndexError, Result};
pub use index::{DocId, InvertedIndex, Postings, Term};
pub use persist::{dump_to_path, load_from_path, StorageFormat, StoragePolicy};
pub use query::{format_result, query, query_line};
