use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use indexer::{process_build, process_queries, QueryEncoding, QuerySource, DEFAULT_DATASET_PATH, DEFAULT_INVERTED_INDEX_STORE_PATH};
use invindex::{BuildOptions, StorageFormat};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "inverted-index")]
#[command(about = "tool to build, dump, load and query inverted index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build inverted index in binary format on hard drive
    Build {
        /// Path to the dataset, one `<doc_id> <words...>` record per line
        #[arg(short = 'd', long = "dataset", default_value = DEFAULT_DATASET_PATH)]
        dataset: PathBuf,
        /// Path to store the index
        #[arg(short = 'o', long = "output", default_value = DEFAULT_INVERTED_INDEX_STORE_PATH)]
        output: PathBuf,
        /// Storage format: sentinel, framed, json or bincode
        #[arg(long, default_value_t = StorageFormat::Sentinel)]
        format: StorageFormat,
        /// Fail instead of warning when document ids decrease
        #[arg(long, default_value_t = false)]
        strict_order: bool,
    },
    /// Query inverted index
    Query {
        /// Path to read the index from
        #[arg(short = 'i', long = "index", default_value = DEFAULT_INVERTED_INDEX_STORE_PATH)]
        index: PathBuf,
        /// Storage format the index was written with
        #[arg(long, default_value_t = StorageFormat::Sentinel)]
        format: StorageFormat,
        #[command(flatten)]
        input: QueryInput,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct QueryInput {
    /// Query to run against inverted index
    #[arg(short = 'q', long = "query", num_args = 1.., value_name = "WORD")]
    query: Option<Vec<String>>,
    /// UTF-8 query file, one query per line (`-` for stdin)
    #[arg(long = "query-file-utf8", value_name = "PATH")]
    query_file_utf8: Option<String>,
    /// CP1251 query file, one query per line (`-` for stdin)
    #[arg(long = "query-file-cp1251", value_name = "PATH")]
    query_file_cp1251: Option<String>,
}

impl QueryInput {
    fn into_source(self) -> QuerySource {
        match (self.query, self.query_file_utf8, self.query_file_cp1251) {
            (Some(words), _, _) => QuerySource::Words(words),
            (_, Some(path), _) => QuerySource::File { path, encoding: QueryEncoding::Utf8 },
            (_, _, Some(path)) => QuerySource::File { path, encoding: QueryEncoding::Cp1251 },
            // the arg group requires one of the three
            (None, None, None) => QuerySource::File { path: "-".into(), encoding: QueryEncoding::Utf8 },
        }
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { dataset, output, format, strict_order } => {
            process_build(&dataset, &output, format, BuildOptions { strict_order })
        }
        Commands::Query { index, format, input } => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            process_queries(&index, format, &input.into_source(), &mut out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn build_defaults() {
        let cli = Cli::try_parse_from(["inverted-index", "build"]).unwrap();
        match cli.command {
            Commands::Build { dataset, output, format, strict_order } => {
                assert_eq!(dataset, PathBuf::from(DEFAULT_DATASET_PATH));
                assert_eq!(output, PathBuf::from(DEFAULT_INVERTED_INDEX_STORE_PATH));
                assert_eq!(format, StorageFormat::Sentinel);
                assert!(!strict_order);
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn query_words_form_one_query() {
        let cli = Cli::try_parse_from(["inverted-index", "query", "-i", "x.index", "--format", "framed", "-q", "two", "words"]).unwrap();
        match cli.command {
            Commands::Query { index, format, input } => {
                assert_eq!(index, PathBuf::from("x.index"));
                assert_eq!(format, StorageFormat::Framed);
                assert_eq!(input.into_source(), QuerySource::Words(vec!["two".into(), "words".into()]));
            }
            _ => panic!("expected query"),
        }
    }

    #[test]
    fn query_file_encoding_selected_by_flag() {
        let cli = Cli::try_parse_from(["inverted-index", "query", "--query-file-cp1251", "q.txt"]).unwrap();
        let Commands::Query { input, .. } = cli.command else { panic!("expected query") };
        assert_eq!(input.into_source(), QuerySource::File { path: "q.txt".into(), encoding: QueryEncoding::Cp1251 });
    }

    #[test]
    fn query_sources_are_exclusive_and_required() {
        assert!(Cli::try_parse_from(["inverted-index", "query"]).is_err());
        assert!(Cli::try_parse_from(["inverted-index", "query", "-q", "a", "--query-file-utf8", "-"]).is_err());
    }
}
