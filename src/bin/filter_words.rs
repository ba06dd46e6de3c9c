use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde_json::{Map, Value};

use typethis::words::filter_by_length;

/// rebuild a bundled dictionary from a bigger word list
///
/// Takes a JSON object mapping words to anything (such as the
/// english-words `words_dictionary.json`) and keeps only the words whose
/// length fits the test. Run once per dictionary; the result is committed
/// under `data/` and compiled into the main binary.
#[derive(Parser, Debug)]
#[clap(version, about)]
struct Cli {
    /// source dictionary, a JSON object keyed by word
    source: PathBuf,

    /// shortest word to keep
    #[clap(long, default_value_t = 2)]
    min_len: usize,

    /// longest word to keep
    #[clap(long, default_value_t = 6)]
    max_len: usize,

    /// output path, `words_<min>-<max>.json` next to the source when unset
    #[clap(short = 'o', long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let raw = fs::read_to_string(&cli.source)
        .with_context(|| format!("could not read {}", cli.source.display()))?;
    let entries: Map<String, Value> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON object of words", cli.source.display()))?;

    let filtered = filter_by_length(&entries, cli.min_len, cli.max_len);
    println!("New list: {} words.", filtered.len());

    let output = cli.output.unwrap_or_else(|| {
        cli.source
            .with_file_name(format!("words_{}-{}.json", cli.min_len, cli.max_len))
    });
    let json = serde_json::to_string(&filtered)
        .context("could not serialize the filtered dictionary")?;
    fs::write(&output, json).with_context(|| format!("could not write {}", output.display()))?;

    Ok(())
}
