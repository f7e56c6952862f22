use std::{
    io::{
        self,
        Write,
    },
    path::PathBuf,
};

use anyhow::Result;
use clap::{
    Parser,
    Subcommand,
};
use tangocho::{
    core::NewWord,
    store::ImportOutcome,
    WordStore,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tangocho", about = "Personal vocabulary notebook", version)]
struct Cli {
    /// Directory holding words.json (defaults to the app data dir).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import words from a .json or .csv vocabulary file.
    Import { file: PathBuf },
    /// Add a single word.
    Add {
        kanji: String,
        meaning: String,
        #[arg(long, default_value = "")]
        furigana: String,
        #[arg(long, default_value = "")]
        example: String,
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        collection: Option<String>,
    },
    /// List words, optionally filtered.
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        collection: Option<String>,
    },
    /// Remove a word by id.
    Remove {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// List collection and group names.
    Collections,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut store = match &cli.data_dir {
        Some(dir) => WordStore::open(dir.join("words.json"))?,
        None => WordStore::load()?,
    };

    match cli.command {
        Command::Import { file } => match store.import_file(&file) {
            Ok(ImportOutcome::Imported { count, collection }) => {
                println!("{} words imported into \"{}\"", count, collection);
            }
            Ok(ImportOutcome::NoValidWords) => {
                println!("No valid words found in {}", file.display());
            }
            Err(e) => {
                eprintln!("Failed to import {}: {}", file.display(), e);
                std::process::exit(1);
            }
        },
        Command::Add { kanji, meaning, furigana, example, group, collection } => {
            let record = store.add(NewWord { kanji, furigana, meaning, example, group, collection })?;
            println!("Added {} ({})", record.kanji, record.id);
        }
        Command::List { search, group, collection } => {
            let words = store.filter(&search, group.as_deref(), collection.as_deref());
            for word in &words {
                let furigana =
                    if word.furigana.is_empty() { String::new() } else { format!(" [{}]", word.furigana) };
                println!(
                    "{}  {}{}  — {}  ({} / {})",
                    word.id, word.kanji, furigana, word.meaning, word.collection, word.group
                );
            }
            println!("{} words", words.len());
        }
        Command::Remove { id, yes } => {
            if !yes && !confirm("この単語を削除しますか？ (Delete this word?) [y/N] ")? {
                println!("Cancelled");
                return Ok(());
            }
            if store.delete(&id)? {
                println!("Deleted {}", id);
            } else {
                println!("No word with id {}", id);
            }
        }
        Command::Collections => {
            println!("Collections:");
            for name in store.collection_names() {
                println!("  {}", name);
            }
            println!("Groups:");
            for name in store.group_names() {
                println!("  {}", name);
            }
        }
    }

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
