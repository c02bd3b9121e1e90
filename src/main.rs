use clap::Parser;
use daypress::build;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "daypress")]
#[command(about = "Static blog generator for Day One journals")]
#[command(long_about = "\
Static blog generator for Day One journals

Walks a Day One journal directory, renders every entry carrying the publish
tag into its own HTML page, and writes an index listing the published
entries newest-first. Pages are rewritten only when stale, carry their
entry's creation time as the file timestamp, and land on disk via atomic
renames, so a crash never leaves a half-written page behind.

Templates are minijinja files loaded from the template directory:

  templates/
  ├── entry.html      # one render per published entry
  └── index.html      # the reverse-chronological listing

Set RUST_LOG to control log verbosity (per-file decisions log at info).")]
#[command(version)]
struct Cli {
    /// Day One journal directory to read entries from
    #[arg(long, default_value = "Journal.dayone")]
    journal: PathBuf,

    /// Output directory for the generated site
    #[arg(long, default_value = "dist")]
    output: PathBuf,

    /// Publish only entries carrying this tag
    #[arg(long, default_value = "blog")]
    tag: String,

    /// Directory holding the entry.html and index.html templates
    #[arg(long, default_value = "templates")]
    templates: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let report = build::build(&cli.journal, &cli.templates, &cli.output, &cli.tag)?;
    println!("{report}");
    Ok(())
}
