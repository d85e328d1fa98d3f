use clap::Parser;
use lang_sync::{
  folder::{DEFAULT_EXTENSION, LangFolder},
  report::FileReport,
  sync::{LangSync, LangSyncOptions},
};
use std::{path::PathBuf, process::ExitCode};

#[derive(Parser)]
#[command(
  name = "lang-sync",
  about = "Keep a folder of .lang translation files in sync with a model language file",
  version,
  author
)]
struct Cli {
  /// Path to the folder containing the lang files
  #[arg(short, long)]
  folder: PathBuf,

  /// Model lang file name (e.g. en_us.lang)
  #[arg(short, long)]
  model: Option<String>,

  /// Apply the model to every other file instead of printing a report
  #[arg(long, requires = "model")]
  apply: bool,

  /// Append 'TOTRANSLATE' to values copied from the model
  #[arg(long)]
  add_totranslate: bool,

  /// Only report on this file
  #[arg(long, conflicts_with = "apply")]
  file: Option<String>,

  /// Extension of the lang files, without the dot
  #[arg(short, long, default_value = DEFAULT_EXTENSION)]
  extension: String,

  /// Verbose output (-v for verbose, -vv for very verbose)
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
}

fn setup_tracing(verbose: u8) {
  use tracing_subscriber::fmt;
  use tracing_subscriber::prelude::*;

  let log_level = match verbose {
    1 => "debug",
    2 => "trace",
    _ => "info",
  };

  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(tracing_subscriber::EnvFilter::new(
      std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
    ))
    .init();
}

fn apply(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
  let model = cli.model.ok_or("--model is required when using --apply")?;

  let options = LangSyncOptions {
    folder: cli.folder,
    model,
    add_marker: cli.add_totranslate,
    extension: Some(cli.extension),
  };

  let summary = LangSync::apply_with_progress(options, |name| {
    println!("Applied model to: {}", name);
  })?;

  println!("\nDone! Applied model to {} file(s).", summary.count());

  Ok(())
}

fn report(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
  let folder = LangFolder::load(&cli.folder, &cli.extension)?;
  let index = folder.key_index();

  println!("Working dir: {}", folder.dir().display());
  println!("Files: {}", folder.len());
  println!("Unique keys: {}", index.len());
  if let Some(model) = &cli.model {
    println!("Model: {}", folder.file(model)?.name());
  }

  let files = match &cli.file {
    Some(name) => vec![folder.file(name)?],
    None => folder.files().collect(),
  };

  for file in files {
    println!("\n==> {} <==", file.name());
    print!("{}", FileReport::for_file(file, &index));
  }

  Ok(())
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  setup_tracing(cli.verbose);

  let result = if cli.apply { apply(cli) } else { report(cli) };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("Error: {}", err);
      ExitCode::FAILURE
    }
  }
}
