use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as _;

use bibtex_unicode::{CharacterRecord, Parser, UnicodeMapping};

/// Parse a BibTeX file and print the entries as JSON
#[derive(clap::Parser, Debug)]
#[command(name = "bibtex-unicode")]
#[command(version, about, long_about = None)]
struct Args {
    /// BibTeX file to parse
    bib: PathBuf,

    /// JSON character dataset used to convert LaTeX macros to Unicode
    dataset: Option<PathBuf>,
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();

    let mapping = match &args.dataset {
        Some(dataset) => {
            let records: Vec<CharacterRecord> =
                serde_json::from_str(&fs::read_to_string(dataset)?)?;
            UnicodeMapping::from_records(records)
        }
        None => UnicodeMapping::empty(),
    };

    let input = fs::read_to_string(&args.bib)?;
    let bib = Parser::new(mapping).parse(&input);
    println!("{}", serde_json::to_string_pretty(&bib)?);

    Ok(if bib.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}
