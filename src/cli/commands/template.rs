//! `cript-ingest --template` - print the expected CSV layout

use console::style;
use miette::{IntoDiagnostic, Result};
use std::io;

use crate::ingest::CSV_COLUMNS;

const EXAMPLE_ROW: [&str; 16] = [
    "PS",
    "PMMA",
    "{[][<]CC(c1ccccc1)[>][<]}{[>][<]CC(C)(C(=O)OC)[>][]}",
    "20",
    "0.17",
    "1.21",
    "20",
    "0.15",
    "1.08",
    "12.5",
    "100",
    "8000",
    "298",
    "0.04",
    "0.002",
    "runs/ps_pmma_01",
];

pub fn run() -> Result<()> {
    // Output to stdout (can be redirected to file)
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(CSV_COLUMNS).into_diagnostic()?;
    writer.write_record(EXAMPLE_ROW).into_diagnostic()?;
    writer.flush().into_diagnostic()?;

    // Usage hint goes to stderr so it doesn't end up in the redirected file
    eprintln!();
    eprintln!(
        "{} Template generated. Redirect to file: cript-ingest --template > polymers.csv",
        style("→").blue(),
    );

    Ok(())
}
