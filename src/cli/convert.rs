use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mzexclude::mztab;
use mzexclude::table::csv_io;

pub fn run(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let output = output.unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        input.with_file_name(format!("{}.csv", stem))
    });

    let table = mztab::parse_file(&input)
        .with_context(|| format!("Failed to parse mzTab: {}", input.display()))?;

    csv_io::write_table(&table, &output)
        .with_context(|| format!("Failed to write table: {}", output.display()))?;

    info!(
        "Wrote {} features for sample '{}' to {}",
        table.len(),
        table.sample_name,
        output.display()
    );

    Ok(())
}
