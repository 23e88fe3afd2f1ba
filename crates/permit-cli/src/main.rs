//! Tree-permit merge batch driver
//!
//! Scans an input directory for permit tables, conforms each file to the
//! canonical column set, merges everything into one deduplicated table, and
//! writes `merged.xlsx` and `merged.csv`.

use clap::Parser;
use permit_core::{
    merge, normalize, read_table, scan_input_dir, write_csv_file, write_xlsx_file, Table,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "permit-cli")]
#[command(about = "Merge tree-permit spreadsheets into one table", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory scanned recursively for input files
    #[arg(long, default_value = "input_files")]
    input: PathBuf,

    /// Directory the merged artifacts are written to
    #[arg(long, default_value = "output")]
    output: PathBuf,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> permit_core::Result<()> {
    let cli = Cli::parse();

    let files = scan_input_dir(&cli.input);
    if files.is_empty() {
        println!(
            "No supported files found in the '{}' directory.",
            cli.input.display()
        );
        return Ok(());
    }

    println!("Found {} file(s), starting merge process...", files.len());

    // Per-file failures skip that file; the batch continues
    let mut tables: Vec<(Table, String)> = Vec::new();
    for path in &files {
        let name = file_label(path);
        match read_table(path) {
            Ok(table) if table.is_empty() => {
                println!("Skipping {} (empty)", name);
            }
            Ok(table) => {
                let normalized = normalize(table);
                println!("Loaded: {} ({} rows)", name, normalized.row_count());
                tables.push((normalized, name));
            }
            Err(e) => {
                eprintln!("Warning: could not read {}: {}", name, e);
            }
        }
    }

    if tables.is_empty() {
        println!("Failed to load any data.");
        return Ok(());
    }

    let files_merged = tables.len();
    let merged = merge(tables)?;

    std::fs::create_dir_all(&cli.output)?;
    let excel_path = cli.output.join("merged.xlsx");
    let csv_path = cli.output.join("merged.csv");
    write_xlsx_file(&merged, &excel_path)?;
    write_csv_file(&merged, &csv_path)?;

    println!();
    println!("Merge completed successfully!");
    println!("Files found: {}", files.len());
    println!("Files merged: {}", files_merged);
    println!("Total rows in merged table: {}", merged.row_count());
    println!("Output saved as: {}", excel_path.display());
    println!("Also saved as CSV: {}", csv_path.display());

    Ok(())
}

/// The `source_file` tag for a path: its final component
fn file_label(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
