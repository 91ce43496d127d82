//! `load-arrays`: populate the spacers and drs tables from per-locus array
//! files.
//!
//! Array files are tab-delimited, one repeat/spacer unit per line:
//! `<repeat_start> <repeat_seq> <spacer_seq>`, the trailing repeat carrying
//! no spacer. Element coordinates are derived by walking the line: the
//! repeat ends at `start + len - 1` and the spacer follows immediately.
//! The files to load come from the `array_file` column of the loci table,
//! resolved against `--array-dir`.

use anyhow::{bail, Context, Result};
use clap::Args;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::db::{ArrayElement, CldbDatabase};
use crate::key::ElementType;

#[derive(Args, Debug)]
pub struct LoadArraysArgs {
    #[arg(short, long)]
    pub database: PathBuf,
    /// Directory the array_file paths in the loci table are relative to
    #[arg(long, default_value = ".")]
    pub array_dir: PathBuf,
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

/// Parsed content of one array file.
pub struct ParsedArray {
    pub repeats: Vec<ArrayElement>,
    pub spacers: Vec<ArrayElement>,
}

/// Parse an array file for `locus_id`. Lines whose first column is not an
/// integer are treated as headers and skipped.
pub fn parse_array<R: BufRead>(reader: R, locus_id: &str) -> Result<ParsedArray> {
    let mut repeats = Vec::new();
    let mut spacers = Vec::new();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let cols: Vec<&str> = trimmed.split('\t').collect();
        let start: i64 = match cols[0].trim().parse() {
            Ok(v) => v,
            Err(_) if repeats.is_empty() => continue, // header line
            Err(_) => bail!("Line {}: bad repeat start '{}'", lineno + 1, cols[0]),
        };
        if cols.len() < 2 || cols[1].trim().is_empty() {
            bail!("Line {}: missing repeat sequence", lineno + 1);
        }

        let repeat_seq = cols[1].trim().to_string();
        let repeat_end = start + repeat_seq.len() as i64 - 1;
        repeats.push(ArrayElement {
            locus_id: locus_id.to_string(),
            element_id: repeats.len() as u32 + 1,
            start,
            end: repeat_end,
            sequence: repeat_seq,
        });

        if let Some(spacer_seq) = cols.get(2).map(|s| s.trim()).filter(|s| !s.is_empty()) {
            let spacer_start = repeat_end + 1;
            spacers.push(ArrayElement {
                locus_id: locus_id.to_string(),
                element_id: spacers.len() as u32 + 1,
                start: spacer_start,
                end: spacer_start + spacer_seq.len() as i64 - 1,
                sequence: spacer_seq.to_string(),
            });
        }
    }

    Ok(ParsedArray { repeats, spacers })
}

fn parse_array_file(path: &Path, locus_id: &str) -> Result<ParsedArray> {
    let file =
        File::open(path).with_context(|| format!("Cannot open array file {}", path.display()))?;
    parse_array(BufReader::new(file), locus_id)
        .with_context(|| format!("Malformed array file {}", path.display()))
}

pub fn run(args: LoadArraysArgs) -> Result<()> {
    let mut db = CldbDatabase::open(&args.database)?;

    let mut all_repeats = Vec::new();
    let mut all_spacers = Vec::new();
    let mut loaded = 0usize;
    for (locus_id, array_file) in db.loci_array_files()? {
        let Some(array_file) = array_file else {
            eprintln!("[WARN] Locus {}: no array file recorded", locus_id);
            continue;
        };
        let path = args.array_dir.join(array_file);
        let parsed = parse_array_file(&path, &locus_id)?;
        if args.verbose {
            eprintln!(
                "[INFO] Locus {}: {} repeats, {} spacers",
                locus_id,
                parsed.repeats.len(),
                parsed.spacers.len()
            );
        }
        all_repeats.extend(parsed.repeats);
        all_spacers.extend(parsed.spacers);
        loaded += 1;
    }

    db.insert_elements(ElementType::DirectRepeat, &all_repeats)?;
    db.insert_elements(ElementType::Spacer, &all_spacers)?;
    if args.verbose {
        eprintln!(
            "[INFO] Loaded {} loci: {} repeats, {} spacers",
            loaded,
            all_repeats.len(),
            all_spacers.len()
        );
    }
    Ok(())
}
