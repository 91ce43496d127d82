//! CLI subcommands: one module per operation, each an `Args` struct plus a
//! `run()` entry point.

pub mod addproto;
pub mod align;
pub mod array2fasta;
pub mod arrayblast;
pub mod getpams;
pub mod loadarrays;
pub mod loadgenes;
pub mod loadloci;
pub mod makedb;

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

/// Open the output sink: a file when a path is given, stdout otherwise.
pub(crate) fn open_output(out: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = if let Some(path) = out {
        Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("Cannot create output file {}", path.display())
        })?))
    } else {
        Box::new(BufWriter::new(io::stdout().lock()))
    };
    Ok(writer)
}

/// A tab-delimited file with a header line: lower-cased column names mapped
/// to indices, plus the data rows. Comment lines (`#`) are skipped.
pub(crate) struct HeaderTable {
    pub columns: FxHashMap<String, usize>,
    pub rows: Vec<Vec<String>>,
}

impl HeaderTable {
    pub fn read(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
        let mut columns: Option<FxHashMap<String, usize>> = None;
        let mut ncols = 0;
        let mut rows = Vec::new();

        for (lineno, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let cols: Vec<String> = line.split('\t').map(|c| c.trim().to_string()).collect();
            match columns {
                None => {
                    ncols = cols.len();
                    columns = Some(
                        cols.iter()
                            .enumerate()
                            .map(|(i, name)| (name.to_lowercase().replace(' ', "_"), i))
                            .collect(),
                    );
                }
                Some(_) => {
                    if cols.len() != ncols {
                        bail!(
                            "{} line {}: expected {} columns, found {}",
                            path.display(),
                            lineno + 1,
                            ncols,
                            cols.len()
                        );
                    }
                    rows.push(cols);
                }
            }
        }

        match columns {
            Some(columns) => Ok(Self { columns, rows }),
            None => bail!("{} is empty (no header line)", path.display()),
        }
    }

    /// Value of `column` in `row`, with empty cells and `NA` as `None`.
    pub fn get<'a>(&self, row: &'a [String], column: &str) -> Option<&'a str> {
        let idx = *self.columns.get(column)?;
        let value = row.get(idx)?.as_str();
        if value.is_empty() || value.eq_ignore_ascii_case("na") {
            None
        } else {
            Some(value)
        }
    }

    /// Like [`Self::get`] but parses an integer; a malformed number is fatal.
    pub fn get_int(&self, row: &[String], column: &str) -> Result<Option<i64>> {
        match self.get(row, column) {
            None => Ok(None),
            Some(raw) => Ok(Some(raw.parse().with_context(|| {
                format!("Bad {} value '{}'", column, raw)
            })?)),
        }
    }
}
