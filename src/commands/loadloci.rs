//! `load-loci`: populate the loci table from a tab-delimited file.
//!
//! The input carries a header line; columns are matched by name
//! (case-insensitive, spaces as underscores). Only `locus_id` is required.
//! Rows without array boundaries load fine but draw a warning, since the
//! array loaders and leader queries cannot use them.

use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;

use super::HeaderTable;
use crate::db::{CldbDatabase, Locus};

#[derive(Args, Debug)]
pub struct LoadLociArgs {
    #[arg(short, long)]
    pub database: PathBuf,
    /// Tab-delimited loci file with a header line
    #[arg(short, long)]
    pub input: PathBuf,
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

pub fn run(args: LoadLociArgs) -> Result<()> {
    let table = HeaderTable::read(&args.input)?;
    if !table.columns.contains_key("locus_id") {
        bail!("{} has no locus_id column", args.input.display());
    }

    let mut loci = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let locus_id = match table.get(row, "locus_id") {
            Some(id) => id.to_string(),
            None => bail!("Row with empty locus_id in {}", args.input.display()),
        };
        let locus = Locus {
            locus_id,
            taxon_id: table.get(row, "taxon_id").map(str::to_string),
            taxon_name: table.get(row, "taxon_name").map(str::to_string),
            subtype: table.get(row, "subtype").map(str::to_string),
            scaffold: table.get(row, "scaffold").map(str::to_string),
            locus_start: table.get_int(row, "locus_start")?,
            locus_end: table.get_int(row, "locus_end")?,
            array_start: table.get_int(row, "array_start")?,
            array_end: table.get_int(row, "array_end")?,
            cas_status: table.get(row, "cas_status").map(str::to_string),
            array_status: table.get(row, "array_status").map(str::to_string),
            array_file: table.get(row, "array_file").map(str::to_string),
            author: table.get(row, "author").map(str::to_string),
        };
        if locus.array_start.is_none() || locus.array_end.is_none() {
            eprintln!(
                "[WARN] Locus {}: missing array start/end boundaries",
                locus.locus_id
            );
        }
        loci.push(locus);
    }

    let mut db = CldbDatabase::open(&args.database)?;
    let n = db.insert_loci(&loci)?;
    if args.verbose {
        eprintln!("[INFO] Loaded {} loci into {}", n, args.database.display());
    }
    Ok(())
}
