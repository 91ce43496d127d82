//! `load-genes`: populate the genes table from a tab-delimited file.

use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;

use super::HeaderTable;
use crate::db::{CldbDatabase, Gene};

#[derive(Args, Debug)]
pub struct LoadGenesArgs {
    #[arg(short, long)]
    pub database: PathBuf,
    /// Tab-delimited genes file with a header line
    #[arg(short, long)]
    pub input: PathBuf,
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

/// Gene ids are expected in FIG peg form (`fig|<taxon>.peg.<n>`); anything
/// else loads fine but draws a warning.
fn is_peg_id(gene_id: &str) -> bool {
    gene_id.starts_with("fig|") && gene_id.contains(".peg.")
}

pub fn run(args: LoadGenesArgs) -> Result<()> {
    let table = HeaderTable::read(&args.input)?;
    for required in ["locus_id", "gene_id"] {
        if !table.columns.contains_key(required) {
            bail!("{} has no {} column", args.input.display(), required);
        }
    }

    let mut genes = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let (Some(locus_id), Some(gene_id)) =
            (table.get(row, "locus_id"), table.get(row, "gene_id"))
        else {
            bail!("Row with empty locus_id/gene_id in {}", args.input.display());
        };
        if !is_peg_id(gene_id) {
            eprintln!("[WARN] Gene {} lacks a fig|peg identifier", gene_id);
        }
        genes.push(Gene {
            locus_id: locus_id.to_string(),
            gene_id: gene_id.to_string(),
            gene_start: table.get_int(row, "gene_start")?,
            gene_end: table.get_int(row, "gene_end")?,
            gene_length_aa: table.get_int(row, "gene_length_aa")?,
            gene_alias: table.get(row, "gene_alias").map(str::to_string),
            in_operon: table.get(row, "in_operon").map(str::to_string),
        });
    }

    let mut db = CldbDatabase::open(&args.database)?;
    let known: Vec<String> = db.locus_ids()?;
    for gene in &genes {
        if !known.contains(&gene.locus_id) {
            eprintln!(
                "[WARN] Gene {}: locus {} not in the loci table",
                gene.gene_id, gene.locus_id
            );
        }
    }

    let n = db.insert_genes(&genes)?;
    if args.verbose {
        eprintln!("[INFO] Loaded {} genes into {}", n, args.database.display());
    }
    Ok(())
}
