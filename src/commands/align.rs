//! `align`: reconstruct spacer/protospacer alignments from BTOP traces.
//!
//! Spacer sequences come from the annotation database; the gapped alignment
//! is rebuilt from each hit's BTOP string, so no sequence fetch from the
//! subject genome is needed.

use anyhow::Result;
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

use super::open_output;
use crate::blast::btop;
use crate::blast::tabular::{BlastTable, HitCols};
use crate::db::CldbDatabase;
use crate::key::{ElementKey, ElementType};

#[derive(Args, Debug)]
pub struct AlignArgs {
    /// BLAST hit table (outfmt 6/7) with a btop column
    #[arg(short, long)]
    pub input: PathBuf,
    /// Column layout for plain outfmt 6 input
    #[arg(long)]
    pub fields: Option<String>,
    /// Annotation database holding the spacer sequences
    #[arg(short, long)]
    pub database: PathBuf,
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

pub fn run(args: AlignArgs) -> Result<()> {
    let table = BlastTable::read(&args.input, args.fields.as_deref())?;
    let cols = HitCols::resolve(&table)?;
    let btop_col = table.require_column("btop")?;

    let db = CldbDatabase::open_read_only(&args.database)?;
    let mut writer = open_output(args.out.as_ref())?;

    let mut written = 0usize;
    for (i, row) in table.rows.iter().enumerate() {
        let hit = cols.parse(row, i + 1)?;

        let key: ElementKey = match hit.query_id.parse() {
            Ok(key) => key,
            Err(e) => {
                eprintln!("[WARN] Hit {}: {}; skipping", i + 1, e);
                continue;
            }
        };
        if key.element != ElementType::Spacer {
            eprintln!(
                "[WARN] Hit {}: query {} is not a spacer; skipping",
                i + 1,
                hit.query_id
            );
            continue;
        }
        let Some(spacer) = db.spacer_sequence(&key.locus_id, key.element_id)? else {
            eprintln!(
                "[WARN] Spacer {} not found in {}; skipping",
                hit.query_id,
                args.database.display()
            );
            continue;
        };
        if hit.q_end > spacer.len() || hit.q_start > hit.q_end {
            eprintln!(
                "[WARN] Hit {}: query span {}..{} outside spacer of {} bp; skipping",
                i + 1,
                hit.q_start,
                hit.q_end,
                spacer.len()
            );
            continue;
        }

        let ops = btop::parse(&row[btop_col])?;
        let stats = btop::stats(&ops);
        let segment = &spacer[hit.q_start - 1..hit.q_end];
        let (q_aln, s_aln) = btop::reconstruct(segment, &ops)?;

        writeln!(
            writer,
            ">{} {} {}..{} (mismatches={}, gaps={})",
            hit.query_id,
            hit.subject_id,
            hit.s_start,
            hit.s_end,
            stats.mismatches,
            stats.query_gaps + stats.subject_gaps
        )?;
        writeln!(writer, "{}", q_aln)?;
        writeln!(writer, "{}", s_aln)?;
        writeln!(writer)?;
        written += 1;
    }

    if args.verbose {
        eprintln!("[INFO] Wrote {} alignments", written);
    }
    Ok(())
}
