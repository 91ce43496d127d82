//! `get-pams`: slice PAM windows out of a protospacer-annotated hit table.
//!
//! Consumes the table `add-proto` writes. The window spec is validated
//! before any data is read; extraction itself runs on the canonical
//! plus-strand sequence and the windows are re-oriented into whatever frame
//! the table was written in.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::open_output;
use crate::blast::tabular::BlastTable;
use crate::proto::{
    extract_windows, reconcile_sequence, reconcile_windows, PamSpec, ProtoRegion, ReportFrame,
    Span, Strand,
};

#[derive(Args, Debug)]
pub struct GetPamsArgs {
    /// Protospacer-annotated hit table (from add-proto)
    #[arg(short, long)]
    pub input: PathBuf,
    /// PAM windows as four offsets: 5' start, 5' end, 3' start, 3' end
    #[arg(long, default_value = "-3,-1,1,3")]
    pub pam: PamSpec,
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

pub fn run(args: GetPamsArgs) -> Result<()> {
    // The spec was validated at argument parse time, before any data I/O.
    let spec = args.pam;

    let table = BlastTable::read(&args.input, None)?;
    let qseqid = table.require_column("qseqid")?;
    let sseqid = table.require_column("sseqid")?;
    let proto_start = table.require_column("proto_start")?;
    let proto_end = table.require_column("proto_end")?;
    let ext_start = table.require_column("ext_start")?;
    let ext_end = table.require_column("ext_end")?;
    let proto_strand = table.require_column("proto_strand")?;
    let proto_frame = table.require_column("proto_frame")?;
    let proto_seq = table.require_column("proto_seq")?;

    let mut out = BlastTable::new(
        [
            "qseqid",
            "sseqid",
            "proto_start",
            "proto_end",
            "proto_strand",
            "pam_five",
            "pam_three",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    );

    let mut skipped = 0usize;
    for (i, row) in table.rows.iter().enumerate() {
        if row[proto_seq].is_empty() {
            eprintln!("[WARN] Hit {}: no protospacer sequence; skipping", i + 1);
            skipped += 1;
            continue;
        }
        let rowno = i + 1;
        let num = |idx: usize, name: &str| -> Result<usize> {
            row[idx]
                .parse()
                .with_context(|| format!("Row {}: bad {} value '{}'", rowno, name, row[idx]))
        };
        let region = ProtoRegion {
            outer: Span::new(num(ext_start, "ext_start")?, num(ext_end, "ext_end")?),
            inner: Span::new(num(proto_start, "proto_start")?, num(proto_end, "proto_end")?),
        };
        let strand: Strand = row[proto_strand]
            .parse()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Row {}", rowno))?;
        let frame: ReportFrame = row[proto_frame]
            .parse()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Row {}", rowno))?;

        // The stored sequence is in `frame`; flipping again recovers the
        // canonical plus-strand form extraction works on.
        let canonical = reconcile_sequence(&row[proto_seq], strand, frame);
        let windows = extract_windows(&canonical, &region, &spec)
            .with_context(|| format!("Row {}", rowno))?;
        let windows = reconcile_windows(windows, strand, frame);

        out.rows.push(vec![
            row[qseqid].clone(),
            row[sseqid].clone(),
            row[proto_start].clone(),
            row[proto_end].clone(),
            row[proto_strand].clone(),
            windows.five,
            windows.three,
        ]);
    }

    let mut writer = open_output(args.out.as_ref())?;
    out.write(&mut writer, true)?;
    if args.verbose {
        eprintln!("[INFO] Extracted PAMs for {} hits ({} skipped)", out.rows.len(), skipped);
    }
    Ok(())
}
