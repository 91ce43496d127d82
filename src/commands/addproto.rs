//! `add-proto`: annotate a BLAST hit table with protospacer regions.
//!
//! For each hit the subject coordinates are normalized to the plus strand,
//! extended to the full spacer length, extended again by a fixed margin, and
//! the region is pulled from the genome (a FASTA file or a BLAST database via
//! blastdbcmd). The protospacer is upper-cased inside the lower-cased
//! extension, re-oriented per the report frame, and written back as extra
//! columns on the input table.

use anyhow::{bail, Context, Result};
use bio::io::fasta;
use clap::Args;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

use crate::blast::tabular::{BlastTable, HitCols};
use crate::exec;
use crate::proto::{
    extend_full_length, extend_margin, normalize, pam::render_region, reconcile_sequence,
    ProtoRegion, ReportFrame, Span,
};

/// Columns appended to the hit table, in order.
pub const PROTO_COLUMNS: &[&str] = &[
    "proto_start",
    "proto_end",
    "ext_start",
    "ext_end",
    "proto_strand",
    "proto_frame",
    "proto_seq",
];

#[derive(Args, Debug)]
pub struct AddProtoArgs {
    /// BLAST hit table (outfmt 6/7) to annotate
    #[arg(short, long)]
    pub input: PathBuf,
    /// Column layout for plain outfmt 6 input, e.g. "qseqid sseqid ... btop"
    #[arg(long)]
    pub fields: Option<String>,
    /// Genome FASTA holding the subject sequences
    #[arg(short, long)]
    pub subject: Option<PathBuf>,
    /// BLAST database to fetch subject regions from instead
    #[arg(long)]
    pub blast_db: Option<PathBuf>,
    /// Margin added on each side of the full-length protospacer
    #[arg(short = 'x', long, default_value_t = 10)]
    pub extend: usize,
    /// Report minus-strand protospacers in the query's BLAST orientation
    /// instead of the subject plus strand
    #[arg(long, default_value_t = false)]
    pub revcomp: bool,
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

/// Where extended subject regions come from.
enum SubjectSource {
    Fasta(FxHashMap<String, String>),
    BlastDb(PathBuf),
}

impl SubjectSource {
    fn fetch(&self, subject_id: &str, span: Span) -> Result<Option<String>> {
        match self {
            SubjectSource::Fasta(seqs) => match seqs.get(subject_id) {
                None => Ok(None),
                Some(seq) => {
                    if span.end > seq.len() {
                        bail!(
                            "Subject {} is {} bp but the hit extends to {}",
                            subject_id,
                            seq.len(),
                            span.end
                        );
                    }
                    Ok(Some(seq[span.start - 1..span.end].to_string()))
                }
            },
            SubjectSource::BlastDb(db) => {
                let stdout =
                    exec::blastdbcmd_range(db, subject_id, span.start, span.end).run()?;
                Ok(Some(exec::parse_blastdbcmd_seq(&stdout)?))
            }
        }
    }
}

fn read_subject_fasta(path: &Path) -> Result<FxHashMap<String, String>> {
    let reader = fasta::Reader::from_file(path)
        .with_context(|| format!("Cannot open subject FASTA {}", path.display()))?;
    let mut seqs = FxHashMap::default();
    for record in reader.records() {
        let record = record?;
        let seq = String::from_utf8(record.seq().to_vec())
            .with_context(|| format!("Subject {} is not valid UTF-8", record.id()))?;
        seqs.insert(record.id().to_string(), seq);
    }
    Ok(seqs)
}

pub fn run(args: AddProtoArgs) -> Result<()> {
    let source = match (&args.subject, &args.blast_db) {
        (Some(path), None) => SubjectSource::Fasta(read_subject_fasta(path)?),
        (None, Some(db)) => SubjectSource::BlastDb(db.clone()),
        _ => bail!("Give exactly one of --subject or --blast-db"),
    };
    let frame = if args.revcomp {
        ReportFrame::QueryAligned
    } else {
        ReportFrame::SubjectPlus
    };

    let mut table = BlastTable::read(&args.input, args.fields.as_deref())?;
    let cols = HitCols::resolve(&table)?;

    let mut annotations: Vec<[String; 7]> = Vec::with_capacity(table.rows.len());
    let mut skipped = 0usize;
    for (i, row) in table.rows.iter().enumerate() {
        let hit = cols.parse(row, i + 1)?;

        let (lo, hi, strand) = normalize(hit.s_start, hit.s_end);
        let full = extend_full_length(
            Span::new(lo, hi),
            strand,
            Span::new(hit.q_start, hit.q_end),
            hit.query_len,
            hit.subject_len,
        );
        let region = extend_margin(full.subject, args.extend, hit.subject_len);

        let raw = match source.fetch(&hit.subject_id, region.outer) {
            Ok(Some(seq)) => seq,
            Ok(None) => {
                eprintln!(
                    "[WARN] Subject {} not found; hit {} left unannotated",
                    hit.subject_id,
                    i + 1
                );
                skipped += 1;
                annotations.push(Default::default());
                continue;
            }
            Err(e) => {
                eprintln!(
                    "[WARN] Cannot fetch {}:{}-{} ({}); hit {} left unannotated",
                    hit.subject_id,
                    region.outer.start,
                    region.outer.end,
                    e,
                    i + 1
                );
                skipped += 1;
                annotations.push(Default::default());
                continue;
            }
        };

        let rendered = render_region(&raw, &region)?;
        let reported = reconcile_sequence(&rendered, strand, frame);
        if args.verbose && !full.is_complete() {
            eprintln!(
                "[INFO] Hit {}: full-length extension truncated by {}/{} bp at the scaffold edge",
                i + 1,
                full.short_5,
                full.short_3
            );
        }

        annotations.push(annotation_columns(&region, strand.symbol(), frame, reported));
    }

    for (c, name) in PROTO_COLUMNS.iter().enumerate() {
        let values = annotations.iter().map(|a| a[c].clone()).collect();
        table.push_column(name, values)?;
    }
    table.write_to(args.out.as_ref(), true)?;

    if args.verbose {
        eprintln!(
            "[INFO] Annotated {} hits ({} skipped)",
            table.rows.len() - skipped,
            skipped
        );
    }
    Ok(())
}

fn annotation_columns(
    region: &ProtoRegion,
    strand: char,
    frame: ReportFrame,
    seq: String,
) -> [String; 7] {
    [
        region.inner.start.to_string(),
        region.inner.end.to_string(),
        region.outer.start.to_string(),
        region.outer.end.to_string(),
        strand.to_string(),
        frame.as_str().to_string(),
        seq,
    ]
}
