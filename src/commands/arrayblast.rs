//! `array-blast`: search spacers against genome BLAST databases.
//!
//! Spacers are pulled from the annotation database, written to a temporary
//! FASTA keyed by element key, and searched against each subject database
//! with `blastn -task blastn-short`. Searches fan out across a rayon pool,
//! one job per genome, each accumulating under its own database key; results
//! fan back in as one combined hit table and, with `--load`, into the
//! `blast_hits` table.

use anyhow::{bail, Context, Result};
use bio::io::fasta;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::NamedTempFile;

use super::open_output;
use crate::blast::tabular::{BlastTable, SPACER_SEARCH_FIELDS};
use crate::db::{BlastHitRecord, CldbDatabase, ElementFilter};
use crate::exec;
use crate::key::{ElementKey, ElementType};

#[derive(Args, Debug)]
pub struct ArrayBlastArgs {
    #[arg(short, long)]
    pub database: PathBuf,
    /// BLAST database prefixes to search, one per genome
    #[arg(short = 'b', long = "blast-db", required = true, num_args = 1..)]
    pub blast_dbs: Vec<PathBuf>,
    #[arg(long, default_value_t = 1.0)]
    pub evalue: f64,
    #[arg(short = 'n', long, default_value_t = 0)]
    pub num_threads: usize,
    /// Restrict spacers to one CRISPR subtype
    #[arg(long)]
    pub subtype: Option<String>,
    /// Restrict spacers to one taxon id
    #[arg(long)]
    pub taxon_id: Option<String>,
    /// Restrict spacers to one locus
    #[arg(long)]
    pub locus_id: Option<String>,
    /// Combined hit table (stdout if omitted)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    /// Also load the hits into the blast_hits table
    #[arg(long, default_value_t = false)]
    pub load: bool,
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

pub fn run(args: ArrayBlastArgs) -> Result<()> {
    let num_threads = if args.num_threads == 0 {
        num_cpus::get()
    } else {
        args.num_threads
    };
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .context("Failed to build thread pool")?;

    let mut db = CldbDatabase::open(&args.database)?;
    let filter = ElementFilter {
        subtype: args.subtype.clone(),
        taxon_id: args.taxon_id.clone(),
        taxon_name: None,
        locus_id: args.locus_id.clone(),
    };
    let spacers = db.select_elements(ElementType::Spacer, &filter)?;
    if spacers.is_empty() {
        bail!("No spacers matched the filters; load arrays first");
    }
    if args.verbose {
        eprintln!(
            "[INFO] Searching {} spacers against {} databases",
            spacers.len(),
            args.blast_dbs.len()
        );
    }

    // Query FASTA shared by every search job.
    let query_file = NamedTempFile::new().context("Cannot create temporary query FASTA")?;
    {
        let mut writer = fasta::Writer::new(query_file.as_file());
        for spacer in &spacers {
            let key = ElementKey::new(spacer.locus_id.clone(), ElementType::Spacer, spacer.element_id);
            writer.write(&key.to_string(), None, spacer.sequence.as_bytes())?;
        }
        writer.flush()?;
    }

    let bar = ProgressBar::new(args.blast_dbs.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap(),
    );

    // Fan out one blastn per genome; each job writes its own key.
    let results: Mutex<FxHashMap<String, BlastTable>> = Mutex::new(FxHashMap::default());
    args.blast_dbs
        .par_iter()
        .map(|blast_db| -> Result<()> {
            let name = blast_db.to_string_lossy().to_string();
            let cmd = exec::blastn_spacers(
                query_file.path(),
                blast_db,
                args.evalue,
                SPACER_SEARCH_FIELDS,
            );
            if args.verbose {
                eprintln!("[INFO] {}", cmd.display());
            }
            let stdout = cmd.run().with_context(|| format!("blastn against {}", name))?;
            let table = BlastTable::from_reader(Cursor::new(stdout), None)
                .with_context(|| format!("Parsing blastn output for {}", name))?;
            results
                .lock()
                .expect("result map poisoned")
                .insert(name, table);
            bar.inc(1);
            Ok(())
        })
        .collect::<Result<Vec<_>>>()?;
    bar.finish_and_clear();

    let results = results.into_inner().expect("result map poisoned");
    let combined = combine_tables(results)?;
    if args.verbose {
        eprintln!("[INFO] {} hits total", combined.rows.len());
    }

    if args.load {
        let records = to_hit_records(&combined)?;
        let n = db.insert_blast_hits(&records)?;
        if args.verbose {
            eprintln!("[INFO] Loaded {} hits into blast_hits", n);
        }
    }

    let mut writer = open_output(args.out.as_ref())?;
    combined.write(&mut writer, true)?;
    Ok(())
}

/// Fan the per-genome tables back into one, with a `subject_db` column
/// recording which database each hit came from. Databases merge in name
/// order so the output is stable across pool schedules.
fn combine_tables(results: FxHashMap<String, BlastTable>) -> Result<BlastTable> {
    let mut fields: Vec<String> = SPACER_SEARCH_FIELDS.iter().map(|s| s.to_string()).collect();
    fields.push("subject_db".to_string());
    let mut combined = BlastTable::new(fields);

    let mut names: Vec<&String> = results.keys().collect();
    names.sort();
    for name in names {
        let table = &results[name];
        if !table.rows.is_empty()
            && table.fields[..] != combined.fields[..combined.fields.len() - 1]
        {
            bail!(
                "blastn output for {} has unexpected columns: {}",
                name,
                table.fields.join(" ")
            );
        }
        for row in &table.rows {
            let mut row = row.clone();
            row.push(name.clone());
            combined.rows.push(row);
        }
    }
    Ok(combined)
}

fn to_hit_records(table: &BlastTable) -> Result<Vec<BlastHitRecord>> {
    fn float(raw: &str, name: &str) -> Result<f64> {
        raw.parse()
            .with_context(|| format!("Bad {} value '{}'", name, raw))
    }
    fn int(raw: &str, name: &str) -> Result<i64> {
        raw.parse()
            .with_context(|| format!("Bad {} value '{}'", name, raw))
    }

    let col = |name: &str| table.require_column(name);
    let (qseqid, sseqid, subject_db) = (col("qseqid")?, col("sseqid")?, col("subject_db")?);
    let (pident, length, mismatch, gapopen) = (
        col("pident")?,
        col("length")?,
        col("mismatch")?,
        col("gapopen")?,
    );
    let (qstart, qend, sstart, send) = (col("qstart")?, col("qend")?, col("sstart")?, col("send")?);
    let (evalue, bitscore, qlen, slen, btop) = (
        col("evalue")?,
        col("bitscore")?,
        col("qlen")?,
        col("slen")?,
        col("btop")?,
    );

    let mut records = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        records.push(BlastHitRecord {
            query_id: row[qseqid].clone(),
            subject_id: row[sseqid].clone(),
            subject_db: row[subject_db].clone(),
            pident: Some(float(&row[pident], "pident")?),
            aln_length: Some(int(&row[length], "length")?),
            mismatch: Some(int(&row[mismatch], "mismatch")?),
            gapopen: Some(int(&row[gapopen], "gapopen")?),
            qstart: int(&row[qstart], "qstart")?,
            qend: int(&row[qend], "qend")?,
            sstart: int(&row[sstart], "sstart")?,
            send: int(&row[send], "send")?,
            evalue: Some(float(&row[evalue], "evalue")?),
            bitscore: Some(float(&row[bitscore], "bitscore")?),
            qlen: Some(int(&row[qlen], "qlen")?),
            slen: Some(int(&row[slen], "slen")?),
            btop: Some(row[btop].clone()),
        });
    }
    Ok(records)
}
