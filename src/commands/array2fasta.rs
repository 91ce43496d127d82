//! `array2fasta`: export spacers or direct repeats as FASTA.
//!
//! Records are keyed by the composite element key
//! (`locus_id|spacer|id`), the form the BLAST pipeline carries through
//! query ids.

use anyhow::Result;
use bio::io::fasta;
use clap::Args;
use std::path::PathBuf;

use super::open_output;
use crate::db::{CldbDatabase, ElementFilter};
use crate::key::{ElementKey, ElementType};

#[derive(Args, Debug)]
pub struct Array2FastaArgs {
    #[arg(short, long)]
    pub database: PathBuf,
    /// Element type to export: spacer or DR
    #[arg(short, long, default_value = "spacer")]
    pub element: ElementType,
    /// Restrict to one CRISPR subtype
    #[arg(long)]
    pub subtype: Option<String>,
    /// Restrict to one taxon id
    #[arg(long)]
    pub taxon_id: Option<String>,
    /// Restrict to one taxon name
    #[arg(long)]
    pub taxon_name: Option<String>,
    /// Restrict to one locus
    #[arg(long)]
    pub locus_id: Option<String>,
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

impl Array2FastaArgs {
    fn filter(&self) -> ElementFilter {
        ElementFilter {
            subtype: self.subtype.clone(),
            taxon_id: self.taxon_id.clone(),
            taxon_name: self.taxon_name.clone(),
            locus_id: self.locus_id.clone(),
        }
    }
}

pub fn run(args: Array2FastaArgs) -> Result<()> {
    let db = CldbDatabase::open_read_only(&args.database)?;
    let elements = db.select_elements(args.element, &args.filter())?;
    if elements.is_empty() {
        eprintln!("[WARN] No elements matched the filters");
    }

    let writer = open_output(args.out.as_ref())?;
    let mut fasta_writer = fasta::Writer::new(writer);
    for element in &elements {
        let key = ElementKey::new(element.locus_id.clone(), args.element, element.element_id);
        fasta_writer.write(
            &key.to_string(),
            Some(&format!("{}..{}", element.start, element.end)),
            element.sequence.as_bytes(),
        )?;
    }
    fasta_writer.flush()?;

    if args.verbose {
        eprintln!(
            "[INFO] Wrote {} {} records",
            elements.len(),
            args.element.as_str()
        );
    }
    Ok(())
}
