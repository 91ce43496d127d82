use anyhow::Result;
use clap::{Parser, Subcommand};
use cldb::commands::{
    addproto, align, array2fasta, arrayblast, getpams, loadarrays, loadgenes, loadloci, makedb,
};

#[derive(Parser)]
#[command(name = "cldb")]
#[command(version = "0.1.0")]
#[command(about = "CRISPR locus database and spacer/protospacer analysis toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty annotation database
    MakeDb(makedb::MakeDbArgs),

    /// Load the loci table from a tab-delimited file
    LoadLoci(loadloci::LoadLociArgs),

    /// Load spacers and direct repeats from per-locus array files
    LoadArrays(loadarrays::LoadArraysArgs),

    /// Load the genes table from a tab-delimited file
    LoadGenes(loadgenes::LoadGenesArgs),

    /// Export spacers or direct repeats as FASTA
    #[command(name = "array2fasta")]
    Array2Fasta(array2fasta::Array2FastaArgs),

    /// BLAST spacers against one or more genome databases
    ArrayBlast(arrayblast::ArrayBlastArgs),

    /// Annotate a BLAST hit table with full-length protospacer coordinates and sequence
    AddProto(addproto::AddProtoArgs),

    /// Extract PAM windows from a protospacer-annotated hit table
    GetPams(getpams::GetPamsArgs),

    /// Reconstruct spacer/protospacer alignments from BTOP strings
    Align(align::AlignArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::MakeDb(args) => makedb::run(args)?,
        Commands::LoadLoci(args) => loadloci::run(args)?,
        Commands::LoadArrays(args) => loadarrays::run(args)?,
        Commands::LoadGenes(args) => loadgenes::run(args)?,
        Commands::Array2Fasta(args) => array2fasta::run(args)?,
        Commands::ArrayBlast(args) => arrayblast::run(args)?,
        Commands::AddProto(args) => addproto::run(args)?,
        Commands::GetPams(args) => getpams::run(args)?,
        Commands::Align(args) => align::run(args)?,
    }
    Ok(())
}
