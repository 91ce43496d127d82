//! `make-db`: create an empty annotation database.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::db::{schema, CldbDatabase};

#[derive(Args, Debug)]
pub struct MakeDbArgs {
    /// Path of the database file to create
    #[arg(short, long)]
    pub database: PathBuf,
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

pub fn run(args: MakeDbArgs) -> Result<()> {
    CldbDatabase::create(&args.database)?;
    if args.verbose {
        eprintln!(
            "[INFO] Created {} with {} tables",
            args.database.display(),
            schema::TABLES.len()
        );
    }
    Ok(())
}
