//! BLAST+ tabular output interface
//!
//! Reader/writer for `-outfmt 6`/`7` hit tables with explicit field lists,
//! and a parser for BTOP alignment traces.

pub mod btop;
pub mod tabular;

pub use tabular::{BlastHit, BlastTable, HitCols};
