//! SQLite annotation store.
//!
//! [`CldbDatabase`] wraps a [`rusqlite::Connection`] and exposes the typed
//! loaders and queries the CLI commands are built on. Bulk loads run inside a
//! transaction; queries hand back plain row structs.

pub mod schema;

use anyhow::{bail, Context, Result};
use rusqlite::{params, params_from_iter, Connection, OpenFlags};
use std::path::Path;

use crate::key::ElementType;

/// A row of the `loci` table.
#[derive(Debug, Clone, Default)]
pub struct Locus {
    pub locus_id: String,
    pub taxon_id: Option<String>,
    pub taxon_name: Option<String>,
    pub subtype: Option<String>,
    pub scaffold: Option<String>,
    pub locus_start: Option<i64>,
    pub locus_end: Option<i64>,
    pub array_start: Option<i64>,
    pub array_end: Option<i64>,
    pub cas_status: Option<String>,
    pub array_status: Option<String>,
    pub array_file: Option<String>,
    pub author: Option<String>,
}

/// A spacer or direct repeat row (`spacers`/`drs` share this shape).
#[derive(Debug, Clone)]
pub struct ArrayElement {
    pub locus_id: String,
    pub element_id: u32,
    pub start: i64,
    pub end: i64,
    pub sequence: String,
}

/// A row of the `genes` table.
#[derive(Debug, Clone, Default)]
pub struct Gene {
    pub locus_id: String,
    pub gene_id: String,
    pub gene_start: Option<i64>,
    pub gene_end: Option<i64>,
    pub gene_length_aa: Option<i64>,
    pub gene_alias: Option<String>,
    pub in_operon: Option<String>,
}

/// A row of the `blast_hits` table.
#[derive(Debug, Clone, Default)]
pub struct BlastHitRecord {
    pub query_id: String,
    pub subject_id: String,
    pub subject_db: String,
    pub pident: Option<f64>,
    pub aln_length: Option<i64>,
    pub mismatch: Option<i64>,
    pub gapopen: Option<i64>,
    pub qstart: i64,
    pub qend: i64,
    pub sstart: i64,
    pub send: i64,
    pub evalue: Option<f64>,
    pub bitscore: Option<f64>,
    pub qlen: Option<i64>,
    pub slen: Option<i64>,
    pub btop: Option<String>,
}

/// Row filters shared by the element queries: all optional, combined with AND.
#[derive(Debug, Clone, Default)]
pub struct ElementFilter {
    pub subtype: Option<String>,
    pub taxon_id: Option<String>,
    pub taxon_name: Option<String>,
    pub locus_id: Option<String>,
}

impl ElementFilter {
    fn where_clause(&self) -> (String, Vec<String>) {
        let mut conds = Vec::new();
        let mut values = Vec::new();
        if let Some(ref v) = self.subtype {
            conds.push("l.subtype = ?");
            values.push(v.clone());
        }
        if let Some(ref v) = self.taxon_id {
            conds.push("l.taxon_id = ?");
            values.push(v.clone());
        }
        if let Some(ref v) = self.taxon_name {
            conds.push("l.taxon_name = ?");
            values.push(v.clone());
        }
        if let Some(ref v) = self.locus_id {
            conds.push("l.locus_id = ?");
            values.push(v.clone());
        }
        if conds.is_empty() {
            (String::new(), values)
        } else {
            (format!(" WHERE {}", conds.join(" AND ")), values)
        }
    }
}

/// Connection to an annotation database.
pub struct CldbDatabase {
    connection: Connection,
}

impl CldbDatabase {
    /// Database format version, stored in the `meta` table.
    pub const VERSION: &'static str = "1";

    const KEY_VERSION: &'static str = "version";

    /// Returns `true` if `path` is an existing database file.
    pub fn exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    /// Create a new database with the full schema. Refuses to clobber an
    /// existing file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if Self::exists(path) {
            bail!("Database {} already exists", path.display());
        }
        let connection = Connection::open(path)
            .with_context(|| format!("Cannot create database {}", path.display()))?;
        for (name, ddl) in schema::TABLES {
            connection
                .execute(ddl, ())
                .with_context(|| format!("Cannot create table {}", name))?;
        }
        connection.execute(
            "INSERT INTO meta(key, value) VALUES (?1, ?2)",
            params![Self::KEY_VERSION, Self::VERSION],
        )?;
        Ok(Self { connection })
    }

    /// Open an existing database read-write and check its version.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !Self::exists(path) {
            bail!("Database {} does not exist (run make-db first)", path.display());
        }
        let connection = Connection::open(path)
            .with_context(|| format!("Cannot open database {}", path.display()))?;
        let db = Self { connection };
        db.check_version()?;
        Ok(db)
    }

    /// Open an existing database read-only.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let connection = Connection::open_with_flags(path, flags)
            .with_context(|| format!("Cannot open database {}", path.display()))?;
        let db = Self { connection };
        db.check_version()?;
        Ok(db)
    }

    fn check_version(&self) -> Result<()> {
        let version: String = self
            .connection
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                params![Self::KEY_VERSION],
                |row| row.get(0),
            )
            .context("Not a cldb database (missing meta table)")?;
        if version != Self::VERSION {
            bail!(
                "Unsupported database version: {} (expected {})",
                version,
                Self::VERSION
            );
        }
        Ok(())
    }

    /// Number of rows in `table`. The name must come from this crate, not
    /// user input.
    pub fn count(&self, table: &str) -> Result<usize> {
        let n: i64 = self
            .connection
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), (), |row| {
                row.get(0)
            })?;
        Ok(n as usize)
    }

    // ------------------------------------------------------------------
    // Loaders
    // ------------------------------------------------------------------

    /// Insert or replace loci rows; returns the number inserted.
    pub fn insert_loci(&mut self, rows: &[Locus]) -> Result<usize> {
        let transaction = self.connection.transaction()?;
        {
            let mut insert = transaction.prepare(
                "INSERT OR REPLACE INTO loci(
                    locus_id, taxon_id, taxon_name, subtype, scaffold,
                    locus_start, locus_end, array_start, array_end,
                    cas_status, array_status, array_file, author
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            )?;
            for locus in rows {
                insert.execute(params![
                    locus.locus_id,
                    locus.taxon_id,
                    locus.taxon_name,
                    locus.subtype,
                    locus.scaffold,
                    locus.locus_start,
                    locus.locus_end,
                    locus.array_start,
                    locus.array_end,
                    locus.cas_status,
                    locus.array_status,
                    locus.array_file,
                    locus.author,
                ])?;
            }
        }
        transaction.commit()?;
        Ok(rows.len())
    }

    /// Insert or replace spacer/DR rows into the table for `element`.
    pub fn insert_elements(&mut self, element: ElementType, rows: &[ArrayElement]) -> Result<usize> {
        let sql = match element {
            ElementType::Spacer => {
                "INSERT OR REPLACE INTO spacers(
                    locus_id, spacer_id, spacer_start, spacer_end, spacer_sequence
                ) VALUES (?1, ?2, ?3, ?4, ?5)"
            }
            ElementType::DirectRepeat => {
                "INSERT OR REPLACE INTO drs(
                    locus_id, dr_id, dr_start, dr_end, dr_sequence
                ) VALUES (?1, ?2, ?3, ?4, ?5)"
            }
        };
        let transaction = self.connection.transaction()?;
        {
            let mut insert = transaction.prepare(sql)?;
            for row in rows {
                insert.execute(params![
                    row.locus_id,
                    row.element_id,
                    row.start,
                    row.end,
                    row.sequence,
                ])?;
            }
        }
        transaction.commit()?;
        Ok(rows.len())
    }

    pub fn insert_genes(&mut self, rows: &[Gene]) -> Result<usize> {
        let transaction = self.connection.transaction()?;
        {
            let mut insert = transaction.prepare(
                "INSERT OR REPLACE INTO genes(
                    locus_id, gene_id, gene_start, gene_end,
                    gene_length_aa, gene_alias, in_operon
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for gene in rows {
                insert.execute(params![
                    gene.locus_id,
                    gene.gene_id,
                    gene.gene_start,
                    gene.gene_end,
                    gene.gene_length_aa,
                    gene.gene_alias,
                    gene.in_operon,
                ])?;
            }
        }
        transaction.commit()?;
        Ok(rows.len())
    }

    pub fn insert_blast_hits(&mut self, rows: &[BlastHitRecord]) -> Result<usize> {
        let transaction = self.connection.transaction()?;
        {
            let mut insert = transaction.prepare(
                "INSERT INTO blast_hits(
                    query_id, subject_id, subject_db, pident, aln_length,
                    mismatch, gapopen, qstart, qend, sstart, send,
                    evalue, bitscore, qlen, slen, btop
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            )?;
            for hit in rows {
                insert.execute(params![
                    hit.query_id,
                    hit.subject_id,
                    hit.subject_db,
                    hit.pident,
                    hit.aln_length,
                    hit.mismatch,
                    hit.gapopen,
                    hit.qstart,
                    hit.qend,
                    hit.sstart,
                    hit.send,
                    hit.evalue,
                    hit.bitscore,
                    hit.qlen,
                    hit.slen,
                    hit.btop,
                ])?;
            }
        }
        transaction.commit()?;
        Ok(rows.len())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Select spacers or DRs joined against the loci filters.
    pub fn select_elements(
        &self,
        element: ElementType,
        filter: &ElementFilter,
    ) -> Result<Vec<ArrayElement>> {
        let (table, id_col, start_col, end_col, seq_col) = match element {
            ElementType::Spacer => ("spacers", "spacer_id", "spacer_start", "spacer_end", "spacer_sequence"),
            ElementType::DirectRepeat => ("drs", "dr_id", "dr_start", "dr_end", "dr_sequence"),
        };
        let (where_sql, values) = filter.where_clause();
        let sql = format!(
            "SELECT e.locus_id, e.{id}, e.{start}, e.{end}, e.{seq}
             FROM {table} e JOIN loci l ON l.locus_id = e.locus_id{where_sql}
             ORDER BY e.locus_id, e.{id}",
            id = id_col,
            start = start_col,
            end = end_col,
            seq = seq_col,
            table = table,
            where_sql = where_sql,
        );
        let mut statement = self.connection.prepare(&sql)?;
        let rows = statement.query_map(params_from_iter(values.iter()), |row| {
            Ok(ArrayElement {
                locus_id: row.get(0)?,
                element_id: row.get(1)?,
                start: row.get(2)?,
                end: row.get(3)?,
                sequence: row.get(4)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Sequence of a single spacer, if present.
    pub fn spacer_sequence(&self, locus_id: &str, spacer_id: u32) -> Result<Option<String>> {
        let mut statement = self.connection.prepare(
            "SELECT spacer_sequence FROM spacers WHERE locus_id = ?1 AND spacer_id = ?2",
        )?;
        let mut rows = statement.query(params![locus_id, spacer_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Locus ids with their array file paths, for the array loader.
    pub fn loci_array_files(&self) -> Result<Vec<(String, Option<String>)>> {
        let mut statement = self
            .connection
            .prepare("SELECT locus_id, array_file FROM loci ORDER BY locus_id")?;
        let rows = statement.query_map((), |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// All known locus ids.
    pub fn locus_ids(&self) -> Result<Vec<String>> {
        let mut statement = self
            .connection
            .prepare("SELECT locus_id FROM loci ORDER BY locus_id")?;
        let rows = statement.query_map((), |row| row.get(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
