//! BLAST `-outfmt 6`/`7` tabular tables.
//!
//! Tables are kept as raw string columns plus an ordered field-name list, so
//! a hit table can be annotated with extra columns and written back without
//! disturbing fields this tool does not interpret. Column names follow the
//! short `-outfmt` specifiers (`qseqid`, `sstart`, `btop`, ...); the long
//! names NCBI prints in `# Fields:` comment lines are normalized on read.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default column set of plain `-outfmt 6` output.
pub const OUTFMT6_DEFAULT_FIELDS: &[&str] = &[
    "qseqid", "sseqid", "pident", "length", "mismatch", "gapopen", "qstart", "qend", "sstart",
    "send", "evalue", "bitscore",
];

/// Field list the spacer-search pipeline requests from blastn: the default
/// columns plus the lengths and trace the coordinate unit consumes.
pub const SPACER_SEARCH_FIELDS: &[&str] = &[
    "qseqid", "sseqid", "pident", "length", "mismatch", "gapopen", "qstart", "qend", "sstart",
    "send", "evalue", "bitscore", "qlen", "slen", "btop",
];

/// Map a field name as printed by NCBI (`# Fields:` comments) or given on the
/// command line to its short `-outfmt` specifier.
pub fn normalize_field_name(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.to_lowercase().as_str() {
        "query id" | "query acc." | "query acc.ver" | "qaccver" | "qacc" | "qseqid" => "qseqid",
        "subject id" | "subject acc." | "subject acc.ver" | "saccver" | "sacc" | "sseqid" => {
            "sseqid"
        }
        "% identity" | "pident" => "pident",
        "alignment length" | "length" => "length",
        "mismatches" | "mismatch" => "mismatch",
        "gap opens" | "gapopen" => "gapopen",
        "q. start" | "qstart" => "qstart",
        "q. end" | "qend" => "qend",
        "s. start" | "sstart" => "sstart",
        "s. end" | "send" => "send",
        "evalue" | "expect value" => "evalue",
        "bit score" | "bitscore" => "bitscore",
        "query length" | "qlen" => "qlen",
        "subject length" | "slen" => "slen",
        "btop" => "btop",
        other => return other.replace(' ', "_"),
    }
    .to_string()
}

/// A hit table: ordered field names plus raw rows.
#[derive(Debug, Clone)]
pub struct BlastTable {
    pub fields: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl BlastTable {
    pub fn new(fields: Vec<String>) -> Self {
        Self {
            fields,
            rows: Vec::new(),
        }
    }

    /// Read a table from a file. `fields` overrides the column layout for
    /// plain outfmt 6 input; `# Fields:` comment lines (outfmt 7) take
    /// precedence when present. With neither, the default outfmt 6 columns
    /// are assumed.
    pub fn read(path: &Path, fields: Option<&str>) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Cannot open BLAST table {}", path.display()))?;
        Self::from_reader(BufReader::new(file), fields)
            .with_context(|| format!("Malformed BLAST table {}", path.display()))
    }

    pub fn from_reader<R: BufRead>(reader: R, fields: Option<&str>) -> Result<Self> {
        let mut declared: Option<Vec<String>> =
            fields.map(|spec| spec.split_whitespace().map(normalize_field_name).collect());
        let mut table: Option<BlastTable> = None;

        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            if let Some(comment) = line.strip_prefix('#') {
                let comment = comment.trim();
                if let Some(list) = comment.strip_prefix("Fields:") {
                    let names: Vec<String> = list.split(',').map(normalize_field_name).collect();
                    // Per-query header blocks repeat the field list; the
                    // column layout must not change mid-table.
                    if let Some(ref t) = table {
                        if t.fields != names {
                            bail!("Field list changes at line {}", lineno + 1);
                        }
                    }
                    declared = Some(names);
                }
                continue;
            }

            let cols: Vec<String> = line.split('\t').map(str::to_string).collect();
            let t = table.get_or_insert_with(|| {
                let fields = declared.clone().unwrap_or_else(|| {
                    OUTFMT6_DEFAULT_FIELDS
                        .iter()
                        .map(|s| s.to_string())
                        .collect()
                });
                BlastTable::new(fields)
            });
            if cols.len() != t.fields.len() {
                bail!(
                    "Line {}: expected {} columns, found {}",
                    lineno + 1,
                    t.fields.len(),
                    cols.len()
                );
            }
            t.rows.push(cols);
        }

        Ok(table.unwrap_or_else(|| {
            let fields = declared.unwrap_or_else(|| {
                OUTFMT6_DEFAULT_FIELDS
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            });
            BlastTable::new(fields)
        }))
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    /// Resolve a column the caller cannot proceed without.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column(name).with_context(|| {
            format!(
                "BLAST table is missing required column '{}' (columns present: {})",
                name,
                self.fields.join(" ")
            )
        })
    }

    /// Append a column; `values` must cover every row.
    pub fn push_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        if values.len() != self.rows.len() {
            bail!(
                "Column '{}' has {} values for {} rows",
                name,
                values.len(),
                self.rows.len()
            );
        }
        self.fields.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Write the table; with `comments` a `# Fields:` header line is emitted
    /// first (outfmt 7 style).
    pub fn write<W: Write>(&self, writer: &mut W, comments: bool) -> io::Result<()> {
        if comments {
            writeln!(writer, "# Fields: {}", self.fields.join(", "))?;
            writeln!(writer, "# {} hits found", self.rows.len())?;
        }
        for row in &self.rows {
            writeln!(writer, "{}", row.join("\t"))?;
        }
        Ok(())
    }

    pub fn write_to(&self, out_path: Option<&PathBuf>, comments: bool) -> Result<()> {
        let stdout = io::stdout();
        let mut writer: Box<dyn Write> = if let Some(path) = out_path {
            Box::new(BufWriter::new(File::create(path).with_context(|| {
                format!("Cannot create output file {}", path.display())
            })?))
        } else {
            Box::new(BufWriter::new(stdout.lock()))
        };
        self.write(&mut writer, comments)?;
        Ok(())
    }
}

/// Resolved column indices for the fields the coordinate unit consumes.
#[derive(Debug, Clone, Copy)]
pub struct HitCols {
    pub qseqid: usize,
    pub sseqid: usize,
    pub qstart: usize,
    pub qend: usize,
    pub sstart: usize,
    pub send: usize,
    pub qlen: usize,
    pub slen: usize,
    pub btop: Option<usize>,
}

impl HitCols {
    pub fn resolve(table: &BlastTable) -> Result<Self> {
        Ok(Self {
            qseqid: table.require_column("qseqid")?,
            sseqid: table.require_column("sseqid")?,
            qstart: table.require_column("qstart")?,
            qend: table.require_column("qend")?,
            sstart: table.require_column("sstart")?,
            send: table.require_column("send")?,
            qlen: table.require_column("qlen")?,
            slen: table.require_column("slen")?,
            btop: table.column("btop"),
        })
    }

    /// Parse one row into a typed hit. Row numbers in errors are 1-based.
    pub fn parse(&self, row: &[String], rowno: usize) -> Result<BlastHit> {
        fn num(row: &[String], idx: usize, name: &str, rowno: usize) -> Result<usize> {
            row[idx]
                .parse()
                .with_context(|| format!("Row {}: bad {} value '{}'", rowno, name, row[idx]))
        }

        Ok(BlastHit {
            query_id: row[self.qseqid].clone(),
            subject_id: row[self.sseqid].clone(),
            q_start: num(row, self.qstart, "qstart", rowno)?,
            q_end: num(row, self.qend, "qend", rowno)?,
            s_start: num(row, self.sstart, "sstart", rowno)?,
            s_end: num(row, self.send, "send", rowno)?,
            query_len: num(row, self.qlen, "qlen", rowno)?,
            subject_len: num(row, self.slen, "slen", rowno)?,
            btop: self.btop.map(|i| row[i].clone()),
        })
    }
}

/// One row of tabular BLAST output, immutable once parsed.
///
/// Subject start/end are kept exactly as reported; `sstart > send` encodes a
/// minus-strand hit until normalized.
#[derive(Debug, Clone)]
pub struct BlastHit {
    pub query_id: String,
    pub subject_id: String,
    pub q_start: usize,
    pub q_end: usize,
    pub s_start: usize,
    pub s_end: usize,
    pub query_len: usize,
    pub subject_len: usize,
    pub btop: Option<String>,
}
