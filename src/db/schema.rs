//! Table definitions for the annotation database.
//!
//! Coordinates are 1-based inclusive throughout, matching the array files and
//! BLAST tables the loaders consume. Cluster tables are part of the schema
//! but have no loader in this tool.

pub const CREATE_META: &str = "CREATE TABLE meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)";

pub const CREATE_LOCI: &str = "CREATE TABLE loci (
    locus_id TEXT PRIMARY KEY,
    taxon_id TEXT,
    taxon_name TEXT,
    subtype TEXT,
    scaffold TEXT,
    locus_start INTEGER,
    locus_end INTEGER,
    array_start INTEGER,
    array_end INTEGER,
    cas_status TEXT,
    array_status TEXT,
    array_file TEXT,
    author TEXT
)";

pub const CREATE_SPACERS: &str = "CREATE TABLE spacers (
    locus_id TEXT NOT NULL,
    spacer_id INTEGER NOT NULL,
    spacer_start INTEGER NOT NULL,
    spacer_end INTEGER NOT NULL,
    spacer_sequence TEXT NOT NULL,
    PRIMARY KEY (locus_id, spacer_id)
)";

pub const CREATE_DRS: &str = "CREATE TABLE drs (
    locus_id TEXT NOT NULL,
    dr_id INTEGER NOT NULL,
    dr_start INTEGER NOT NULL,
    dr_end INTEGER NOT NULL,
    dr_sequence TEXT NOT NULL,
    PRIMARY KEY (locus_id, dr_id)
)";

pub const CREATE_GENES: &str = "CREATE TABLE genes (
    locus_id TEXT NOT NULL,
    gene_id TEXT NOT NULL,
    gene_start INTEGER,
    gene_end INTEGER,
    gene_length_aa INTEGER,
    gene_alias TEXT,
    in_operon TEXT,
    PRIMARY KEY (locus_id, gene_id)
)";

pub const CREATE_LEADERS: &str = "CREATE TABLE leaders (
    locus_id TEXT PRIMARY KEY,
    scaffold TEXT,
    leader_start INTEGER,
    leader_end INTEGER,
    leader_sequence TEXT
)";

pub const CREATE_SPACER_CLUSTERS: &str = "CREATE TABLE spacer_clusters (
    locus_id TEXT NOT NULL,
    spacer_id INTEGER NOT NULL,
    cluster_id INTEGER NOT NULL,
    pct_identity REAL,
    PRIMARY KEY (locus_id, spacer_id, pct_identity)
)";

pub const CREATE_DR_CLUSTERS: &str = "CREATE TABLE dr_clusters (
    locus_id TEXT NOT NULL,
    dr_id INTEGER NOT NULL,
    cluster_id INTEGER NOT NULL,
    pct_identity REAL,
    PRIMARY KEY (locus_id, dr_id, pct_identity)
)";

pub const CREATE_BLAST_HITS: &str = "CREATE TABLE blast_hits (
    hit_id INTEGER PRIMARY KEY,
    query_id TEXT NOT NULL,
    subject_id TEXT NOT NULL,
    subject_db TEXT NOT NULL,
    pident REAL,
    aln_length INTEGER,
    mismatch INTEGER,
    gapopen INTEGER,
    qstart INTEGER NOT NULL,
    qend INTEGER NOT NULL,
    sstart INTEGER NOT NULL,
    send INTEGER NOT NULL,
    evalue REAL,
    bitscore REAL,
    qlen INTEGER,
    slen INTEGER,
    btop TEXT
)";

/// Every table in creation order.
pub const TABLES: &[(&str, &str)] = &[
    ("meta", CREATE_META),
    ("loci", CREATE_LOCI),
    ("spacers", CREATE_SPACERS),
    ("drs", CREATE_DRS),
    ("genes", CREATE_GENES),
    ("leaders", CREATE_LEADERS),
    ("spacer_clusters", CREATE_SPACER_CLUSTERS),
    ("dr_clusters", CREATE_DR_CLUSTERS),
    ("blast_hits", CREATE_BLAST_HITS),
];
