//! The full command chain on a synthetic genome: make-db, load-loci,
//! load-arrays, array2fasta, add-proto, get-pams, align. Everything runs on
//! temp files; no external tools are invoked (the subject comes from FASTA).

use cldb::blast::tabular::BlastTable;
use cldb::commands::{addproto, align, array2fasta, getpams, loadarrays, loadloci, makedb};
use cldb::db::CldbDatabase;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// 100 bp subject: protospacer (20 x G) at 40..59, 10 x C upstream,
/// 10 x T downstream.
fn genome_seq() -> String {
    format!(
        "{}{}{}{}{}",
        "A".repeat(29),
        "C".repeat(10),
        "G".repeat(20),
        "T".repeat(10),
        "A".repeat(31)
    )
}

const SPACER: &str = "GGGGGGGGGGGGGGGGGGGG";
const HIT_FIELDS: &str = "qseqid sseqid qstart qend sstart send qlen slen btop";

struct Fixture {
    db: PathBuf,
    genome: PathBuf,
    hits: PathBuf,
}

fn build_fixture(dir: &Path) -> Fixture {
    let db = dir.join("cldb.sqlite");
    makedb::run(makedb::MakeDbArgs {
        database: db.clone(),
        verbose: false,
    })
    .unwrap();

    let loci = dir.join("loci.txt");
    fs::write(
        &loci,
        "locus_id\ttaxon_id\tsubtype\tscaffold\tlocus_start\tlocus_end\tarray_start\tarray_end\tarray_file\n\
         L1\t83333\tI-E\tchr1\t50\t400\t100\t300\tL1_array.txt\n",
    )
    .unwrap();
    loadloci::run(loadloci::LoadLociArgs {
        database: db.clone(),
        input: loci,
        verbose: false,
    })
    .unwrap();

    fs::write(
        dir.join("L1_array.txt"),
        format!("position\trepeat\tspacer\n100\tGTGTTCCCCGC\t{}\n175\tGTGTTCCCCGC\n", SPACER),
    )
    .unwrap();
    loadarrays::run(loadarrays::LoadArraysArgs {
        database: db.clone(),
        array_dir: dir.to_path_buf(),
        verbose: false,
    })
    .unwrap();

    let genome = dir.join("genome.fna");
    fs::write(&genome, format!(">chr1\n{}\n", genome_seq())).unwrap();

    // One partial plus-strand hit, one full-length minus-strand hit, both on
    // the same protospacer.
    let hits = dir.join("hits.tsv");
    fs::write(
        &hits,
        "L1|spacer|1\tchr1\t1\t11\t40\t50\t20\t100\t11\n\
         L1|spacer|1\tchr1\t1\t20\t59\t40\t20\t100\t20\n",
    )
    .unwrap();

    Fixture { db, genome, hits }
}

fn column<'a>(table: &BlastTable, row: &'a [String], name: &str) -> &'a str {
    let idx = table.column(name).unwrap_or_else(|| panic!("no column {}", name));
    &row[idx]
}

#[test]
fn loaded_spacers_export_as_fasta() {
    let dir = tempdir().unwrap();
    let fixture = build_fixture(dir.path());

    let db = CldbDatabase::open_read_only(&fixture.db).unwrap();
    assert_eq!(db.count("spacers").unwrap(), 1);
    assert_eq!(db.count("drs").unwrap(), 2);
    drop(db);

    let out = dir.path().join("spacers.fna");
    array2fasta::run(array2fasta::Array2FastaArgs {
        database: fixture.db.clone(),
        element: "spacer".parse().unwrap(),
        subtype: Some("I-E".to_string()),
        taxon_id: None,
        taxon_name: None,
        locus_id: None,
        out: Some(out.clone()),
        verbose: false,
    })
    .unwrap();

    let fasta = fs::read_to_string(&out).unwrap();
    assert!(fasta.starts_with(">L1|spacer|1 111..130"));
    assert!(fasta.contains(SPACER));
}

#[test]
fn add_proto_then_get_pams_subject_frame() {
    let dir = tempdir().unwrap();
    let fixture = build_fixture(dir.path());

    let proto = dir.path().join("proto.tsv");
    addproto::run(addproto::AddProtoArgs {
        input: fixture.hits.clone(),
        fields: Some(HIT_FIELDS.to_string()),
        subject: Some(fixture.genome.clone()),
        blast_db: None,
        extend: 10,
        revcomp: false,
        out: Some(proto.clone()),
        verbose: false,
    })
    .unwrap();

    let table = BlastTable::read(&proto, None).unwrap();
    assert_eq!(table.rows.len(), 2);
    let expected_seq = format!("{}{}{}", "c".repeat(10), "G".repeat(20), "t".repeat(10));
    for (row, strand) in table.rows.iter().zip(["+", "-"]) {
        assert_eq!(column(&table, row, "proto_start"), "40");
        assert_eq!(column(&table, row, "proto_end"), "59");
        assert_eq!(column(&table, row, "ext_start"), "30");
        assert_eq!(column(&table, row, "ext_end"), "69");
        assert_eq!(column(&table, row, "proto_strand"), strand);
        assert_eq!(column(&table, row, "proto_frame"), "subject");
        assert_eq!(column(&table, row, "proto_seq"), expected_seq);
    }

    let pams = dir.path().join("pams.tsv");
    getpams::run(getpams::GetPamsArgs {
        input: proto,
        pam: "-3,-1,1,3".parse().unwrap(),
        out: Some(pams.clone()),
        verbose: false,
    })
    .unwrap();

    let pam_table = BlastTable::read(&pams, None).unwrap();
    assert_eq!(pam_table.rows.len(), 2);
    for row in &pam_table.rows {
        assert_eq!(column(&pam_table, row, "pam_five"), "ccc");
        assert_eq!(column(&pam_table, row, "pam_three"), "ttt");
    }
}

#[test]
fn revcomp_mirrors_minus_strand_hits_and_pams() {
    let dir = tempdir().unwrap();
    let fixture = build_fixture(dir.path());

    let proto = dir.path().join("proto_rc.tsv");
    addproto::run(addproto::AddProtoArgs {
        input: fixture.hits.clone(),
        fields: Some(HIT_FIELDS.to_string()),
        subject: Some(fixture.genome.clone()),
        blast_db: None,
        extend: 10,
        revcomp: true,
        out: Some(proto.clone()),
        verbose: false,
    })
    .unwrap();

    let table = BlastTable::read(&proto, None).unwrap();
    let plus_row = &table.rows[0];
    let minus_row = &table.rows[1];
    assert_eq!(
        column(&table, plus_row, "proto_seq"),
        format!("{}{}{}", "c".repeat(10), "G".repeat(20), "t".repeat(10))
    );
    // The minus-strand hit mirrors into the query orientation.
    assert_eq!(
        column(&table, minus_row, "proto_seq"),
        format!("{}{}{}", "a".repeat(10), "C".repeat(20), "g".repeat(10))
    );
    assert_eq!(column(&table, minus_row, "proto_frame"), "query");
    // Coordinates stay canonical either way.
    assert_eq!(column(&table, minus_row, "proto_start"), "40");
    assert_eq!(column(&table, minus_row, "proto_end"), "59");

    let pams = dir.path().join("pams_rc.tsv");
    getpams::run(getpams::GetPamsArgs {
        input: proto,
        pam: "-3,-1,1,3".parse().unwrap(),
        out: Some(pams.clone()),
        verbose: false,
    })
    .unwrap();

    let pam_table = BlastTable::read(&pams, None).unwrap();
    assert_eq!(column(&pam_table, &pam_table.rows[0], "pam_five"), "ccc");
    assert_eq!(column(&pam_table, &pam_table.rows[0], "pam_three"), "ttt");
    // Mirrored hit: windows trade places and complement.
    assert_eq!(column(&pam_table, &pam_table.rows[1], "pam_five"), "aaa");
    assert_eq!(column(&pam_table, &pam_table.rows[1], "pam_three"), "ggg");
}

#[test]
fn align_reconstructs_from_btop() {
    let dir = tempdir().unwrap();
    let fixture = build_fixture(dir.path());

    let out = dir.path().join("alignments.txt");
    align::run(align::AlignArgs {
        input: fixture.hits.clone(),
        fields: Some(HIT_FIELDS.to_string()),
        database: fixture.db.clone(),
        out: Some(out.clone()),
        verbose: false,
    })
    .unwrap();

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains(">L1|spacer|1 chr1 40..50 (mismatches=0, gaps=0)"));
    assert!(text.contains(&"G".repeat(11)));
    assert!(text.contains(&"G".repeat(20)));
}
