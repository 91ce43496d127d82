//! Annotation store round trips on real files.

use cldb::db::{ArrayElement, CldbDatabase, ElementFilter, Locus};
use cldb::key::ElementType;
use std::fs;
use tempfile::tempdir;

fn locus(id: &str, subtype: &str) -> Locus {
    Locus {
        locus_id: id.to_string(),
        subtype: Some(subtype.to_string()),
        taxon_id: Some("83333".to_string()),
        array_start: Some(100),
        array_end: Some(300),
        array_file: Some(format!("{}_array.txt", id)),
        ..Default::default()
    }
}

#[test]
fn create_load_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cldb.sqlite");

    assert!(!CldbDatabase::exists(&path));
    {
        let mut db = CldbDatabase::create(&path).unwrap();
        db.insert_loci(&[locus("L1", "I-E")]).unwrap();
        db.insert_elements(
            ElementType::Spacer,
            &[ArrayElement {
                locus_id: "L1".to_string(),
                element_id: 1,
                start: 111,
                end: 142,
                sequence: "ACGT".repeat(8),
            }],
        )
        .unwrap();
    }
    assert!(CldbDatabase::exists(&path));

    // Creating over an existing database is refused.
    assert!(CldbDatabase::create(&path).is_err());

    let db = CldbDatabase::open_read_only(&path).unwrap();
    assert_eq!(db.count("loci").unwrap(), 1);
    let spacers = db
        .select_elements(ElementType::Spacer, &ElementFilter::default())
        .unwrap();
    assert_eq!(spacers.len(), 1);
    assert_eq!(spacers[0].sequence.len(), 32);
    assert_eq!(
        db.loci_array_files().unwrap(),
        vec![("L1".to_string(), Some("L1_array.txt".to_string()))]
    );
}

#[test]
fn opening_a_non_database_file_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("not_a_db.txt");
    fs::write(&path, "loci\n").unwrap();
    assert!(CldbDatabase::open(&path).is_err());
}

#[test]
fn opening_a_missing_file_fails() {
    let dir = tempdir().unwrap();
    assert!(CldbDatabase::open(dir.path().join("absent.sqlite")).is_err());
}
