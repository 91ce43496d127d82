//! The coordinate unit end to end: normalize, extend, render, slice PAMs,
//! reconcile, on literal sequences where every intermediate is checkable.

use cldb::proto::{
    extend_full_length, extend_margin, extract_windows, normalize, pam::render_region,
    reconcile_sequence, reconcile_windows, PamSpec, ReportFrame, Span, Strand,
};

/// 100 bp synthetic subject: the protospacer (20 x G) sits at 40..59 with
/// 10 x C upstream and 10 x T downstream.
fn genome() -> String {
    let mut g = String::new();
    g.push_str(&"A".repeat(29)); // 1..29
    g.push_str(&"C".repeat(10)); // 30..39
    g.push_str(&"G".repeat(20)); // 40..59
    g.push_str(&"T".repeat(10)); // 60..69
    g.push_str(&"A".repeat(31)); // 70..100
    g
}

#[test]
fn plus_strand_partial_hit_recovers_protospacer_and_pams() {
    let genome = genome();

    // Partial hit: q 1..11 of a 20 bp spacer, s 40..50.
    let (lo, hi, strand) = normalize(40, 50);
    assert_eq!(strand, Strand::Plus);

    let full = extend_full_length(Span::new(lo, hi), strand, Span::new(1, 11), 20, 100);
    assert_eq!(full.subject, Span::new(40, 59));

    let region = extend_margin(full.subject, 10, 100);
    assert_eq!(region.outer, Span::new(30, 69));

    let raw = &genome[region.outer.start - 1..region.outer.end];
    let rendered = render_region(raw, &region).unwrap();
    assert_eq!(
        rendered,
        format!("{}{}{}", "c".repeat(10), "G".repeat(20), "t".repeat(10))
    );

    let windows = extract_windows(&rendered, &region, &PamSpec::default()).unwrap();
    assert_eq!(windows.five, "ccc");
    assert_eq!(windows.three, "ttt");

    // Plus-strand hits look the same in both report frames.
    assert_eq!(
        reconcile_sequence(&rendered, strand, ReportFrame::QueryAligned),
        rendered
    );
}

#[test]
fn minus_strand_hit_mirrors_in_query_frame() {
    let genome = genome();

    // Same protospacer hit on the minus strand, full-length alignment.
    let (lo, hi, strand) = normalize(59, 40);
    assert_eq!(strand, Strand::Minus);
    assert_eq!((lo, hi), (40, 59));

    let full = extend_full_length(Span::new(lo, hi), strand, Span::new(1, 20), 20, 100);
    assert_eq!(full.subject, Span::new(40, 59));
    assert!(full.is_complete());

    let region = extend_margin(full.subject, 10, 100);
    let raw = &genome[region.outer.start - 1..region.outer.end];
    let rendered = render_region(raw, &region).unwrap();
    let windows = extract_windows(&rendered, &region, &PamSpec::default()).unwrap();

    // Subject plus frame: untouched.
    let plus_seq = reconcile_sequence(&rendered, strand, ReportFrame::SubjectPlus);
    assert_eq!(plus_seq, rendered);

    // Query frame: reverse complement, PAM windows trade places.
    let query_seq = reconcile_sequence(&rendered, strand, ReportFrame::QueryAligned);
    assert_eq!(
        query_seq,
        format!("{}{}{}", "a".repeat(10), "C".repeat(20), "g".repeat(10))
    );
    let mirrored = reconcile_windows(windows, strand, ReportFrame::QueryAligned);
    assert_eq!(mirrored.five, "aaa"); // revcomp of canonical 3' "ttt"
    assert_eq!(mirrored.three, "ggg"); // revcomp of canonical 5' "ccc"
}

#[test]
fn minus_strand_partial_hit_extends_the_correct_end() {
    // Spacer 20 bp, hit covers q 5..20: 4 bases missing at the query 5' end.
    // On the minus strand those bases sit past the high subject coordinate.
    let (lo, hi, strand) = normalize(55, 40);
    let full = extend_full_length(Span::new(lo, hi), strand, Span::new(5, 20), 20, 100);
    assert_eq!(full.subject, Span::new(40, 59));
    assert_eq!(full.query, Span::new(1, 20));
}

#[test]
fn truncated_extension_shortens_the_pam_window() {
    // Protospacer flush against the subject start: no upstream margin, so
    // the canonical 5' window comes back empty.
    let genome = "GGGGGTTTTTAAAAA"; // proto 1..5, subject len 15
    let region = extend_margin(Span::new(1, 5), 10, 15);
    assert_eq!(region.outer, Span::new(1, 15));
    assert_eq!(region.left_pad(), 0);

    let rendered = render_region(genome, &region).unwrap();
    assert_eq!(rendered, format!("{}{}", "GGGGG", "tttttaaaaa"));

    let windows = extract_windows(&rendered, &region, &PamSpec::default()).unwrap();
    assert_eq!(windows.five, "");
    assert_eq!(windows.three, "ttt");
}
