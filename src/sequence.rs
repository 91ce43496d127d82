//! Small DNA sequence helpers shared by the protospacer unit and the CLI commands.

use bio::alphabets::dna;

/// Reverse complement of a DNA sequence, preserving case.
///
/// IUPAC ambiguity codes are complemented by the underlying alphabet table;
/// anything outside it passes through unchanged.
pub fn revcomp(seq: &str) -> String {
    String::from_utf8(dna::revcomp(seq.as_bytes())).unwrap_or_else(|_| seq.chars().rev().collect())
}

/// Render a subsequence with mixed case: positions in `[upper_start, upper_end)`
/// (0-based, relative to `seq`) upper-cased, everything else lower-cased.
///
/// Used to mark the protospacer within its margin-extended context.
pub fn render_case(seq: &str, upper_start: usize, upper_end: usize) -> String {
    seq.char_indices()
        .map(|(i, c)| {
            if i >= upper_start && i < upper_end {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}
