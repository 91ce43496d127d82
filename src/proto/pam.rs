//! PAM window extraction from margin-extended protospacer sequences.

use anyhow::{bail, ensure, Result};
use std::fmt;
use std::str::FromStr;

use super::extend::ProtoRegion;
use crate::sequence::render_case;

/// Four-integer PAM window specification, offsets relative to the
/// un-extended protospacer boundaries.
///
/// The 5' window covers `five_start..=five_end` relative to the first
/// protospacer base (negative = upstream); the 3' window covers
/// `three_start..=three_end` relative to the last base (positive =
/// downstream). The default `(-3, -1, 1, 3)` takes 3 bp on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PamSpec {
    pub five_start: i64,
    pub five_end: i64,
    pub three_start: i64,
    pub three_end: i64,
}

impl PamSpec {
    /// Validate and build a window spec. A window with non-positive length is
    /// a caller-configuration error and fails fast.
    pub fn new(five_start: i64, five_end: i64, three_start: i64, three_end: i64) -> Result<Self> {
        if five_end - five_start + 1 <= 0 {
            bail!(
                "Invalid PAM spec: 5' window {},{} has non-positive length",
                five_start,
                five_end
            );
        }
        if three_end - three_start + 1 <= 0 {
            bail!(
                "Invalid PAM spec: 3' window {},{} has non-positive length",
                three_start,
                three_end
            );
        }
        Ok(Self {
            five_start,
            five_end,
            three_start,
            three_end,
        })
    }
}

impl Default for PamSpec {
    fn default() -> Self {
        Self {
            five_start: -3,
            five_end: -1,
            three_start: 1,
            three_end: 3,
        }
    }
}

impl fmt::Display for PamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.five_start, self.five_end, self.three_start, self.three_end
        )
    }
}

impl FromStr for PamSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(format!(
                "PAM spec '{}' must be 4 comma-separated integers, e.g. -3,-1,1,3",
                s
            ));
        }
        let mut vals = [0i64; 4];
        for (i, part) in parts.iter().enumerate() {
            vals[i] = part
                .parse()
                .map_err(|_| format!("PAM spec '{}': '{}' is not an integer", s, part))?;
        }
        PamSpec::new(vals[0], vals[1], vals[2], vals[3]).map_err(|e| e.to_string())
    }
}

/// The two flanking windows sliced from a protospacer region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PamWindows {
    pub five: String,
    pub three: String,
}

/// Slice a half-open index range out of `seq`, truncating silently at the
/// sequence bounds (a window running off a scaffold edge is shortened, the
/// same way the extension shortfall is absorbed).
fn slice_window(seq: &str, start: i64, end: i64) -> String {
    let len = seq.len() as i64;
    let lo = start.max(0).min(len) as usize;
    let hi = end.max(0).min(len) as usize;
    if lo >= hi {
        String::new()
    } else {
        seq[lo..hi].to_string()
    }
}

/// Extract the 5' and 3' PAM windows from a margin-extended sequence.
///
/// `seq` is the margin-extended region in the same orientation as
/// `region` (canonical subject plus strand); its length must match
/// `region.outer`.
pub fn extract_windows(seq: &str, region: &ProtoRegion, spec: &PamSpec) -> Result<PamWindows> {
    ensure!(
        seq.len() == region.outer.len(),
        "Sequence length {} does not match extended span length {}",
        seq.len(),
        region.outer.len()
    );

    // 0-based indices of the protospacer within the extended string.
    let first = region.left_pad() as i64;
    let last = first + region.inner.len() as i64 - 1;

    let five = slice_window(seq, first + spec.five_start, first + spec.five_end + 1);
    let three = slice_window(seq, last + spec.three_start, last + spec.three_end + 1);
    Ok(PamWindows { five, three })
}

/// Render the margin-extended sequence with the protospacer upper-cased and
/// the extension lower-cased.
pub fn render_region(seq: &str, region: &ProtoRegion) -> Result<String> {
    ensure!(
        seq.len() == region.outer.len(),
        "Sequence length {} does not match extended span length {}",
        seq.len(),
        region.outer.len()
    );
    let first = region.left_pad();
    Ok(render_case(seq, first, first + region.inner.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::extend::{extend_margin, Span};

    #[test]
    fn default_spec_is_three_by_three() {
        let spec = PamSpec::default();
        assert_eq!((spec.five_start, spec.five_end), (-3, -1));
        assert_eq!((spec.three_start, spec.three_end), (1, 3));
    }

    #[test]
    fn non_positive_windows_are_rejected() {
        assert!(PamSpec::new(-1, -3, 1, 3).is_err());
        assert!(PamSpec::new(-3, -1, 3, 1).is_err());
        assert!(PamSpec::new(-3, -1, 1, 3).is_ok());
    }

    #[test]
    fn spec_parses_from_flag_form() {
        let spec: PamSpec = "-3,-1,1,3".parse().unwrap();
        assert_eq!(spec, PamSpec::default());
        assert!("1,2,3".parse::<PamSpec>().is_err());
        assert!("-1,-3,1,3".parse::<PamSpec>().is_err());
        assert!("a,b,c,d".parse::<PamSpec>().is_err());
    }

    #[test]
    fn windows_slice_expected_literals() {
        // Protospacer GGGGG at 11..15 of a 20 bp subject, 3 bp margin.
        //            1234567890123456789 0
        let subject = "AAACCCTTTAGGGGGTACGT";
        let region = extend_margin(Span::new(11, 15), 3, 20);
        assert_eq!(region.outer, Span::new(8, 18));
        let seq = &subject[7..18];
        assert_eq!(seq, "TTAGGGGGTAC");

        let windows = extract_windows(seq, &region, &PamSpec::default()).unwrap();
        assert_eq!(windows.five, "TTA");
        assert_eq!(windows.three, "TAC");
    }

    #[test]
    fn windows_truncate_at_scaffold_edges() {
        // Protospacer starts 2 bp into the subject: only 2 bp of upstream
        // margin exist, so the 3 bp 5' window shortens to 2.
        let subject = "CCGGGGGAAAA";
        let region = extend_margin(Span::new(3, 7), 3, 11);
        assert_eq!(region.outer, Span::new(1, 10));
        let seq = &subject[0..10];

        let windows = extract_windows(seq, &region, &PamSpec::default()).unwrap();
        assert_eq!(windows.five, "CC");
        assert_eq!(windows.three, "AAA");
    }

    #[test]
    fn render_marks_protospacer_case() {
        let region = extend_margin(Span::new(11, 15), 3, 20);
        let rendered = render_region("ttagggggtac", &region).unwrap();
        assert_eq!(rendered, "ttaGGGGGtac");
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let region = extend_margin(Span::new(11, 15), 3, 20);
        assert!(extract_windows("ACGT", &region, &PamSpec::default()).is_err());
        assert!(render_region("ACGT", &region).is_err());
    }
}
