//! Strand reconciliation for reported protospacers.
//!
//! Extraction works on canonical subject plus-strand coordinates. By default
//! the protospacer is also reported on the subject plus strand; callers can
//! instead mirror the query's BLAST orientation, in which case a minus-strand
//! hit is reverse-complemented and the 5'/3' PAM windows trade places.

use std::str::FromStr;

use super::orientation::Strand;
use super::pam::PamWindows;
use crate::sequence::revcomp;

/// Which strand convention reported sequences follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFrame {
    /// Report on the subject plus strand (default).
    #[default]
    SubjectPlus,
    /// Mirror the query's BLAST orientation.
    QueryAligned,
}

impl ReportFrame {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFrame::SubjectPlus => "subject",
            ReportFrame::QueryAligned => "query",
        }
    }

    /// True when a hit on `strand` must be flipped for this frame.
    #[inline]
    pub fn flips(&self, strand: Strand) -> bool {
        matches!(self, ReportFrame::QueryAligned) && strand.is_minus()
    }
}

impl FromStr for ReportFrame {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "subject" | "plus" => Ok(ReportFrame::SubjectPlus),
            "query" | "aligned" => Ok(ReportFrame::QueryAligned),
            _ => Err(format!(
                "Unknown report frame: {}. Use 'subject' or 'query'",
                s
            )),
        }
    }
}

/// Re-orient a canonical plus-strand sequence into the requested frame.
///
/// The operation is an involution: applying it to an already-mirrored
/// sequence recovers the canonical form.
pub fn reconcile_sequence(seq: &str, strand: Strand, frame: ReportFrame) -> String {
    if frame.flips(strand) {
        revcomp(seq)
    } else {
        seq.to_string()
    }
}

/// Re-orient canonical PAM windows into the requested frame: when a
/// minus-strand hit is mirrored, the 5' window becomes the reverse complement
/// of the canonical 3' window and vice versa.
pub fn reconcile_windows(windows: PamWindows, strand: Strand, frame: ReportFrame) -> PamWindows {
    if frame.flips(strand) {
        PamWindows {
            five: revcomp(&windows.three),
            three: revcomp(&windows.five),
        }
    } else {
        windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_plus_frame_never_flips() {
        assert_eq!(
            reconcile_sequence("acGGGgt", Strand::Minus, ReportFrame::SubjectPlus),
            "acGGGgt"
        );
        assert_eq!(
            reconcile_sequence("acGGGgt", Strand::Plus, ReportFrame::SubjectPlus),
            "acGGGgt"
        );
    }

    #[test]
    fn query_frame_flips_minus_hits_only() {
        assert_eq!(
            reconcile_sequence("acGGGgt", Strand::Plus, ReportFrame::QueryAligned),
            "acGGGgt"
        );
        assert_eq!(
            reconcile_sequence("acGGGgt", Strand::Minus, ReportFrame::QueryAligned),
            "acCCCgt"
        );
    }

    #[test]
    fn flipping_twice_recovers_the_canonical_sequence() {
        let mirrored = reconcile_sequence("ttaGGGGGtac", Strand::Minus, ReportFrame::QueryAligned);
        let back = reconcile_sequence(&mirrored, Strand::Minus, ReportFrame::QueryAligned);
        assert_eq!(back, "ttaGGGGGtac");
    }

    #[test]
    fn windows_swap_and_complement_when_mirrored() {
        let windows = PamWindows {
            five: "TTA".to_string(),
            three: "CGG".to_string(),
        };
        let out = reconcile_windows(windows.clone(), Strand::Minus, ReportFrame::QueryAligned);
        assert_eq!(out.five, "CCG");
        assert_eq!(out.three, "TAA");

        let unchanged = reconcile_windows(windows, Strand::Minus, ReportFrame::SubjectPlus);
        assert_eq!(unchanged.five, "TTA");
    }
}
