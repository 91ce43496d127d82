//! Full-length and margin extension of protospacer spans.
//!
//! A spacer BLAST hit is often partial: the alignment covers only part of the
//! query. The full-length extender pulls the hit out to the whole query
//! length, adding the missing 5'/3' query bases to the correct end of the
//! subject for the hit's strand. The margin extender then adds a fixed
//! flanking margin on each side. Both clamp to `[1, subject_len]`; a
//! shortfall at a scaffold edge is absorbed, not padded, and the realized
//! amounts are reported so truncation stays detectable downstream.

use super::orientation::Strand;

/// 1-based inclusive coordinate span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start >= 1 && start <= end);
        Self { start, end }
    }

    /// Number of bases covered; a span is never empty.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Result of extending a hit to the full query length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullLengthSpan {
    /// Extended span on the subject, canonical plus-strand coordinates,
    /// clamped to `[1, subject_len]`.
    pub subject: Span,
    /// Query positions actually covered after the realized extension.
    pub query: Span,
    /// Bases toward the query 5' end lost to the subject boundary.
    pub short_5: usize,
    /// Bases toward the query 3' end lost to the subject boundary.
    pub short_3: usize,
}

impl FullLengthSpan {
    /// True when the whole query length was recovered on the subject.
    pub fn is_complete(&self) -> bool {
        self.short_5 == 0 && self.short_3 == 0
    }
}

/// Extend a canonicalized hit to the full query length.
///
/// `subject` and `strand` come from [`super::normalize`]; `query` is the
/// aligned query span, 1-based. On the plus strand the missing 5' query bases
/// extend the low end of the subject span; on the minus strand the two ends
/// swap roles.
pub fn extend_full_length(
    subject: Span,
    strand: Strand,
    query: Span,
    query_len: usize,
    subject_len: usize,
) -> FullLengthSpan {
    let missing_5 = query.start - 1;
    let missing_3 = query_len - query.end;

    let (want_low, want_high) = match strand {
        Strand::Plus => (missing_5, missing_3),
        Strand::Minus => (missing_3, missing_5),
    };

    let lo = subject.start as i64 - want_low as i64;
    let hi = subject.end as i64 + want_high as i64;
    let lo_clamped = lo.max(1);
    let hi_clamped = hi.min(subject_len as i64);
    let short_low = (lo_clamped - lo) as usize;
    let short_high = (hi - hi_clamped) as usize;

    let (short_5, short_3) = match strand {
        Strand::Plus => (short_low, short_high),
        Strand::Minus => (short_high, short_low),
    };

    FullLengthSpan {
        subject: Span::new(lo_clamped as usize, hi_clamped as usize),
        query: Span::new(
            query.start - (missing_5 - short_5),
            query.end + (missing_3 - short_3),
        ),
        short_5,
        short_3,
    }
}

/// A protospacer together with its margin-extended context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtoRegion {
    /// Margin-extended span, clamped to `[1, subject_len]`.
    pub outer: Span,
    /// The full-length protospacer span inside `outer`.
    pub inner: Span,
}

impl ProtoRegion {
    /// Realized margin on the low-coordinate side.
    #[inline]
    pub fn left_pad(&self) -> usize {
        self.inner.start - self.outer.start
    }

    /// Realized margin on the high-coordinate side.
    #[inline]
    pub fn right_pad(&self) -> usize {
        self.outer.end - self.inner.end
    }
}

/// Extend a full-length protospacer span by `margin` bp on each side,
/// clamped to the subject bounds.
pub fn extend_margin(inner: Span, margin: usize, subject_len: usize) -> ProtoRegion {
    let outer_start = inner.start.saturating_sub(margin).max(1);
    let outer_end = (inner.end + margin).min(subject_len);
    ProtoRegion {
        outer: Span::new(outer_start, outer_end),
        inner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_query_hit_is_a_no_op() {
        let hit = Span::new(200, 219);
        let out = extend_full_length(hit, Strand::Plus, Span::new(1, 20), 20, 1000);
        assert_eq!(out.subject, hit);
        assert_eq!(out.query, Span::new(1, 20));
        assert!(out.is_complete());

        let out = extend_full_length(hit, Strand::Minus, Span::new(1, 20), 20, 1000);
        assert_eq!(out.subject, hit);
        assert!(out.is_complete());
    }

    #[test]
    fn plus_strand_pulls_missing_ends() {
        // 5' missing 2, 3' missing 3.
        let out = extend_full_length(Span::new(100, 114), Strand::Plus, Span::new(3, 17), 20, 1000);
        assert_eq!(out.subject, Span::new(98, 117));
        assert_eq!(out.query, Span::new(1, 20));
        assert!(out.is_complete());
    }

    #[test]
    fn minus_strand_swaps_which_end_extends() {
        // Same hit on the minus strand: the missing query 5' bases sit at the
        // high-coordinate end of the subject.
        let out = extend_full_length(
            Span::new(100, 114),
            Strand::Minus,
            Span::new(3, 17),
            20,
            1000,
        );
        assert_eq!(out.subject, Span::new(97, 116));
        assert_eq!(out.query, Span::new(1, 20));
    }

    #[test]
    fn extension_clamps_at_subject_start() {
        // Hit 2 bp from the contig start cannot recover 5 missing 5' bases.
        let out = extend_full_length(Span::new(3, 12), Strand::Plus, Span::new(6, 15), 15, 1000);
        assert_eq!(out.subject.start, 1);
        assert_eq!(out.short_5, 3);
        assert_eq!(out.short_3, 0);
        assert_eq!(out.query, Span::new(4, 15));
        assert!(!out.is_complete());
    }

    #[test]
    fn extension_clamps_at_subject_end() {
        let out = extend_full_length(Span::new(990, 995), Strand::Plus, Span::new(1, 6), 15, 1000);
        assert_eq!(out.subject.end, 1000);
        assert_eq!(out.short_3, 4);
        assert_eq!(out.query, Span::new(1, 11));
    }

    #[test]
    fn margin_extends_both_sides() {
        let region = extend_margin(Span::new(40, 59), 10, 100);
        assert_eq!(region.outer, Span::new(30, 69));
        assert_eq!(region.left_pad(), 10);
        assert_eq!(region.right_pad(), 10);
    }

    #[test]
    fn margin_clamps_to_subject_bounds() {
        // Extending past subject length 1000 from a span ending at 995 yields
        // 1000, not 1005.
        let region = extend_margin(Span::new(950, 995), 10, 1000);
        assert_eq!(region.outer.end, 1000);
        assert_eq!(region.right_pad(), 5);

        let region = extend_margin(Span::new(4, 20), 10, 1000);
        assert_eq!(region.outer.start, 1);
        assert_eq!(region.left_pad(), 3);
    }

    #[test]
    fn partial_hit_end_to_end_example() {
        // subject length 100, hit s 40..50 plus, query length 20, q 1..11:
        // full-length extension pulls 9 bp off the 3' end (40..59), then a
        // 10 bp margin gives 30..69, inside [1, 100].
        let (lo, hi, strand) = super::super::normalize(40, 50);
        let full = extend_full_length(Span::new(lo, hi), strand, Span::new(1, 11), 20, 100);
        assert_eq!(full.subject, Span::new(40, 59));
        assert_eq!(full.query, Span::new(1, 20));
        assert!(full.is_complete());

        let region = extend_margin(full.subject, 10, 100);
        assert_eq!(region.outer, Span::new(30, 69));
    }
}
