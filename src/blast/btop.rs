//! BTOP (BLAST trace-back operations) parsing.
//!
//! A BTOP string alternates match-run lengths with two-character edit
//! descriptions: `AG` is a query A over a subject G, `A-` a query base over a
//! subject gap, `-A` a query gap over a subject A. `7AG39` reads as 7
//! matches, one substitution, 39 matches. Together with the aligned query
//! segment this is enough to reconstruct both gapped alignment strings.

use anyhow::{bail, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BtopOp {
    /// Run of identical bases.
    Match(usize),
    /// Substitution: query base over subject base.
    Subst { q: char, s: char },
    /// Gap in the subject (query base inserted).
    SubjectGap { q: char },
    /// Gap in the query (subject base inserted).
    QueryGap { s: char },
}

/// Parse a BTOP string into operations.
pub fn parse(btop: &str) -> Result<Vec<BtopOp>> {
    let mut ops = Vec::new();
    let mut chars = btop.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            let mut run = 0usize;
            while let Some(&d) = chars.peek() {
                if let Some(v) = d.to_digit(10) {
                    run = run * 10 + v as usize;
                    chars.next();
                } else {
                    break;
                }
            }
            if run > 0 {
                ops.push(BtopOp::Match(run));
            }
        } else {
            let q = match chars.next() {
                Some(ch) => ch,
                None => break,
            };
            let s = match chars.next() {
                Some(ch) => ch,
                None => bail!("Truncated BTOP string '{}': unpaired edit character", btop),
            };
            let op = match (q, s) {
                ('-', '-') => bail!("Malformed BTOP string '{}': gap aligned to gap", btop),
                ('-', s) => BtopOp::QueryGap { s },
                (q, '-') => BtopOp::SubjectGap { q },
                (q, s) => BtopOp::Subst { q, s },
            };
            ops.push(op);
        }
    }
    Ok(ops)
}

/// Alignment summary derived from a BTOP trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlignmentStats {
    pub matches: usize,
    pub mismatches: usize,
    pub query_gaps: usize,
    pub subject_gaps: usize,
}

impl AlignmentStats {
    /// Total gapped alignment length.
    pub fn aligned_len(&self) -> usize {
        self.matches + self.mismatches + self.query_gaps + self.subject_gaps
    }
}

pub fn stats(ops: &[BtopOp]) -> AlignmentStats {
    let mut out = AlignmentStats::default();
    for op in ops {
        match op {
            BtopOp::Match(n) => out.matches += n,
            BtopOp::Subst { .. } => out.mismatches += 1,
            BtopOp::SubjectGap { .. } => out.subject_gaps += 1,
            BtopOp::QueryGap { .. } => out.query_gaps += 1,
        }
    }
    out
}

/// Rebuild the gapped query/subject alignment strings from the aligned query
/// segment (`qstart..=qend`, ungapped) and the BTOP trace.
pub fn reconstruct(query_segment: &str, ops: &[BtopOp]) -> Result<(String, String)> {
    let mut q_aln = String::new();
    let mut s_aln = String::new();
    let mut query = query_segment.chars();

    let next_q = |query: &mut std::str::Chars,
                      q_aln: &mut String,
                      s_aln: &mut String|
     -> Result<()> {
        match query.next() {
            Some(c) => {
                q_aln.push(c);
                s_aln.push(c);
                Ok(())
            }
            None => bail!("BTOP trace longer than the aligned query segment"),
        }
    };

    for op in ops {
        match *op {
            BtopOp::Match(n) => {
                for _ in 0..n {
                    next_q(&mut query, &mut q_aln, &mut s_aln)?;
                }
            }
            BtopOp::Subst { q, s } => {
                if query.next().is_none() {
                    bail!("BTOP trace longer than the aligned query segment");
                }
                q_aln.push(q);
                s_aln.push(s);
            }
            BtopOp::SubjectGap { q } => {
                if query.next().is_none() {
                    bail!("BTOP trace longer than the aligned query segment");
                }
                q_aln.push(q);
                s_aln.push('-');
            }
            BtopOp::QueryGap { s } => {
                q_aln.push('-');
                s_aln.push(s);
            }
        }
    }

    if query.next().is_some() {
        bail!("BTOP trace shorter than the aligned query segment");
    }
    Ok((q_aln, s_aln))
}
