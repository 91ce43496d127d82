//! Protospacer coordinate transformation
//!
//! Turns raw BLAST hit coordinates (spacer query vs. genomic subject) into
//! full-length, margin-extended protospacer regions with flanking PAM windows.
//! All functions are pure; tunables travel in explicit config values rather
//! than shared state.

pub mod extend;
pub mod orientation;
pub mod pam;
pub mod reconcile;

pub use extend::{extend_full_length, extend_margin, FullLengthSpan, ProtoRegion, Span};
pub use orientation::{normalize, Strand};
pub use pam::{extract_windows, PamSpec, PamWindows};
pub use reconcile::{reconcile_sequence, reconcile_windows, ReportFrame};
