//! Full matrix alignment engines.
//!
//! Both engines fill a (m+1) x (n+1) grid where row 0 and column 0 hold the
//! pure gap prefixes. The per-cell step functions are shared with the
//! score-only scans of the linear space engines.

pub mod affine;
pub mod linear;
