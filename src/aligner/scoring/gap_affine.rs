use serde::{Deserialize, Serialize};

use crate::aligner::scoring::{check_gap_cost, GapCosts};
use crate::errors::AlignError;

/// Gap-affine costs: a gap of length `L >= 1` costs `open + extend * (L - 1)`.
///
/// `extend <= open` is the usual choice but not required.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GapAffine {
    cost_gap_open: f64,
    cost_gap_extend: f64
}

impl GapAffine {
    pub fn new(cost_gap_open: f64, cost_gap_extend: f64) -> Result<Self, AlignError> {
        check_gap_cost("gap open", cost_gap_open)?;
        check_gap_cost("gap extend", cost_gap_extend)?;

        Ok(Self { cost_gap_open, cost_gap_extend })
    }
}

impl GapCosts for GapAffine {
    #[inline(always)]
    fn gap_open(&self) -> f64 {
        self.cost_gap_open
    }

    #[inline(always)]
    fn gap_extend(&self) -> f64 {
        self.cost_gap_extend
    }
}
