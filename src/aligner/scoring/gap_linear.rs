use serde::{Deserialize, Serialize};

use crate::aligner::scoring::{check_gap_cost, GapCosts};
use crate::errors::AlignError;

/// Every gap residue costs the same.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GapLinear {
    cost_gap: f64
}

impl GapLinear {
    pub fn new(cost_gap: f64) -> Result<Self, AlignError> {
        check_gap_cost("gap", cost_gap)?;

        Ok(Self { cost_gap })
    }
}

impl GapCosts for GapLinear {
    #[inline(always)]
    fn gap_open(&self) -> f64 {
        self.cost_gap
    }

    #[inline(always)]
    fn gap_extend(&self) -> f64 {
        self.cost_gap
    }

    #[inline]
    fn gap_cost(&self, length: usize) -> f64 {
        length as f64 * self.cost_gap
    }
}
