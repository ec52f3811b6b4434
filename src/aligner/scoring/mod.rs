pub mod gap_linear;
pub mod gap_affine;
pub mod matrices;
pub mod substitution;

use serde::{Deserialize, Serialize};

use crate::errors::AlignError;

pub use gap_affine::GapAffine;
pub use gap_linear::GapLinear;
pub use matrices::ScoringModelSpec;
pub use substitution::{ScoringModel, ScoringModelBuilder};

/// Gap penalties. Costs are non-negative and are subtracted from the alignment score.
pub trait GapCosts: Copy + Send + Sync {
    /// Cost of the first residue of a gap
    fn gap_open(&self) -> f64;

    /// Cost of every following residue
    fn gap_extend(&self) -> f64;

    /// Total cost of a single gap of the given length
    #[inline]
    fn gap_cost(&self, length: usize) -> f64 {
        if length == 0 {
            return 0.0
        }

        self.gap_open() + (length - 1) as f64 * self.gap_extend()
    }
}

/// Whether gaps use the one-layer (linear) or three-layer (affine) recurrence.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GapKind {
    #[default]
    Linear,
    Affine,
}

/// The gap cost model of an alignment.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GapModel {
    Linear(GapLinear),
    Affine(GapAffine),
}

impl GapModel {
    pub fn kind(&self) -> GapKind {
        match self {
            Self::Linear(_) => GapKind::Linear,
            Self::Affine(_) => GapKind::Affine,
        }
    }
}

impl GapCosts for GapModel {
    #[inline]
    fn gap_open(&self) -> f64 {
        match self {
            Self::Linear(costs) => costs.gap_open(),
            Self::Affine(costs) => costs.gap_open(),
        }
    }

    #[inline]
    fn gap_extend(&self) -> f64 {
        match self {
            Self::Linear(costs) => costs.gap_extend(),
            Self::Affine(costs) => costs.gap_extend(),
        }
    }
}

impl From<GapLinear> for GapModel {
    fn from(value: GapLinear) -> Self {
        Self::Linear(value)
    }
}

impl From<GapAffine> for GapModel {
    fn from(value: GapAffine) -> Self {
        Self::Affine(value)
    }
}

pub(crate) fn check_gap_cost(what: &str, cost: f64) -> Result<(), AlignError> {
    if !cost.is_finite() || cost < 0.0 {
        return Err(AlignError::InvalidParameter(
            format!("{what} cost should be a non-negative number, got {cost}")
        ));
    }

    Ok(())
}
