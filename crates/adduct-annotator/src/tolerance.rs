// Standard Library Imports
use std::ops::RangeInclusive;

// External Crate Imports
use mzpeaks::Tolerance;

// Local Crate Imports
use crate::{AnnotationError, MzTolerance, Result};

const DEFAULT_PPM: f64 = 10.0;

// Public API ==========================================================================================================

impl MzTolerance {
    #[must_use]
    pub const fn new(absolute: f64, ppm: f64) -> Self {
        Self { absolute, ppm }
    }

    #[must_use]
    pub const fn from_ppm(ppm: f64) -> Self {
        Self::new(0.0, ppm)
    }

    #[must_use]
    pub const fn absolute(&self) -> f64 {
        self.absolute
    }

    #[must_use]
    pub const fn ppm(&self) -> f64 {
        self.ppm
    }

    /// The larger of the absolute and relative tolerances at `mz`
    #[must_use]
    pub fn tolerance_at(&self, mz: f64) -> f64 {
        let (_, max_mz) = self.bounds(mz);
        max_mz - mz
    }

    /// The wider of the absolute and ppm windows around `mz`
    #[must_use]
    pub fn bounds(&self, mz: f64) -> (f64, f64) {
        let (da_min, da_max) = Tolerance::Da(self.absolute).bounds(mz);
        let (ppm_min, ppm_max) = Tolerance::PPM(self.ppm).bounds(mz);
        (da_min.min(ppm_min), da_max.max(ppm_max))
    }

    #[must_use]
    pub fn range(&self, mz: f64) -> RangeInclusive<f64> {
        let (min_mz, max_mz) = self.bounds(mz);
        min_mz..=max_mz
    }

    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.absolute * factor, self.ppm * factor)
    }
}

impl Default for MzTolerance {
    fn default() -> Self {
        Self::from_ppm(DEFAULT_PPM)
    }
}

// Crate API ===========================================================================================================

impl MzTolerance {
    pub(crate) fn validate(&self) -> Result<()> {
        let Self { absolute, ppm } = *self;
        let is_valid = |t: f64| t.is_finite() && t >= 0.0;

        if is_valid(absolute) && is_valid(ppm) && (absolute > 0.0 || ppm > 0.0) {
            Ok(())
        } else {
            Err(AnnotationError::InvalidTolerance { absolute, ppm })
        }
    }
}

// Module Tests ========================================================================================================
