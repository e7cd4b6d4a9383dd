// Standard Library Imports
use std::fmt::{self, Display, Formatter};

// Local Crate Imports
use crate::{Adduct, AnnotationError, Result};

// Public API ==========================================================================================================

impl Adduct {
    pub fn new(
        name: impl Into<String>,
        charge: i32,
        num_mol: u32,
        added_mass: f64,
        log10_frequency: f64,
    ) -> Self {
        Self {
            name: name.into(),
            charge,
            num_mol,
            added_mass,
            log10_frequency,
        }
    }

    /// Builds an adduct from its empirical frequency, which is stored as a log10 score
    pub fn from_frequency(
        name: impl Into<String>,
        charge: i32,
        num_mol: u32,
        added_mass: f64,
        frequency: f64,
    ) -> Result<Self> {
        let name = name.into();
        if !frequency.is_finite() || frequency <= 0.0 {
            return Err(AnnotationError::invalid_frequency(&name, frequency));
        }

        Ok(Self::new(name, charge, num_mol, added_mass, frequency.log10()))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn charge(&self) -> i32 {
        self.charge
    }

    #[must_use]
    pub const fn num_mol(&self) -> u32 {
        self.num_mol
    }

    #[must_use]
    pub const fn added_mass(&self) -> f64 {
        self.added_mass
    }

    #[must_use]
    pub const fn log10_frequency(&self) -> f64 {
        self.log10_frequency
    }

    /// The neutral mass that would be observed at `mz` as this adduct, if that mass is positive
    #[must_use]
    pub fn neutral_mass(&self, mz: f64) -> Option<f64> {
        if !self.is_usable() {
            return None;
        }

        let mass = mz.mul_add(self.abs_charge(), -self.added_mass) / f64::from(self.num_mol);
        (mass.is_finite() && mass > 0.0).then_some(mass)
    }

    /// The m/z at which a neutral `mass` would be observed as this adduct
    #[must_use]
    pub fn mz(&self, mass: f64) -> f64 {
        mass.mul_add(f64::from(self.num_mol), self.added_mass) / self.abs_charge()
    }
}

impl Display for Adduct {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// Crate API ===========================================================================================================

impl Adduct {
    pub(crate) fn is_usable(&self) -> bool {
        self.charge != 0 && self.num_mol != 0 && self.log10_frequency.is_finite()
    }

    pub(crate) fn accepts_charge(&self, isotope_charge: Option<u32>) -> bool {
        isotope_charge.is_none_or(|charge| charge == self.charge.unsigned_abs())
    }

    fn abs_charge(&self) -> f64 {
        f64::from(self.charge.unsigned_abs())
    }
}

// Module Tests ========================================================================================================
