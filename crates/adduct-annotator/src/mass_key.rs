// Standard Library Imports
use std::fmt::{self, Display, Formatter};

// Local Crate Imports
use crate::MassKey;

const MILLI_DALTONS: f64 = 1_000.0;

impl MassKey {
    pub(crate) fn from_mass(mass: f64) -> Self {
        Self((mass * MILLI_DALTONS).round() as i64)
    }

    pub(crate) fn mass(self) -> f64 {
        self.0 as f64 / MILLI_DALTONS
    }
}

impl Display for MassKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.mass())
    }
}
