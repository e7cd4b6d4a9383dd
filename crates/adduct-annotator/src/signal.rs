// Standard Library Imports
use std::collections::BTreeSet;

// Local Crate Imports
use crate::{AnnotationError, Result, Signal, SignalId};

// Public API ==========================================================================================================

impl Signal {
    #[must_use]
    pub const fn new(id: u32, mz: f64) -> Self {
        Self {
            id: SignalId(id),
            mz,
            charge: 0,
        }
    }

    #[must_use]
    pub const fn with_charge(self, charge: u32) -> Self {
        Self { charge, ..self }
    }

    #[must_use]
    pub const fn id(&self) -> SignalId {
        self.id
    }

    #[must_use]
    pub const fn mz(&self) -> f64 {
        self.mz
    }

    #[must_use]
    pub const fn charge(&self) -> u32 {
        self.charge
    }
}

// Crate API ===========================================================================================================

impl Signal {
    pub(crate) const fn isotope_charge(&self) -> Option<u32> {
        if self.charge == 0 {
            None
        } else {
            Some(self.charge)
        }
    }

    // NOTE: Candidate generation relies on signals being sorted by m/z, but callers shouldn't need to care about that,
    // so a sorted copy is returned instead of sorting the caller's slice
    pub(crate) fn sorted_by_mz(signals: &[Self]) -> Result<Vec<Self>> {
        if signals.is_empty() {
            return Err(AnnotationError::EmptyClique);
        }

        let mut seen = BTreeSet::new();
        for &Self { id, mz, .. } in signals {
            if !mz.is_finite() || mz <= 0.0 {
                return Err(AnnotationError::InvalidMz { id, mz });
            }
            if !seen.insert(id) {
                return Err(AnnotationError::DuplicateSignal(id));
            }
        }

        let mut sorted = signals.to_vec();
        sorted.sort_by(|a, b| a.mz.total_cmp(&b.mz).then(a.id.cmp(&b.id)));
        Ok(sorted)
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn signal_getters() {
        let signal = Signal::new(7, 301.1601);
        assert_eq!(signal.id(), SignalId(7));
        assert_float_absolute_eq!(signal.mz(), 301.1601);
        assert_eq!(signal.charge(), 0);
        assert_eq!(signal.isotope_charge(), None);

        let charged = signal.with_charge(2);
        assert_eq!(charged.id(), SignalId(7));
        assert_eq!(charged.charge(), 2);
        assert_eq!(charged.isotope_charge(), Some(2));
    }

    #[test]
    fn sort_signals_by_mz() {
        let signals = [
            Signal::new(3, 500.2),
            Signal::new(1, 301.1),
            Signal::new(4, 301.1),
            Signal::new(2, 150.05),
        ];
        let sorted: Vec<_> = Signal::sorted_by_mz(&signals)
            .unwrap()
            .iter()
            .map(Signal::id)
            .collect();
        assert_eq!(sorted, [2, 1, 4, 3].map(SignalId));
        // The caller's signals are left untouched
        assert_eq!(signals[0].id(), SignalId(3));
    }

    #[test]
    fn reject_malformed_signals() {
        let error = |signals: &[Signal]| Signal::sorted_by_mz(signals).unwrap_err().to_string();

        assert_snapshot!(error(&[]), @"no signals were supplied for annotation");
        assert_snapshot!(
            error(&[Signal::new(1, 100.0), Signal::new(2, 200.0), Signal::new(1, 300.0)]),
            @"the signal id 1 appears more than once in the clique"
        );
        assert_snapshot!(
            error(&[Signal::new(1, 100.0), Signal::new(2, -4.5)]),
            @"the signal 2 has an m/z of -4.5, but a finite, positive m/z was expected"
        );
        assert_snapshot!(
            error(&[Signal::new(5, f64::NAN)]),
            @"the signal 5 has an m/z of NaN, but a finite, positive m/z was expected"
        );
    }
}
