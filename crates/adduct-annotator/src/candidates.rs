// Standard Library Imports
use std::{
    collections::{BTreeMap, btree_map::Entry},
    f64::consts::SQRT_2,
};

// External Crate Imports
use ahash::{HashSet, HashSetExt};
use tracing::trace;

// Local Crate Imports
use crate::{AdductId, AdductTable, CandidateMasses, MassKey, MzTolerance, Signal, SignalId, Support};

// NOTE: The outermost adduct offsets are widened by this fraction of their magnitude when bounding the search window
const WINDOW_MARGIN: f64 = 0.1;

// Crate API ===========================================================================================================

impl CandidateMasses {
    /// Infers a neutral mass from every signal and adduct, keeping the masses that explain two or more signals
    ///
    /// `signals` must already be sorted by m/z
    pub(crate) fn generate(signals: &[Signal], adducts: &AdductTable, tolerance: MzTolerance) -> Self {
        let search = CandidateSearch {
            signals,
            adducts,
            tolerance: tolerance.scaled(SQRT_2),
        };

        let mut candidates = Self::default();
        let mut examined = HashSet::new();
        for signal in signals {
            let eligible_masses = adducts
                .iter()
                .filter(|adduct| adduct.accepts_charge(signal.isotope_charge()))
                .filter_map(|adduct| adduct.neutral_mass(signal.mz()));

            for mass in eligible_masses {
                let key = MassKey::from_mass(mass);
                if !examined.insert(key) {
                    continue;
                }

                let support = search.find_support(key.mass());
                if support.len() > 1 {
                    trace!(mass = %key, support = support.len(), "found a candidate mass");
                    candidates.insert(key, support);
                }
            }
        }

        candidates
    }

    pub(crate) fn insert(&mut self, key: MassKey, support: Vec<Support>) {
        for &Support { signal, .. } in &support {
            let masses = self.signal_masses.entry(signal).or_default();
            if let Err(index) = masses.binary_search(&key) {
                masses.insert(index, key);
            }
        }
        self.masses.insert(key, support);
    }

    /// Drops a mass from the table and from the candidate list of every signal it explained
    pub(crate) fn remove(&mut self, key: MassKey) -> Option<Vec<Support>> {
        let support = self.masses.remove(&key)?;
        for Support { signal, .. } in &support {
            if let Entry::Occupied(mut e) = self.signal_masses.entry(*signal) {
                e.get_mut().retain(|&k| k != key);
                if e.get().is_empty() {
                    e.remove();
                }
            }
        }
        Some(support)
    }

    /// The signals supporting a mass, in ascending order of signal id
    pub(crate) fn support(&self, key: MassKey) -> &[Support] {
        self.masses.get(&key).map_or(&[], Vec::as_slice)
    }

    /// The candidate masses of a signal, in ascending order
    pub(crate) fn masses_of(&self, signal: SignalId) -> &[MassKey] {
        self.signal_masses.get(&signal).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn len(&self) -> usize {
        self.masses.len()
    }
}

// Private Types =======================================================================================================

#[derive(Copy, Clone, Debug)]
struct CandidateSearch<'s> {
    signals: &'s [Signal],
    adducts: &'s AdductTable,
    tolerance: MzTolerance,
}

// Private Methods =====================================================================================================

impl CandidateSearch<'_> {
    fn find_support(&self, mass: f64) -> Vec<Support> {
        // NOTE: A signal matches an adduct when the mass it implies, shifted by that adduct's offset, lands in this
        // window around the candidate mass
        let accepted = self.tolerance.range(mass);
        let tolerance = self.tolerance.tolerance_at(mass);

        // NOTE: The sort is stable, so adducts with the same expected m/z stay in table order
        let mut expected: Vec<_> = self.adducts.iter_ids().map(|(id, a)| (a.mz(mass), id)).collect();
        expected.sort_by(|(a, _), (b, _)| a.total_cmp(b));

        let (Some(&(lowest_mz, _)), Some(&(highest_mz, _))) = (expected.first(), expected.last()) else {
            return Vec::new();
        };
        let widen = |offset: f64, direction: f64| direction.mul_add(offset.abs() * WINDOW_MARGIN, offset);
        let min_mz = mass + widen(lowest_mz - mass, -1.0) - tolerance;
        let max_mz = mass + widen(highest_mz - mass, 1.0) + tolerance;

        let start = self.signals.partition_point(|s| s.mz() < min_mz);
        let end = self.signals.partition_point(|s| s.mz() <= max_mz);

        let mut best_matches: BTreeMap<SignalId, (f64, AdductId)> = BTreeMap::new();
        let mut first_live = 0;
        for signal in &self.signals[start..end] {
            let mz = signal.mz();
            // Signals are visited in ascending m/z, so an adduct left behind by one signal is behind all the rest
            while expected
                .get(first_live)
                .is_some_and(|&(expected_mz, _)| expected_mz + tolerance < mz)
            {
                first_live += 1;
            }

            let live_adducts = expected[first_live..]
                .iter()
                .take_while(|&&(expected_mz, _)| expected_mz - tolerance <= mz);
            for &(expected_mz, id) in live_adducts {
                let shifted_mass = mz - (expected_mz - mass);
                if !accepted.contains(&shifted_mass)
                    || !self.adducts.adduct(id).accepts_charge(signal.isotope_charge())
                {
                    continue;
                }

                let error = (mz - expected_mz).abs();
                best_matches
                    .entry(signal.id())
                    .and_modify(|best| {
                        if (error, id) < *best {
                            *best = (error, id);
                        }
                    })
                    .or_insert((error, id));
            }
        }

        best_matches
            .into_iter()
            .map(|(signal, (_, adduct))| Support { signal, adduct })
            .collect()
    }
}

// Module Tests ========================================================================================================
