// Standard Library Imports
use std::{cmp::Ordering, collections::BTreeSet, f64::consts::SQRT_2};

// External Crate Imports
use itertools::Itertools;
use tracing::debug;

// Local Crate Imports
use crate::{AnnotationGroup, CandidateMasses, MassKey, Support};

// Crate API ===========================================================================================================

impl AnnotationGroup {
    /// Drops near-identical masses whose evidence is already contained in a neighbouring mass, returning the number
    /// of masses removed
    ///
    /// Of two masses within `filter_tolerance` (relative, scaled by √2) of each other, the one supported by a subset
    /// of the other's (signal, adduct) pairs is redundant. When both are supported by exactly the same pairs, the
    /// lighter mass is kept.
    pub(crate) fn remove_redundant_masses(
        &mut self,
        candidates: &mut CandidateMasses,
        filter_tolerance: f64,
    ) -> usize {
        let tolerance = filter_tolerance * SQRT_2;

        // NOTE: Every pair is judged against the full set of masses, so the order of removal doesn't matter
        let redundant: BTreeSet<_> = self
            .masses
            .iter()
            .copied()
            .tuple_combinations()
            .filter(|&(lighter, heavier)| relative_difference(lighter, heavier) < tolerance)
            .filter_map(|(lighter, heavier)| {
                let (lighter_support, heavier_support) =
                    (candidates.support(lighter), candidates.support(heavier));
                match lighter_support.len().cmp(&heavier_support.len()) {
                    Ordering::Less => is_subset(lighter_support, heavier_support).then_some(lighter),
                    Ordering::Greater => is_subset(heavier_support, lighter_support).then_some(heavier),
                    Ordering::Equal => (lighter_support == heavier_support).then_some(heavier),
                }
            })
            .collect();

        for &mass in &redundant {
            debug!(group = %self.id, %mass, "dropping a redundant mass");
            candidates.remove(mass);
            self.masses.remove(&mass);
        }

        redundant.len()
    }
}

// Private Helper Functions ============================================================================================

fn relative_difference(lighter: MassKey, heavier: MassKey) -> f64 {
    let (lighter, heavier) = (lighter.mass(), heavier.mass());
    (heavier - lighter).abs() / lighter.max(heavier)
}

// NOTE: Support lists are kept sorted, so this is a linear merge rather than a nested search
fn is_subset(smaller: &[Support], larger: &[Support]) -> bool {
    let mut larger = larger.iter();
    smaller.iter().all(|s| larger.any(|l| l == s))
}

// Module Tests ========================================================================================================
