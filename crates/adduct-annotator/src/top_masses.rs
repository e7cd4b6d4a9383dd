// Standard Library Imports
use std::collections::BTreeSet;

// Local Crate Imports
use crate::{AdductTable, AnnotationGroup, AnnotationParameters, CandidateMasses, MassKey, SignalId};

// Crate API ===========================================================================================================

impl AnnotationGroup {
    /// Bounds the masses worth annotating with: the best `top_masses_per_group` masses of the group overall, plus the
    /// best `top_masses_per_signal` masses of each individual signal
    pub(crate) fn select_top_masses(
        &self,
        candidates: &CandidateMasses,
        adducts: &AdductTable,
        parameters: &AnnotationParameters,
    ) -> BTreeSet<MassKey> {
        let mut scored: Vec<_> = self
            .masses
            .iter()
            .map(|&mass| (self.mass_score(mass, candidates, adducts, parameters.empty_score), mass))
            .collect();
        scored.sort_by(|(s1, m1), (s2, m2)| s2.total_cmp(s1).then(m1.cmp(m2)));
        let ranked: Vec<_> = scored.into_iter().map(|(_, mass)| mass).collect();

        let mut selected: BTreeSet<_> = ranked
            .iter()
            .copied()
            .take(parameters.top_masses_per_group)
            .collect();
        for &signal in &self.signals {
            let explains_signal = |&mass: &MassKey| supports(candidates, mass, signal);
            selected.extend(
                ranked
                    .iter()
                    .copied()
                    .filter(explains_signal)
                    .take(parameters.top_masses_per_signal),
            );
        }

        selected
    }

    /// The log-frequency of every adduct explaining the mass, with each signal of the group it leaves unexplained
    /// costing `empty_score`
    pub(crate) fn mass_score(
        &self,
        mass: MassKey,
        candidates: &CandidateMasses,
        adducts: &AdductTable,
        empty_score: f64,
    ) -> f64 {
        let support = candidates.support(mass);
        let explained: f64 = support.iter().map(|s| adducts.score(s.adduct)).sum();
        let unexplained = self.len().saturating_sub(support.len());

        #[allow(clippy::cast_precision_loss)]
        let empty_penalty = empty_score * unexplained as f64;
        explained + empty_penalty
    }
}

// Private Helper Functions ============================================================================================

fn supports(candidates: &CandidateMasses, mass: MassKey, signal: SignalId) -> bool {
    candidates
        .support(mass)
        .binary_search_by_key(&signal, |s| s.signal)
        .is_ok()
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;

    use crate::{Adduct, AdductId, GroupId, Support};

    use super::*;

    const H: usize = 0;
    const NA: usize = 1;
    const K: usize = 2;

    fn adducts() -> AdductTable {
        AdductTable::new([
            Adduct::new("[M+H]+", 1, 1, 1.007_276, 0.5_f64.log10()),
            Adduct::new("[M+Na]+", 1, 1, 22.989_218, 0.1_f64.log10()),
            Adduct::new("[M+K]+", 1, 1, 38.963_158, 0.01_f64.log10()),
        ])
        .unwrap()
    }

    fn candidates(masses: &[(i64, &[(u32, usize)])]) -> (CandidateMasses, AnnotationGroup) {
        let mut candidates = CandidateMasses::default();
        for &(key, pairs) in masses {
            let support = pairs
                .iter()
                .map(|&(signal, adduct)| Support {
                    signal: SignalId(signal),
                    adduct: AdductId(adduct),
                })
                .collect();
            candidates.insert(MassKey(key), support);
        }

        let group = AnnotationGroup {
            id: GroupId(0),
            signals: (1..=4).map(SignalId).collect(),
            masses: masses.iter().map(|&(key, _)| MassKey(key)).collect(),
        };
        (candidates, group)
    }

    fn parameters(per_signal: usize, per_group: usize) -> AnnotationParameters {
        AnnotationParameters {
            top_masses_per_signal: per_signal,
            top_masses_per_group: per_group,
            ..AnnotationParameters::default()
        }
    }

    fn keys(masses: &BTreeSet<MassKey>) -> Vec<i64> {
        masses.iter().map(|&MassKey(key)| key).collect()
    }

    const MASSES: [(i64, &[(u32, usize)]); 4] = [
        (100_000, &[(1, H), (2, NA)]),
        (200_000, &[(2, H), (3, H), (4, H)]),
        (300_000, &[(3, K), (4, K)]),
        (400_000, &[(1, K), (4, NA)]),
    ];

    #[test]
    fn score_masses() {
        let (candidates, group) = candidates(&MASSES);
        let table = adducts();
        let score = |key| group.mass_score(MassKey(key), &candidates, &table, -6.0);

        assert_float_absolute_eq!(score(100_000), -13.301_03);
        assert_float_absolute_eq!(score(200_000), -6.903_09);
        assert_float_absolute_eq!(score(300_000), -16.0);
        assert_float_absolute_eq!(score(400_000), -15.0);
    }

    #[test]
    fn explaining_more_signals_scores_higher() {
        let (candidates, group) = candidates(&[
            (100_000, &[(1, K), (2, K)]),
            (200_000, &[(1, K), (2, K), (3, K)]),
        ]);
        let table = adducts();
        let score = |key| group.mass_score(MassKey(key), &candidates, &table, -6.0);

        assert!(score(200_000) > score(100_000));
    }

    #[test]
    fn select_top_masses_per_group_and_signal() {
        let (candidates, group) = candidates(&MASSES);
        let table = adducts();
        let select = |per_signal, per_group| {
            keys(&group.select_top_masses(&candidates, &table, &parameters(per_signal, per_group)))
        };

        // Signal 1 isn't explained by the best mass of the group, so its own best mass is added
        assert_eq!(select(1, 1), [100_000, 200_000]);
        assert_eq!(select(1, 3), [100_000, 200_000, 400_000]);
        // Signal 4 is explained by every mass but 100_000, and signal 3 by 200_000 and 300_000
        assert_eq!(select(2, 1), [100_000, 200_000, 300_000, 400_000]);
        assert_eq!(select(1, 10), [100_000, 200_000, 300_000, 400_000]);
    }

    #[test]
    fn ties_prefer_lighter_masses() {
        let (candidates, group) = candidates(&[
            (600_000, &[(1, H), (2, H)]),
            (500_000, &[(1, H), (2, H)]),
            (700_000, &[(3, H), (4, H)]),
        ]);
        let selected = group.select_top_masses(&candidates, &adducts(), &parameters(1, 1));
        assert_eq!(keys(&selected), [500_000, 700_000]);
    }
}
