// Standard Library Imports
use std::collections::BTreeSet;

// Local Crate Imports
use crate::{AnnotationGroup, CandidateMasses, Component, GroupId, MassKey, Signal, SignalId};

// Crate API ===========================================================================================================

impl AnnotationGroup {
    /// Groups signals that are linked, directly or transitively, by a shared candidate mass
    ///
    /// Every signal ends up in exactly one group, and signals without candidate masses are left on their own
    pub(crate) fn build_all(signals: &[Signal], candidates: &CandidateMasses) -> Vec<Self> {
        Component::partition(signals.iter().map(Signal::id), candidates, &|_| true)
            .into_iter()
            .enumerate()
            .map(|(id, Component { signals, masses })| Self {
                id: GroupId(id),
                signals,
                masses,
            })
            .collect()
    }

    pub(crate) const fn id(&self) -> GroupId {
        self.id
    }

    pub(crate) const fn signals(&self) -> &BTreeSet<SignalId> {
        &self.signals
    }

    pub(crate) const fn masses(&self) -> &BTreeSet<MassKey> {
        &self.masses
    }

    pub(crate) fn len(&self) -> usize {
        self.signals.len()
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use crate::{AdductId, Support};

    use super::*;

    fn link(candidates: &mut CandidateMasses, key: i64, signals: &[u32]) {
        let support = signals
            .iter()
            .map(|&id| Support {
                signal: SignalId(id),
                adduct: AdductId(0),
            })
            .collect();
        candidates.insert(MassKey(key), support);
    }

    #[test]
    fn every_signal_gets_one_group() {
        let mut candidates = CandidateMasses::default();
        link(&mut candidates, 250_000, &[4, 7]);
        link(&mut candidates, 180_000, &[2, 5]);
        link(&mut candidates, 181_000, &[5, 9]);

        let signals: Vec<_> = [9, 4, 2, 3, 7, 5]
            .into_iter()
            .map(|id| Signal::new(id, 100.0 + f64::from(id)))
            .collect();
        let groups = AnnotationGroup::build_all(&signals, &candidates);

        let summary: Vec<_> = groups
            .iter()
            .map(|g| {
                let signals: Vec<_> = g.signals().iter().map(|&SignalId(id)| id).collect();
                let masses: Vec<_> = g.masses().iter().map(|&MassKey(key)| key).collect();
                (g.id(), signals, masses)
            })
            .collect();
        assert_eq!(
            summary,
            [
                (GroupId(0), vec![2, 5, 9], vec![180_000, 181_000]),
                (GroupId(1), vec![3], vec![]),
                (GroupId(2), vec![4, 7], vec![250_000]),
            ]
        );
        assert_eq!(groups.iter().map(AnnotationGroup::len).sum::<usize>(), signals.len());
    }

    #[test]
    fn lone_signal_forms_a_massless_group() {
        let groups = AnnotationGroup::build_all(&[Signal::new(1, 301.160_1)], &CandidateMasses::default());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id().to_string(), "0");
        assert_eq!(groups[0].len(), 1);
        assert!(groups[0].masses().is_empty());
    }
}
