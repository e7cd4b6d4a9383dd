// Standard Library Imports
use std::collections::{BTreeSet, VecDeque};

// Local Crate Imports
use crate::{AnnotationGroup, CandidateMasses, Component, MassKey, SignalId};

// Crate API ===========================================================================================================

impl Component {
    /// Every signal reachable from `seed` by hopping between signals that share a candidate mass, only crossing the
    /// masses accepted by `is_edge`
    pub(crate) fn closure(
        seed: SignalId,
        candidates: &CandidateMasses,
        is_edge: &impl Fn(MassKey) -> bool,
    ) -> Self {
        let mut component = Self::default();
        component.signals.insert(seed);

        let mut queue = VecDeque::from([seed]);
        while let Some(signal) = queue.pop_front() {
            for &mass in candidates.masses_of(signal) {
                if !is_edge(mass) || !component.masses.insert(mass) {
                    continue;
                }

                for support in candidates.support(mass) {
                    if component.signals.insert(support.signal) {
                        queue.push_back(support.signal);
                    }
                }
            }
        }

        component
    }

    /// Splits `signals` into disjoint components, seeding each from the lowest signal id not yet visited
    pub(crate) fn partition(
        signals: impl IntoIterator<Item = SignalId>,
        candidates: &CandidateMasses,
        is_edge: &impl Fn(MassKey) -> bool,
    ) -> Vec<Self> {
        let mut unvisited: BTreeSet<_> = signals.into_iter().collect();
        let mut components = Vec::new();

        while let Some(seed) = unvisited.pop_first() {
            let component = Self::closure(seed, candidates, is_edge);
            for signal in &component.signals {
                unvisited.remove(signal);
            }
            components.push(component);
        }

        components
    }

    /// Large groups are broken up along their selected masses, otherwise the whole group is kept as one component
    pub(crate) fn split_if_large(
        group: &AnnotationGroup,
        selected: &BTreeSet<MassKey>,
        candidates: &CandidateMasses,
        size_limit: usize,
    ) -> Vec<Self> {
        if group.len() > size_limit {
            Self::partition(group.signals().iter().copied(), candidates, &|mass| {
                selected.contains(&mass)
            })
        } else {
            vec![Self {
                signals: group.signals().clone(),
                masses: selected.clone(),
            }]
        }
    }

    pub(crate) const fn signals(&self) -> &BTreeSet<SignalId> {
        &self.signals
    }

    pub(crate) const fn masses(&self) -> &BTreeSet<MassKey> {
        &self.masses
    }
}

// Module Tests ========================================================================================================
