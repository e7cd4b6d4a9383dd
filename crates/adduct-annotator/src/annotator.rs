// Standard Library Imports
use std::collections::BTreeSet;

// Local Crate Imports
use crate::{AdductTable, Annotation, CandidateMasses, Component, Explanation, MassKey, SignalId};

/// Every mass beyond the first costs this much, so that simpler explanations are preferred
pub(crate) const NEW_MASS_SCORE: f64 = -10.0;

// Crate API ===========================================================================================================

#[derive(Copy, Clone, Debug)]
pub(crate) struct Annotator<'a> {
    candidates: &'a CandidateMasses,
    adducts: &'a AdductTable,
    empty_score: f64,
}

impl<'a> Annotator<'a> {
    pub(crate) const fn new(candidates: &'a CandidateMasses, adducts: &'a AdductTable, empty_score: f64) -> Self {
        Self {
            candidates,
            adducts,
            empty_score,
        }
    }

    /// Builds one annotation per mass of the component, each time letting that mass explain what it can before the
    /// rest of the signals are resolved greedily
    pub(crate) fn annotate_component(&self, component: &Component) -> Vec<Annotation> {
        let signals = component.signals();
        let masses = component.masses();

        if masses.is_empty() {
            let mut annotation = Annotation::default();
            self.resolve(&mut annotation, signals.clone(), BTreeSet::new());
            return vec![annotation];
        }

        masses
            .iter()
            .map(|&anchor| {
                let mut annotation = Annotation::default();
                // NOTE: The anchor mass is the first mass, so it isn't charged `NEW_MASS_SCORE`
                let leftover = self.explain(&mut annotation, anchor, signals);
                let mut remaining = masses.clone();
                remaining.remove(&anchor);
                self.resolve(&mut annotation, leftover, remaining);
                annotation
            })
            .collect()
    }
}

// Private Methods =====================================================================================================

impl Annotator<'_> {
    // NOTE: Every pass either explains two or more signals with a new mass, or finishes, so `leftover` strictly
    // shrinks and the loop always terminates
    fn resolve(&self, annotation: &mut Annotation, mut leftover: BTreeSet<SignalId>, mut masses: BTreeSet<MassKey>) {
        loop {
            if leftover.len() < 2 {
                self.leave_empty(annotation, &leftover);
                return;
            }

            let Some(best) = self.best_mass(&leftover, &masses) else {
                self.leave_empty(annotation, &leftover);
                return;
            };

            masses.remove(&best);
            leftover = self.explain(annotation, best, &leftover);
            annotation.score += NEW_MASS_SCORE;
        }
    }

    // Ties go to the lightest mass
    fn best_mass(&self, signals: &BTreeSet<SignalId>, masses: &BTreeSet<MassKey>) -> Option<MassKey> {
        let mut best: Option<(f64, MassKey)> = None;
        for &mass in masses {
            let (explained, score) = self
                .explanations(mass, signals)
                .fold((0, 0.0), |(n, total), (_, adduct_score)| (n + 1, total + adduct_score));

            if explained >= 2 && best.is_none_or(|(best_score, _)| score > best_score) {
                best = Some((score, mass));
            }
        }
        best.map(|(_, mass)| mass)
    }

    fn explanations<'s>(
        &'s self,
        mass: MassKey,
        signals: &'s BTreeSet<SignalId>,
    ) -> impl Iterator<Item = ((SignalId, Explanation), f64)> + 's {
        self.candidates
            .support(mass)
            .iter()
            .filter(|s| signals.contains(&s.signal))
            .map(move |s| {
                let explanation = Explanation {
                    mass,
                    adduct: s.adduct,
                };
                ((s.signal, explanation), self.adducts.score(s.adduct))
            })
    }

    /// Assigns `mass` to every signal it explains, returning the signals it couldn't explain
    fn explain(&self, annotation: &mut Annotation, mass: MassKey, signals: &BTreeSet<SignalId>) -> BTreeSet<SignalId> {
        let mut leftover = signals.clone();
        for ((signal, explanation), score) in self.explanations(mass, signals) {
            leftover.remove(&signal);
            annotation.assignments.insert(signal, Some(explanation));
            annotation.score += score;
        }
        leftover
    }

    fn leave_empty(&self, annotation: &mut Annotation, signals: &BTreeSet<SignalId>) {
        for &signal in signals {
            annotation.assignments.insert(signal, None);
            annotation.score += self.empty_score;
        }
    }
}

// Module Tests ========================================================================================================
