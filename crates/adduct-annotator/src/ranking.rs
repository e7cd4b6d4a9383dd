// Standard Library Imports
use std::collections::BTreeMap;

// Local Crate Imports
use crate::{AdductTable, Annotation, annotator::NEW_MASS_SCORE};

pub(crate) const MAX_RANKED_ANNOTATIONS: usize = 5;

// NOTE: The worst-case score assumes a new mass would be needed for every eight signals
const SIGNALS_PER_NEW_MASS: f64 = 8.0;

// NOTE: The same assignments can be reached in a different order, which may change the last bits of the summed score
const SCORE_EPSILON: f64 = 1e-9;

// Crate API ===========================================================================================================

/// Drops repeated annotations (keeping the first), then keeps the best few in descending order of score
pub(crate) fn rank(annotations: impl IntoIterator<Item = Annotation>) -> Vec<Annotation> {
    let mut unique: Vec<Annotation> = Vec::new();
    for annotation in annotations {
        if !unique.iter().any(|kept| kept.repeats(&annotation)) {
            unique.push(annotation);
        }
    }

    // NOTE: `sort_by` is stable, so equally scored annotations keep the order they were found in
    unique.sort_by(|a, b| b.score.total_cmp(&a.score));
    unique.truncate(MAX_RANKED_ANNOTATIONS);
    unique
}

/// Rescales annotation scores to 0–100, where 100 is the best score possible for that many signals
#[derive(Clone, Debug)]
pub(crate) struct ScoreBounds<'t> {
    ranked_scores: &'t [f64],
    empty_score: f64,
    cache: BTreeMap<usize, (f64, f64)>,
}

impl<'t> ScoreBounds<'t> {
    pub(crate) fn new(adducts: &'t AdductTable, empty_score: f64) -> Self {
        Self {
            ranked_scores: adducts.ranked_scores(),
            empty_score,
            cache: BTreeMap::new(),
        }
    }

    pub(crate) fn normalize(&mut self, score: f64, signals: usize) -> f64 {
        let (min, max) = self.bounds(signals);
        let range = max - min;
        if !range.is_finite() || range <= 0.0 {
            return 0.0;
        }

        let normalized = (100.0 * (score - min) / range).clamp(0.0, 100.0);
        (normalized * 10_000.0).round() / 10_000.0
    }
}

// Private Methods =====================================================================================================

impl Annotation {
    fn repeats(&self, other: &Self) -> bool {
        (self.score - other.score).abs() <= SCORE_EPSILON && self.assignments == other.assignments
    }
}

impl ScoreBounds<'_> {
    fn bounds(&mut self, signals: usize) -> (f64, f64) {
        let (ranked_scores, empty_score) = (self.ranked_scores, self.empty_score);
        *self
            .cache
            .entry(signals)
            .or_insert_with(|| (min_score(signals, empty_score), max_score(signals, ranked_scores)))
    }
}

// Private Helper Functions ============================================================================================

// The score of explaining every signal with the most frequent adducts, cycling through them all (and so needing a new
// mass) before any adduct is reused
#[allow(clippy::cast_precision_loss)]
fn max_score(signals: usize, ranked_scores: &[f64]) -> f64 {
    let rounds = signals / ranked_scores.len();
    let remainder = signals % ranked_scores.len();

    let full_round: f64 = ranked_scores.iter().sum::<f64>() + NEW_MASS_SCORE;
    let partial_round: f64 = ranked_scores[..remainder].iter().sum();
    (rounds as f64).mul_add(full_round, partial_round)
}

// The score of leaving every signal unexplained
#[allow(clippy::cast_precision_loss)]
fn min_score(signals: usize, empty_score: f64) -> f64 {
    let signals = signals as f64;
    signals.mul_add(empty_score, NEW_MASS_SCORE * signals / SIGNALS_PER_NEW_MASS)
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use assert_float_eq::assert_float_absolute_eq;

    use crate::{Adduct, AdductId, Explanation, MassKey, SignalId};

    use super::*;

    fn adducts() -> AdductTable {
        AdductTable::new([
            Adduct::new("[M+Na]+", 1, 1, 22.989_218, -1.0),
            Adduct::new("[M+H]+", 1, 1, 1.007_276, -0.25),
            Adduct::new("[M+K]+", 1, 1, 38.963_158, -1.5),
        ])
        .unwrap()
    }

    fn annotation(mass: i64, score: f64) -> Annotation {
        let assignments = BTreeMap::from([
            (
                SignalId(1),
                Some(Explanation {
                    mass: MassKey(mass),
                    adduct: AdductId(0),
                }),
            ),
            (SignalId(2), None),
        ]);
        Annotation { assignments, score }
    }

    fn scores(annotations: &[Annotation]) -> Vec<f64> {
        annotations.iter().map(|a| a.score).collect()
    }

    #[test]
    fn rank_best_annotations() {
        let ranked = rank([-9.0, -3.0, -7.0, -1.0, -8.0, -2.0, -4.0].map(|score| annotation(100_000, score)));
        assert_eq!(scores(&ranked), [-1.0, -2.0, -3.0, -4.0, -7.0]);

        let ranked = rank([annotation(100_000, -1.0)]);
        assert_eq!(scores(&ranked), [-1.0]);
        assert!(rank([]).is_empty());
    }

    #[test]
    fn drop_repeated_annotations() {
        let ranked = rank([
            annotation(300_000, -5.0),
            annotation(100_000, -2.0),
            // Same score, different annotation
            annotation(200_000, -2.0),
            // A repeat, up to floating-point noise
            annotation(100_000, -2.0 + 1e-12),
            // Same annotation, different score
            annotation(100_000, -4.0),
        ]);

        let masses: Vec<_> = ranked
            .iter()
            .map(|a| a.assignments[&SignalId(1)].map(|e| e.mass))
            .collect();
        assert_eq!(
            masses,
            [100_000, 200_000, 100_000, 300_000].map(|m| Some(MassKey(m)))
        );
        assert_eq!(scores(&ranked), [-2.0, -2.0, -4.0, -5.0]);
    }

    #[test]
    fn score_bounds() {
        let table = adducts();
        // One full round of adducts plus one new mass, then the most common adduct again
        assert_float_absolute_eq!(max_score(4, table.ranked_scores()), -13.0);
        assert_float_absolute_eq!(max_score(2, table.ranked_scores()), -1.25);
        assert_float_absolute_eq!(max_score(7, table.ranked_scores()), -25.75);
        assert_float_absolute_eq!(min_score(4, -6.0), -29.0);
        assert_float_absolute_eq!(min_score(2, -6.0), -14.5);
    }

    #[test]
    fn normalize_scores() {
        let table = adducts();
        let mut bounds = ScoreBounds::new(&table, -6.0);

        assert_float_absolute_eq!(bounds.normalize(-13.0, 4), 100.0);
        assert_float_absolute_eq!(bounds.normalize(-21.0, 4), 50.0);
        assert_float_absolute_eq!(bounds.normalize(-29.0, 4), 0.0);
        // Scores outside of the bounds are clamped
        assert_float_absolute_eq!(bounds.normalize(-30.0, 4), 0.0);
        assert_float_absolute_eq!(bounds.normalize(-12.0, 4), 100.0);
        // Rounded to four decimal places
        assert_float_absolute_eq!(bounds.normalize(-13.25, 2), 9.434);
        assert_eq!(bounds.cache.len(), 2);
    }

    #[test]
    fn normalize_lone_signals() {
        let table = adducts();
        let mut bounds = ScoreBounds::new(&table, -6.0);
        // The best a lone signal can do is the most common adduct, but even leaving it empty beats the worst case,
        // which charges a fraction of a new mass on top
        assert_float_absolute_eq!(bounds.normalize(-0.25, 1), 100.0);
        assert_float_absolute_eq!(bounds.normalize(-6.0, 1), 17.857_1);
        assert_float_absolute_eq!(bounds.normalize(-7.25, 1), 0.0);
    }
}
