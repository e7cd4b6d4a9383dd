// Standard Library Imports
use std::fmt::{self, Display, Formatter};

// Local Crate Imports
use crate::{AdductTable, Annotation, CliqueAnnotation, Explanation, RankedAnnotation, SignalId};

// Public API ==========================================================================================================

impl CliqueAnnotation {
    /// The ranked annotations of a signal, best first; empty for signals that weren't part of the clique
    #[must_use]
    pub fn get(&self, signal: SignalId) -> &[RankedAnnotation] {
        self.0.get(&signal).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn best(&self, signal: SignalId) -> Option<&RankedAnnotation> {
        self.get(signal).first()
    }

    /// Every annotated signal, in ascending order of id
    pub fn iter(&self) -> impl Iterator<Item = (SignalId, &[RankedAnnotation])> {
        self.0.iter().map(|(&signal, ranked)| (signal, ranked.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl RankedAnnotation {
    /// The name of the adduct explaining this signal, or `None` if no neutral mass could explain it
    #[must_use]
    pub fn adduct(&self) -> Option<&str> {
        self.adduct.as_deref()
    }

    #[must_use]
    pub const fn neutral_mass(&self) -> Option<f64> {
        self.neutral_mass
    }

    /// The score of the whole annotation this signal was part of, shared by every signal in it
    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub const fn is_explained(&self) -> bool {
        self.neutral_mass.is_some()
    }
}

impl Display for RankedAnnotation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (&self.adduct, self.neutral_mass) {
            (Some(adduct), Some(mass)) => write!(f, "{adduct} of {mass:.3}")?,
            _ => write!(f, "unexplained")?,
        }
        write!(f, " ({})", self.score)
    }
}

// Crate API ===========================================================================================================

impl CliqueAnnotation {
    /// Appends the next rank of annotation to every signal covered by `annotations`
    pub(crate) fn record(&mut self, annotations: &[Annotation], adducts: &AdductTable) {
        for annotation in annotations {
            let score = annotation.score;
            for (&signal, explanation) in &annotation.assignments {
                let ranked = match *explanation {
                    Some(Explanation { mass, adduct }) => RankedAnnotation {
                        adduct: Some(adducts.adduct(adduct).name().to_owned()),
                        neutral_mass: Some(mass.mass()),
                        score,
                    },
                    None => RankedAnnotation {
                        adduct: None,
                        neutral_mass: None,
                        score,
                    },
                };
                self.0.entry(signal).or_default().push(ranked);
            }
        }
    }
}

// Module Tests ========================================================================================================
