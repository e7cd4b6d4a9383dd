// Standard Library Imports
use std::slice;

// External Crate Imports
use ahash::{HashMap, HashMapExt, HashSet, HashSetExt};
use tracing::warn;

// Local Crate Imports
use crate::{Adduct, AdductId, AdductTable, AnnotationError, Result};

// Public API ==========================================================================================================

impl AdductTable {
    /// Collects adducts into a table, skipping any that could never explain a signal (those with no charge or no
    /// molecules)
    ///
    /// # Errors
    ///
    /// Fails if two adducts share a name, or if no usable adducts remain
    pub fn new(adducts: impl IntoIterator<Item = Adduct>) -> Result<Self> {
        // NOTE: Skipped adducts still claim their name, so duplicates are caught regardless of usability
        let mut seen_names = HashSet::new();
        let mut index = HashMap::new();
        let mut usable = Vec::new();

        for adduct in adducts {
            if !seen_names.insert(adduct.name().to_owned()) {
                return Err(AnnotationError::duplicate_adduct(adduct.name()));
            }

            if adduct.is_usable() {
                index.insert(adduct.name().to_owned(), AdductId(usable.len()));
                usable.push(adduct);
            } else {
                warn!(adduct = adduct.name(), "skipping an adduct that can't explain any signal");
            }
        }

        if usable.is_empty() {
            return Err(AnnotationError::EmptyAdductTable);
        }

        let mut ranked_scores: Vec<_> = usable.iter().map(Adduct::log10_frequency).collect();
        ranked_scores.sort_by(|a, b| b.total_cmp(a));

        Ok(Self {
            adducts: usable,
            index,
            ranked_scores,
        })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Adduct> {
        self.index.get(name).map(|&id| self.adduct(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.adducts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adducts.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Adduct> {
        self.adducts.iter()
    }
}

impl<'t> IntoIterator for &'t AdductTable {
    type Item = &'t Adduct;
    type IntoIter = slice::Iter<'t, Adduct>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Crate API ===========================================================================================================

impl AdductTable {
    pub(crate) fn adduct(&self, AdductId(id): AdductId) -> &Adduct {
        &self.adducts[id]
    }

    pub(crate) fn score(&self, id: AdductId) -> f64 {
        self.adduct(id).log10_frequency()
    }

    /// Adduct scores, from the most to the least frequent
    pub(crate) fn ranked_scores(&self) -> &[f64] {
        &self.ranked_scores
    }

    pub(crate) fn iter_ids(&self) -> impl Iterator<Item = (AdductId, &Adduct)> {
        self.adducts
            .iter()
            .enumerate()
            .map(|(id, adduct)| (AdductId(id), adduct))
    }
}

// Module Tests ========================================================================================================
