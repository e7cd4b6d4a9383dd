// External Crate Imports
use tracing::debug;

// Local Crate Imports
use crate::{
    AdductTable, AnnotationGroup, AnnotationParameters, CandidateMasses, CliqueAnnotation, CliqueAnnotator, Component,
    Result, Signal,
    annotator::Annotator,
    ranking::{self, ScoreBounds},
};

// Public API ==========================================================================================================

impl<'t> CliqueAnnotator<'t> {
    /// # Errors
    ///
    /// Fails if the parameters are invalid
    pub fn new(adducts: &'t AdductTable, parameters: AnnotationParameters) -> Result<Self> {
        parameters.validate()?;
        Ok(Self { adducts, parameters })
    }

    #[must_use]
    pub const fn adducts(&self) -> &'t AdductTable {
        self.adducts
    }

    #[must_use]
    pub const fn parameters(&self) -> &AnnotationParameters {
        &self.parameters
    }

    /// Explains a clique of co-eluting signals as adducts of a few neutral masses, ranking up to five alternative
    /// explanations for every signal
    ///
    /// # Errors
    ///
    /// Fails if `signals` is empty, contains duplicate ids, or contains an m/z that isn't finite and positive
    #[tracing::instrument(level = "debug", skip_all, fields(signals = signals.len()))]
    pub fn annotate(&self, signals: &[Signal]) -> Result<CliqueAnnotation> {
        let parameters = &self.parameters;
        let signals = Signal::sorted_by_mz(signals)?;

        let mut candidates = CandidateMasses::generate(&signals, self.adducts, parameters.mz_tolerance);
        let mut groups = AnnotationGroup::build_all(&signals, &candidates);
        debug!(
            candidates = candidates.len(),
            groups = groups.len(),
            "grouped signals by candidate mass"
        );

        for group in &mut groups {
            group.remove_redundant_masses(&mut candidates, parameters.filter_tolerance);
        }

        let annotator = Annotator::new(&candidates, self.adducts, parameters.empty_score);
        let mut bounds = ScoreBounds::new(self.adducts, parameters.empty_score);
        let mut clique_annotation = CliqueAnnotation::default();
        for group in &groups {
            let selected = group.select_top_masses(&candidates, self.adducts, parameters);
            let components =
                Component::split_if_large(group, &selected, &candidates, parameters.split_group_size);
            debug!(
                group = %group.id(),
                signals = group.len(),
                masses = group.masses().len(),
                selected = selected.len(),
                components = components.len(),
                "annotating group"
            );

            for component in &components {
                let mut ranked = ranking::rank(annotator.annotate_component(component));
                if parameters.normalize_scores {
                    for annotation in &mut ranked {
                        annotation.score = bounds.normalize(annotation.score, annotation.assignments.len());
                    }
                }
                clique_annotation.record(&ranked, self.adducts);
            }
        }

        Ok(clique_annotation)
    }
}

/// Annotates a single clique without keeping a [`CliqueAnnotator`] around
///
/// # Errors
///
/// Fails if the parameters or signals are invalid
pub fn annotate_clique(
    signals: &[Signal],
    adducts: &AdductTable,
    parameters: AnnotationParameters,
) -> Result<CliqueAnnotation> {
    CliqueAnnotator::new(adducts, parameters)?.annotate(signals)
}

// Module Tests ========================================================================================================
