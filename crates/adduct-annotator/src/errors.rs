use miette::Diagnostic;
use thiserror::Error;

use crate::SignalId;

pub type Result<T, E = AnnotationError> = std::result::Result<T, E>;

// NOTE: Only malformed input ends up here. Chemically impossible candidates are skipped, and signals that can't be
// explained are given an empty annotation instead of an error
#[derive(Debug, Diagnostic, Clone, PartialEq, Error)]
pub enum AnnotationError {
    #[diagnostic(help("a clique must contain at least one signal"))]
    #[error("no signals were supplied for annotation")]
    EmptyClique,

    #[diagnostic(help("signal ids are used to report annotations, so each must be unique within a clique"))]
    #[error("the signal id {0} appears more than once in the clique")]
    DuplicateSignal(SignalId),

    #[error("the signal {id} has an m/z of {mz}, but a finite, positive m/z was expected")]
    InvalidMz { id: SignalId, mz: f64 },

    #[diagnostic(help("adduct names are used as lookup keys, so each must be unique"))]
    #[error("the adduct {0:?} is defined more than once in the adduct table")]
    DuplicateAdduct(String),

    #[diagnostic(help("adducts need a non-zero charge, a non-zero molecule count, and a finite score to be used"))]
    #[error("the adduct table contains no usable adducts")]
    EmptyAdductTable,

    #[error("the adduct {name:?} has a frequency of {frequency}, but a finite, positive frequency was expected")]
    InvalidFrequency { name: String, frequency: f64 },

    #[diagnostic(help("at least one of the tolerances must be positive, and neither may be negative"))]
    #[error("the m/z tolerance of {absolute} (absolute) and {ppm} ppm is invalid")]
    InvalidTolerance { absolute: f64, ppm: f64 },

    #[error("the mass filter tolerance must be finite and positive, got {0}")]
    InvalidFilterTolerance(f64),

    #[error("at least one top mass must be kept per {0}")]
    InvalidTopMassLimit(&'static str),
}

impl AnnotationError {
    pub(crate) fn duplicate_adduct(name: &str) -> Self {
        Self::DuplicateAdduct(name.to_owned())
    }

    pub(crate) fn invalid_frequency(name: &str, frequency: f64) -> Self {
        let name = name.to_owned();

        Self::InvalidFrequency { name, frequency }
    }
}
