//! Annotates co-eluting mass-spectrometry signals with the adducts and neutral masses that best explain them

pub mod adducts;
mod annotator;
mod candidates;
mod clique_annotation;
mod clique_annotator;
mod components;
mod dedup;
pub mod errors;
mod groups;
mod mass_key;
mod parameters;
mod ranking;
mod signal;
mod tolerance;
mod top_masses;

// Standard Library Imports
use std::collections::{BTreeMap, BTreeSet};

// External Crate Imports
use ahash::HashMap;
use derive_more::{Display, From, Into};
use serde::Serialize;

pub use adducts::adduct_database::{DEFAULT_NEGATIVE_KDL, DEFAULT_POSITIVE_KDL};
pub use clique_annotator::annotate_clique;
pub use errors::{AnnotationError, Result};

// Public API ==========================================================================================================

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, From, Into, Serialize)]
pub struct SignalId(u32);

// NOTE: A `charge` of `0` means that no isotope pattern was found for this signal, so its charge is unknown
#[derive(Copy, Clone, PartialEq, Debug, Serialize)]
pub struct Signal {
    id: SignalId,
    mz: f64,
    charge: u32,
}

/// An ionised form of one or more neutral molecules, observed at `(num_mol * mass + added_mass) / |charge|`
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Adduct {
    name: String,
    charge: i32,
    num_mol: u32,
    added_mass: f64,
    log10_frequency: f64,
}

/// The adducts that signals may be explained by, each scored by how often it's observed
#[derive(Clone, PartialEq, Debug)]
pub struct AdductTable {
    adducts: Vec<Adduct>,
    index: HashMap<String, AdductId>,
    // NOTE: Sorted from the most to the least frequent adduct
    ranked_scores: Vec<f64>,
}

/// An m/z tolerance that's the larger of an absolute tolerance (in Daltons) and a relative one (in ppm)
#[derive(Copy, Clone, PartialEq, Debug, Serialize)]
pub struct MzTolerance {
    absolute: f64,
    ppm: f64,
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize)]
pub struct AnnotationParameters {
    pub mz_tolerance: MzTolerance,
    /// The relative difference below which two candidate masses may be merged
    pub filter_tolerance: f64,
    pub top_masses_per_signal: usize,
    pub top_masses_per_group: usize,
    /// Groups with more signals than this are split into smaller components before being annotated
    pub split_group_size: usize,
    /// The score given to each signal left unexplained
    pub empty_score: f64,
    /// Rescale annotation scores from raw log-frequencies to 0–100
    pub normalize_scores: bool,
}

#[derive(Copy, Clone, Debug)]
pub struct CliqueAnnotator<'t> {
    adducts: &'t AdductTable,
    parameters: AnnotationParameters,
}

/// Up to five ranked annotations for each signal of a clique
#[derive(Clone, PartialEq, Debug, Default, Serialize)]
pub struct CliqueAnnotation(BTreeMap<SignalId, Vec<RankedAnnotation>>);

#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct RankedAnnotation {
    adduct: Option<String>,
    neutral_mass: Option<f64>,
    score: f64,
}

// Private Types =======================================================================================================

// NOTE: Adducts are referred to by their position in the `AdductTable`, which is stable for the lifetime of the table
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
struct AdductId(usize);

// NOTE: Neutral masses rounded to the nearest milli-Dalton, so that they can be used as exact keys
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
struct MassKey(i64);

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
struct Support {
    signal: SignalId,
    adduct: AdductId,
}

#[derive(Clone, Eq, PartialEq, Debug, Default)]
struct CandidateMasses {
    masses: BTreeMap<MassKey, Vec<Support>>,
    signal_masses: BTreeMap<SignalId, Vec<MassKey>>,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
struct GroupId(usize);

#[derive(Clone, Eq, PartialEq, Debug)]
struct AnnotationGroup {
    id: GroupId,
    signals: BTreeSet<SignalId>,
    masses: BTreeSet<MassKey>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default)]
struct Component {
    signals: BTreeSet<SignalId>,
    masses: BTreeSet<MassKey>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
struct Explanation {
    mass: MassKey,
    adduct: AdductId,
}

// NOTE: A `None` explanation is the "empty" annotation of a signal that no accepted mass could account for
#[derive(Clone, PartialEq, Debug, Default)]
struct Annotation {
    assignments: BTreeMap<SignalId, Option<Explanation>>,
    score: f64,
}
