// Standard Library Imports
use std::collections::hash_map::Entry;

// External Crate Imports
use ahash::{HashMap, HashMapExt};
use knus::{Decode, span::Span};
use miette::{Diagnostic, LabeledSpan, NamedSource, Result};
use thiserror::Error;

// Local Crate Imports
use crate::{Adduct, AdductTable, AnnotationError};

/// The bundled table of common positive-mode adducts, in the same KDL format accepted by [`AdductTable::from_kdl`]
pub const DEFAULT_POSITIVE_KDL: &str = include_str!("../../data/positive_adducts.kdl");
/// The bundled table of common negative-mode adducts
pub const DEFAULT_NEGATIVE_KDL: &str = include_str!("../../data/negative_adducts.kdl");

// Public API ==========================================================================================================

impl AdductTable {
    /// Loads an adduct table from KDL text, where each adduct is a node like:
    ///
    /// ```kdl
    /// adduct "[M+Na]+" charge=1 molecules=1 mass=22.989218 frequency=0.2
    /// ```
    ///
    /// # Errors
    ///
    /// Fails if the KDL can't be parsed, or if the adducts it describes don't form a valid table
    pub fn from_kdl(file_name: impl AsRef<str>, kdl_text: impl AsRef<str>) -> Result<Self> {
        let parsed_table: AdductTableKdl = knus::parse(file_name.as_ref(), kdl_text.as_ref())?;
        parsed_table
            .validate()
            .map_err(|e| e.finalize(file_name, kdl_text).into())
    }

    #[must_use]
    pub fn positive() -> Self {
        // SAFETY: The bundled table is checked by this module's tests, so loading it can't fail
        Self::from_kdl("positive_adducts.kdl", DEFAULT_POSITIVE_KDL)
            .expect("the bundled positive adduct table is valid")
    }

    #[must_use]
    pub fn negative() -> Self {
        // SAFETY: The bundled table is checked by this module's tests, so loading it can't fail
        Self::from_kdl("negative_adducts.kdl", DEFAULT_NEGATIVE_KDL)
            .expect("the bundled negative adduct table is valid")
    }
}

// KDL File Schema =====================================================================================================

#[derive(Debug, Decode)]
#[knus(span_type=Span)]
struct AdductTableKdl {
    #[knus(children(name = "adduct"))]
    adducts: Vec<AdductKdl>,
}

#[derive(Debug, Decode)]
#[knus(span_type=Span)]
struct AdductKdl {
    #[knus(span)]
    span: Span,
    #[knus(argument)]
    name: String,
    #[knus(property(name = "charge"))]
    charge: i32,
    #[knus(property(name = "molecules"))]
    num_mol: u32,
    #[knus(property(name = "mass"))]
    added_mass: f64,
    #[knus(property(name = "frequency"))]
    frequency: f64,
}

// Adduct Table Validation =============================================================================================

impl AdductTableKdl {
    fn validate(self) -> Result<AdductTable, ValidationErrorKind> {
        let mut seen_names = HashMap::new();
        let mut adducts = Vec::with_capacity(self.adducts.len());

        for adduct in self.adducts {
            match seen_names.entry(adduct.name.clone()) {
                Entry::Occupied(e) => {
                    let (name, first_defined_at) = e.remove_entry();
                    return Err(ValidationErrorKind::Duplicate(
                        first_defined_at,
                        adduct.span,
                        AnnotationError::DuplicateAdduct(name),
                    ));
                }
                Entry::Vacant(e) => e.insert(adduct.span),
            };

            adducts.push(adduct.validate()?);
        }

        AdductTable::new(adducts).map_err(ValidationErrorKind::Table)
    }
}

impl AdductKdl {
    fn validate(self) -> Result<Adduct, ValidationErrorKind> {
        let Self {
            span,
            name,
            charge,
            num_mol,
            added_mass,
            frequency,
        } = self;

        Adduct::from_frequency(name, charge, num_mol, added_mass, frequency)
            .map_err(|e| ValidationErrorKind::Adduct(span, e))
    }
}

// Validation Error Types and Trait Implementations  ===================================================================

#[derive(Debug, Error)]
#[error("failed to validate adduct table file")]
struct ValidationError {
    kdl: NamedSource<String>,
    #[source]
    kind: ValidationErrorKind,
}

// NOTE: This is manually implemented because the labels depend on which kind of error occurred
impl Diagnostic for ValidationError {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.kdl)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(self.kind.labels().into_iter().map(|(s, l)| {
            LabeledSpan::new_with_span(Some(l.to_owned()), *s)
        })))
    }

    fn diagnostic_source(&self) -> Option<&dyn Diagnostic> {
        Some(&self.kind)
    }
}

#[derive(Clone, Debug, Diagnostic, Error)]
enum ValidationErrorKind {
    #[error("{2}")]
    #[diagnostic(help("double-check for typos, or remove the duplicate adduct"))]
    Duplicate(Span, Span, AnnotationError),

    #[error("{1}")]
    #[diagnostic(help("frequencies are relative, so any positive value is allowed"))]
    Adduct(Span, AnnotationError),

    #[error("{0}")]
    #[diagnostic(help("adducts need a non-zero charge and at least one molecule to explain a signal"))]
    Table(AnnotationError),
}

impl ValidationErrorKind {
    fn labels(&self) -> Vec<(&Span, &'static str)> {
        match self {
            Self::Duplicate(s1, s2, _) => vec![(s1, "first defined here"), (s2, "then again here")],
            Self::Adduct(s, _) => vec![(s, "invalid adduct")],
            Self::Table(_) => Vec::new(),
        }
    }

    fn finalize(self, file_name: impl AsRef<str>, kdl: impl AsRef<str>) -> ValidationError {
        let kdl = NamedSource::new(file_name, kdl.as_ref().to_owned());
        ValidationError { kdl, kind: self }
    }
}

// Module Tests ========================================================================================================
