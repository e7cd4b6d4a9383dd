// External Crate Imports
use knus::Decode;
use miette::Result;

// Local Crate Imports
use crate::{AnnotationError, AnnotationParameters, MzTolerance};

// Public API ==========================================================================================================

impl AnnotationParameters {
    /// Loads parameters from KDL text, falling back to the defaults for anything left unspecified:
    ///
    /// ```kdl
    /// tolerance ppm=5.0 absolute=0.001
    /// filter 0.0001
    /// masses per-signal=1 per-group=10
    /// split 20
    /// empty -6.0
    /// normalize true
    /// ```
    ///
    /// # Errors
    ///
    /// Fails if the KDL can't be parsed, or if the resulting parameters are invalid
    pub fn from_kdl(file_name: impl AsRef<str>, kdl_text: impl AsRef<str>) -> Result<Self> {
        let parsed: AnnotationParametersKdl = knus::parse(file_name.as_ref(), kdl_text.as_ref())?;
        let parameters = Self::from(parsed);
        parameters.validate()?;
        Ok(parameters)
    }
}

impl Default for AnnotationParameters {
    fn default() -> Self {
        Self {
            mz_tolerance: MzTolerance::default(),
            filter_tolerance: 1e-4,
            top_masses_per_signal: 1,
            top_masses_per_group: 10,
            split_group_size: 20,
            empty_score: -6.0,
            normalize_scores: true,
        }
    }
}

// Crate API ===========================================================================================================

impl AnnotationParameters {
    pub(crate) fn validate(&self) -> crate::Result<()> {
        self.mz_tolerance.validate()?;

        if !self.filter_tolerance.is_finite() || self.filter_tolerance <= 0.0 {
            return Err(AnnotationError::InvalidFilterTolerance(self.filter_tolerance));
        }

        if self.top_masses_per_signal == 0 {
            return Err(AnnotationError::InvalidTopMassLimit("signal"));
        }

        if self.top_masses_per_group == 0 {
            return Err(AnnotationError::InvalidTopMassLimit("group"));
        }

        Ok(())
    }
}

// KDL File Schema =====================================================================================================

#[derive(Debug, Decode)]
struct AnnotationParametersKdl {
    #[knus(child)]
    tolerance: Option<ToleranceKdl>,
    #[knus(child, unwrap(argument))]
    filter: Option<f64>,
    #[knus(child)]
    masses: Option<TopMassesKdl>,
    #[knus(child, unwrap(argument))]
    split: Option<u32>,
    #[knus(child, unwrap(argument))]
    empty: Option<f64>,
    #[knus(child, unwrap(argument))]
    normalize: Option<bool>,
}

#[derive(Debug, Decode)]
struct ToleranceKdl {
    #[knus(property(name = "absolute"))]
    absolute: Option<f64>,
    #[knus(property(name = "ppm"))]
    ppm: Option<f64>,
}

#[derive(Debug, Decode)]
struct TopMassesKdl {
    #[knus(property(name = "per-signal"))]
    per_signal: Option<u32>,
    #[knus(property(name = "per-group"))]
    per_group: Option<u32>,
}

// Infallible Conversions ==============================================================================================

impl From<AnnotationParametersKdl> for AnnotationParameters {
    fn from(value: AnnotationParametersKdl) -> Self {
        let defaults = Self::default();
        let mz_tolerance = value.tolerance.map_or(defaults.mz_tolerance, |t| {
            MzTolerance::new(t.absolute.unwrap_or(0.0), t.ppm.unwrap_or(0.0))
        });
        let (per_signal, per_group) = value
            .masses
            .map_or((None, None), |m| (m.per_signal, m.per_group));

        Self {
            mz_tolerance,
            filter_tolerance: value.filter.unwrap_or(defaults.filter_tolerance),
            top_masses_per_signal: per_signal.map_or(defaults.top_masses_per_signal, widen),
            top_masses_per_group: per_group.map_or(defaults.top_masses_per_group, widen),
            split_group_size: value.split.map_or(defaults.split_group_size, widen),
            empty_score: value.empty.unwrap_or(defaults.empty_score),
            normalize_scores: value.normalize.unwrap_or(defaults.normalize_scores),
        }
    }
}

fn widen(count: u32) -> usize {
    usize::try_from(count).unwrap_or(usize::MAX)
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use indoc::indoc;
    use insta::assert_snapshot;

    use super::*;

    const KDL: &str = include_str!("../tests/data/parameters.kdl");

    fn error(kdl: &str) -> String {
        let report = AnnotationParameters::from_kdl("test", kdl).unwrap_err();
        report.downcast_ref::<AnnotationError>().unwrap().to_string()
    }

    #[test]
    fn default_parameters() {
        let parameters = AnnotationParameters::default();
        assert_eq!(parameters.mz_tolerance, MzTolerance::from_ppm(10.0));
        assert_float_absolute_eq!(parameters.filter_tolerance, 1e-4);
        assert_eq!(parameters.top_masses_per_signal, 1);
        assert_eq!(parameters.top_masses_per_group, 10);
        assert_eq!(parameters.split_group_size, 20);
        assert_float_absolute_eq!(parameters.empty_score, -6.0);
        assert!(parameters.normalize_scores);
        assert!(parameters.validate().is_ok());
    }

    #[test]
    fn load_parameters_from_file() {
        let parameters = AnnotationParameters::from_kdl("parameters.kdl", KDL).unwrap();
        assert_eq!(parameters.mz_tolerance, MzTolerance::new(0.001, 5.0));
        assert_float_absolute_eq!(parameters.filter_tolerance, 2e-4);
        assert_eq!(parameters.top_masses_per_signal, 2);
        assert_eq!(parameters.top_masses_per_group, 15);
        assert_eq!(parameters.split_group_size, 12);
        assert_float_absolute_eq!(parameters.empty_score, -8.0);
        assert!(!parameters.normalize_scores);
    }

    #[test]
    fn missing_parameters_use_defaults() {
        assert_eq!(
            AnnotationParameters::from_kdl("empty", "").unwrap(),
            AnnotationParameters::default()
        );

        let kdl = indoc! {"
            tolerance ppm=3.0
            masses per-group=4
        "};
        let parameters = AnnotationParameters::from_kdl("test", kdl).unwrap();
        assert_eq!(
            parameters,
            AnnotationParameters {
                mz_tolerance: MzTolerance::from_ppm(3.0),
                top_masses_per_group: 4,
                ..AnnotationParameters::default()
            }
        );
    }

    #[test]
    fn reject_invalid_parameters() {
        assert_snapshot!(
            error("tolerance absolute=0.0"),
            @"the m/z tolerance of 0 (absolute) and 0 ppm is invalid"
        );
        assert_snapshot!(error("filter 0.0"), @"the mass filter tolerance must be finite and positive, got 0");
        assert_snapshot!(error("filter -0.5"), @"the mass filter tolerance must be finite and positive, got -0.5");
        assert_snapshot!(error("masses per-signal=0"), @"at least one top mass must be kept per signal");
        assert_snapshot!(error("masses per-group=0"), @"at least one top mass must be kept per group");
    }

    #[test]
    fn reject_malformed_kdl() {
        let report = AnnotationParameters::from_kdl("test", "split 2.5").unwrap_err();
        assert!(report.downcast_ref::<AnnotationError>().is_none());

        let report = AnnotationParameters::from_kdl("test", "masses per-signal=-1").unwrap_err();
        assert!(report.downcast_ref::<AnnotationError>().is_none());
    }
}
