use serde::{
    Deserialize,
    Serialize,
};

use crate::errors::LabelquantError;

/// Variable modifications offered for the search, in display order.
pub const VARIABLE_PTM_CATALOG: [&str; 9] = [
    "Oxidation of M",
    "Acetylation of protein N-term",
    "Deamidation of N",
    "Deamidation of Q",
    "Phosphorylation of S",
    "Phosphorylation of T",
    "Phosphorylation of Y",
    "Pyrolidone from Q",
    "Pyrolidone from carbamidomethylated C",
];

pub const DEFAULT_VARIABLE_PTM: &str = "Oxidation of M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FixedPtm {
    #[default]
    #[serde(rename = "Carbamidomethylation of C")]
    CarbamidomethylationOfC,
    #[serde(rename = "None")]
    None,
}

impl FixedPtm {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixedPtm::CarbamidomethylationOfC => "Carbamidomethylation of C",
            FixedPtm::None => "None",
        }
    }
}

impl std::str::FromStr for FixedPtm {
    type Err = LabelquantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "carbamidomethylation of c" => Ok(FixedPtm::CarbamidomethylationOfC),
            "none" => Ok(FixedPtm::None),
            _ => Err(LabelquantError::UnknownFixedPtm(s.to_string())),
        }
    }
}

/// How peptide level intensities are rolled up into protein abundances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarizationMethod {
    #[default]
    Median,
    Average,
    Top3,
    Ibaq,
}

impl std::fmt::Display for SummarizationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummarizationMethod::Median => write!(f, "median"),
            SummarizationMethod::Average => write!(f, "average"),
            SummarizationMethod::Top3 => write!(f, "top3"),
            SummarizationMethod::Ibaq => write!(f, "ibaq"),
        }
    }
}

impl std::str::FromStr for SummarizationMethod {
    type Err = LabelquantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "median" => Ok(SummarizationMethod::Median),
            "average" | "mean" => Ok(SummarizationMethod::Average),
            "top3" => Ok(SummarizationMethod::Top3),
            "ibaq" => Ok(SummarizationMethod::Ibaq),
            _ => Err(LabelquantError::UnknownSummarization(s.to_string())),
        }
    }
}

/// Checks a variable modification selection against the catalog.
///
/// Duplicates are collapsed while keeping the first occurrence.
pub fn validate_variable_ptms<S: AsRef<str>>(
    selection: &[S],
) -> Result<Vec<String>, LabelquantError> {
    if selection.is_empty() {
        return Err(LabelquantError::EmptyVariablePtms);
    }
    let mut out: Vec<String> = Vec::with_capacity(selection.len());
    for ptm in selection {
        let ptm = ptm.as_ref();
        if !VARIABLE_PTM_CATALOG.contains(&ptm) {
            return Err(LabelquantError::UnknownPtm(ptm.to_string()));
        }
        if !out.iter().any(|x| x == ptm) {
            out.push(ptm.to_string());
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_variable_ptms() {
        let ok = validate_variable_ptms(&["Oxidation of M", "Deamidation of N", "Oxidation of M"])
            .unwrap();
        assert_eq!(ok, vec!["Oxidation of M", "Deamidation of N"]);

        let empty: [&str; 0] = [];
        assert!(matches!(
            validate_variable_ptms(&empty),
            Err(LabelquantError::EmptyVariablePtms)
        ));
        assert!(matches!(
            validate_variable_ptms(&["Methylation of X"]),
            Err(LabelquantError::UnknownPtm(_))
        ));
    }

    #[test]
    fn test_summarization_names() {
        assert_eq!(
            serde_json::to_string(&SummarizationMethod::Top3).unwrap(),
            "\"top3\""
        );
        assert_eq!(
            "IBAQ".parse::<SummarizationMethod>().unwrap(),
            SummarizationMethod::Ibaq
        );
        assert!("mode".parse::<SummarizationMethod>().is_err());
    }

    #[test]
    fn test_fixed_ptm_names() {
        assert_eq!(
            serde_json::to_string(&FixedPtm::CarbamidomethylationOfC).unwrap(),
            "\"Carbamidomethylation of C\""
        );
        assert_eq!("none".parse::<FixedPtm>().unwrap(), FixedPtm::None);
    }
}
