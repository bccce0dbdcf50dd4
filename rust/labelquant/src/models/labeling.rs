use serde::{
    Deserialize,
    Serialize,
};

use crate::errors::LabelquantError;

/// Isobaric labeling technique, keyed the same way downstream
/// quantification tools key their reporter-ion layouts.
///
/// Every technique owns a fixed, ordered list of reporter channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Technique {
    Tmt6,
    Tmt10,
    Itraq4,
    Itraq8,
}

const TMT6_CHANNELS: [&str; 6] = ["126", "127", "128", "129", "130", "131"];
const TMT10_CHANNELS: [&str; 10] = [
    "126", "127N", "127C", "128N", "128C", "129N", "129C", "130N", "130C", "131",
];
const ITRAQ4_CHANNELS: [&str; 4] = ["114", "115", "116", "117"];
const ITRAQ8_CHANNELS: [&str; 8] = ["113", "114", "115", "116", "117", "118", "119", "121"];

impl Technique {
    pub const ALL: [Technique; 4] = [
        Technique::Tmt6,
        Technique::Tmt10,
        Technique::Itraq4,
        Technique::Itraq8,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Technique::Tmt6 => "TMT6",
            Technique::Tmt10 => "TMT10",
            Technique::Itraq4 => "iTRAQ4",
            Technique::Itraq8 => "iTRAQ8",
        }
    }

    /// Reporter channel labels, in the order the design table lists them.
    pub fn channels(&self) -> &'static [&'static str] {
        match self {
            Technique::Tmt6 => &TMT6_CHANNELS,
            Technique::Tmt10 => &TMT10_CHANNELS,
            Technique::Itraq4 => &ITRAQ4_CHANNELS,
            Technique::Itraq8 => &ITRAQ8_CHANNELS,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels().len()
    }

    /// Looks a technique up in the channel catalog by its exact key.
    pub fn from_key(key: &str) -> Result<Self, LabelquantError> {
        Technique::ALL
            .into_iter()
            .find(|t| t.key() == key)
            .ok_or_else(|| LabelquantError::UnknownTechnique(key.to_string()))
    }
}

impl std::fmt::Display for Technique {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Labeling method selectable for the search.
///
/// Each variant carries the modifications the label adds to the search,
/// so nothing downstream has to split display strings to recover them.
/// The identifier is `<technique key>[ <tyrosine handling>]`; the base key
/// is everything before the first space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LabelingMethod {
    Tmt6,
    #[default]
    Tmt10,
    Itraq4YFixed,
    Itraq4YVariable,
    Itraq8YFixed,
    Itraq8YVariable,
}

impl LabelingMethod {
    pub const ALL: [LabelingMethod; 6] = [
        LabelingMethod::Tmt6,
        LabelingMethod::Tmt10,
        LabelingMethod::Itraq4YFixed,
        LabelingMethod::Itraq4YVariable,
        LabelingMethod::Itraq8YFixed,
        LabelingMethod::Itraq8YVariable,
    ];

    pub fn identifier(&self) -> &'static str {
        match self {
            LabelingMethod::Tmt6 => "TMT6",
            LabelingMethod::Tmt10 => "TMT10",
            LabelingMethod::Itraq4YFixed => "iTRAQ4 Y-fixed",
            LabelingMethod::Itraq4YVariable => "iTRAQ4 Y-variable",
            LabelingMethod::Itraq8YFixed => "iTRAQ8 Y-fixed",
            LabelingMethod::Itraq8YVariable => "iTRAQ8 Y-variable",
        }
    }

    /// Human readable name used in log output.
    ///
    /// Parameter files may spell the method either way; the configuration
    /// file always stores [`LabelingMethod::identifier`].
    pub fn display_name(&self) -> &'static str {
        match self {
            LabelingMethod::Tmt6 => "TMT6",
            LabelingMethod::Tmt10 => "TMT10",
            LabelingMethod::Itraq4YFixed => "iTRAQ4 (Y-fixed)",
            LabelingMethod::Itraq4YVariable => "iTRAQ4 (Y-variable)",
            LabelingMethod::Itraq8YFixed => "iTRAQ8 (Y-fixed)",
            LabelingMethod::Itraq8YVariable => "iTRAQ8 (Y-variable)",
        }
    }

    pub fn base_key(&self) -> &'static str {
        let id = self.identifier();
        match id.split_once(' ') {
            Some((key, _)) => key,
            None => id,
        }
    }

    pub fn technique(&self) -> Result<Technique, LabelquantError> {
        Technique::from_key(self.base_key())
    }

    /// Fixed modifications introduced by the label itself.
    pub fn labeling_ptms(&self) -> &'static [&'static str] {
        match self {
            LabelingMethod::Tmt6 => &["TMT 6-plex of K", "TMT 6-plex of peptide N-term"],
            LabelingMethod::Tmt10 => &["TMT 10-plex of K", "TMT 10-plex of peptide N-term"],
            LabelingMethod::Itraq4YFixed => &[
                "iTRAQ 4-plex of K",
                "iTRAQ 4-plex of Y",
                "iTRAQ 4-plex of peptide N-term",
            ],
            LabelingMethod::Itraq4YVariable => {
                &["iTRAQ 4-plex of K", "iTRAQ 4-plex of peptide N-term"]
            }
            LabelingMethod::Itraq8YFixed => &[
                "iTRAQ 8-plex of K",
                "iTRAQ 8-plex of Y",
                "iTRAQ 8-plex of peptide N-term",
            ],
            LabelingMethod::Itraq8YVariable => {
                &["iTRAQ 8-plex of K", "iTRAQ 8-plex of peptide N-term"]
            }
        }
    }

    /// Label modifications searched as variable instead of fixed.
    pub fn label_variable_ptms(&self) -> &'static [&'static str] {
        match self {
            LabelingMethod::Itraq4YVariable => &["iTRAQ 4-plex of Y"],
            LabelingMethod::Itraq8YVariable => &["iTRAQ 8-plex of Y"],
            _ => &[],
        }
    }

    pub fn ptm_string(&self) -> String {
        self.labeling_ptms().join(", ")
    }
}

impl std::fmt::Display for LabelingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl std::str::FromStr for LabelingMethod {
    type Err = LabelquantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        LabelingMethod::ALL
            .into_iter()
            .find(|m| {
                m.identifier().to_lowercase() == wanted || m.display_name().to_lowercase() == wanted
            })
            .ok_or_else(|| LabelquantError::UnknownLabelingMethod(s.to_string()))
    }
}

impl TryFrom<String> for LabelingMethod {
    type Error = LabelquantError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LabelingMethod> for String {
    fn from(value: LabelingMethod) -> Self {
        value.identifier().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_method_has_catalog_technique() {
        for method in LabelingMethod::ALL {
            let technique = method.technique().unwrap();
            assert_eq!(technique.key(), method.base_key());
        }
    }

    #[test]
    fn test_channel_counts() {
        assert_eq!(Technique::Tmt6.channel_count(), 6);
        assert_eq!(Technique::Tmt10.channel_count(), 10);
        assert_eq!(Technique::Itraq4.channel_count(), 4);
        assert_eq!(Technique::Itraq8.channel_count(), 8);
        assert_eq!(
            Technique::Tmt10.channels(),
            &["126", "127N", "127C", "128N", "128C", "129N", "129C", "130N", "130C", "131"]
        );
    }

    #[test]
    fn test_unknown_technique_is_named() {
        let err = Technique::from_key("TMT16").unwrap_err();
        assert!(matches!(err, LabelquantError::UnknownTechnique(ref k) if k == "TMT16"));
        assert!(err.to_string().contains("TMT16"));
    }

    #[test]
    fn test_parse_identifier_and_display_name() {
        assert_eq!(
            "iTRAQ8 Y-variable".parse::<LabelingMethod>().unwrap(),
            LabelingMethod::Itraq8YVariable
        );
        assert_eq!(
            "itraq4 (y-fixed)".parse::<LabelingMethod>().unwrap(),
            LabelingMethod::Itraq4YFixed
        );
        assert!("SILAC".parse::<LabelingMethod>().is_err());
    }

    #[test]
    fn test_y_variable_moves_tyrosine_label() {
        let fixed = LabelingMethod::Itraq4YFixed;
        let variable = LabelingMethod::Itraq4YVariable;
        assert!(fixed.labeling_ptms().contains(&"iTRAQ 4-plex of Y"));
        assert!(!variable.labeling_ptms().contains(&"iTRAQ 4-plex of Y"));
        assert_eq!(variable.label_variable_ptms(), &["iTRAQ 4-plex of Y"]);
        assert_eq!(
            LabelingMethod::Tmt6.ptm_string(),
            "TMT 6-plex of K, TMT 6-plex of peptide N-term"
        );
    }

    #[test]
    fn test_serializes_as_identifier() {
        let json = serde_json::to_string(&LabelingMethod::Itraq8YFixed).unwrap();
        assert_eq!(json, "\"iTRAQ8 Y-fixed\"");
        let back: LabelingMethod = serde_json::from_str(&json).unwrap();
        assert_eq!(back, LabelingMethod::Itraq8YFixed);
        assert!(serde_json::from_str::<LabelingMethod>("\"TMT18\"").is_err());
    }
}
