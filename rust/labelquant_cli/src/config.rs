use labelquant::models::{
    DEFAULT_GROUP1_NAME,
    DEFAULT_GROUP2_NAME,
};
use labelquant::{
    ExperimentDesignForm,
    FixedPtm,
    GroupToken,
    LabelingMethod,
    LabelquantError,
    SearchConfigForm,
    SummarizationMethod,
    Technique,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::path::{
    Path,
    PathBuf,
};

use crate::error::CliError;

/// Search parameter overrides, keyed like the written configuration.
///
/// Anything left out keeps the form default. Paths may be relative to the
/// working directory.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SearchParams {
    pub precursor_tolerance: Option<i32>,
    pub fragment_tolerance: Option<f64>,
    pub fasta_db: Option<PathBuf>,
    pub generate_decoy: Option<bool>,
    pub labelling_method: Option<LabelingMethod>,
    pub missed_cleavages: Option<u32>,
    pub fixed_ptms: Option<FixedPtm>,
    pub var_ptms: Option<Vec<String>>,
    pub summarization_method: Option<SummarizationMethod>,
    pub min_protein_psms: Option<u32>,
    pub use_ptms_for_quant: Option<bool>,
    pub target_fdr: Option<f64>,
    pub input_directory: Option<PathBuf>,
}

impl SearchParams {
    pub fn template() -> Self {
        Self {
            precursor_tolerance: Some(10),
            fragment_tolerance: Some(0.02),
            fasta_db: None,
            generate_decoy: Some(true),
            labelling_method: Some(LabelingMethod::Tmt10),
            missed_cleavages: Some(2),
            fixed_ptms: Some(FixedPtm::CarbamidomethylationOfC),
            var_ptms: Some(vec!["Oxidation of M".to_string()]),
            summarization_method: Some(SummarizationMethod::Median),
            min_protein_psms: Some(2),
            use_ptms_for_quant: Some(false),
            target_fdr: Some(0.01),
            input_directory: Some(PathBuf::from("IN")),
        }
    }

    pub fn apply(&self, form: &mut SearchConfigForm) -> Result<(), LabelquantError> {
        if let Some(x) = self.labelling_method {
            form.set_labeling_method(x)?;
        }
        if let Some(x) = &self.fasta_db {
            form.select_fasta(x)?;
        }
        if let Some(x) = &self.input_directory {
            form.select_spectra_dir(x)?;
        }
        if let Some(x) = self.precursor_tolerance {
            form.set_precursor_tolerance(x)?;
        }
        if let Some(x) = self.fragment_tolerance {
            form.set_fragment_tolerance(x)?;
        }
        if let Some(x) = self.generate_decoy {
            form.set_generate_decoy(x);
        }
        if let Some(x) = self.missed_cleavages {
            form.set_missed_cleavages(x)?;
        }
        if let Some(x) = self.fixed_ptms {
            form.set_fixed_ptm(x);
        }
        if let Some(x) = &self.var_ptms {
            form.set_variable_ptms(x)?;
        }
        if let Some(x) = self.summarization_method {
            form.set_summarization_method(x);
        }
        if let Some(x) = self.min_protein_psms {
            form.set_min_protein_psms(x)?;
        }
        if let Some(x) = self.use_ptms_for_quant {
            form.set_use_ptms_for_quant(x);
        }
        if let Some(x) = self.target_fdr {
            form.set_target_fdr(x)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChannelInput {
    pub channel: String,
    #[serde(default)]
    pub sample_name: String,
    #[serde(default)]
    pub group: GroupToken,
}

/// Experimental design as entered by the user.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DesignInput {
    pub group1_name: String,
    pub group2_name: String,
    pub channels: Vec<ChannelInput>,
}

impl DesignInput {
    pub fn template(technique: Technique) -> Self {
        Self {
            group1_name: DEFAULT_GROUP1_NAME.to_string(),
            group2_name: DEFAULT_GROUP2_NAME.to_string(),
            channels: technique
                .channels()
                .iter()
                .map(|c| ChannelInput {
                    channel: c.to_string(),
                    sample_name: String::new(),
                    group: GroupToken::Group1,
                })
                .collect(),
        }
    }

    pub fn apply(&self, form: &mut ExperimentDesignForm) -> Result<(), LabelquantError> {
        form.set_group_names(&self.group1_name, &self.group2_name);
        for ch in &self.channels {
            form.set_sample_name(&ch.channel, &ch.sample_name)?;
            form.set_group(&ch.channel, ch.group)?;
        }
        Ok(())
    }
}

pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_params_parse() {
        let params: SearchParams = serde_json::from_str(
            r#"{"labelling_method": "iTRAQ8 Y-variable", "target_fdr": 0.05}"#,
        )
        .unwrap();
        assert_eq!(params.labelling_method, Some(LabelingMethod::Itraq8YVariable));
        assert_eq!(params.target_fdr, Some(0.05));
        assert!(params.fasta_db.is_none());
    }

    #[test]
    fn test_display_name_accepted_in_params() {
        let params: SearchParams =
            serde_json::from_str(r#"{"labelling_method": "iTRAQ4 (Y-fixed)"}"#).unwrap();
        let method = params.labelling_method.unwrap();
        assert_eq!(method, LabelingMethod::Itraq4YFixed);
        // Written back under its identifier.
        assert_eq!(String::from(method), "iTRAQ4 Y-fixed");
    }

    #[test]
    fn test_bad_labelling_method_fails_parse() {
        let res: Result<SearchParams, _> =
            serde_json::from_str(r#"{"labelling_method": "TMT16"}"#);
        assert!(res.unwrap_err().to_string().contains("TMT16"));
    }

    #[test]
    fn test_design_template_matches_catalog() {
        let tmpl = DesignInput::template(Technique::Itraq8);
        let channels: Vec<&str> = tmpl.channels.iter().map(|c| c.channel.as_str()).collect();
        assert_eq!(channels, Technique::Itraq8.channels());
    }

    #[test]
    fn test_design_apply() {
        let input: DesignInput = serde_json::from_str(
            r#"{"group2_name": "DMSO", "channels": [{"channel": "115", "sample_name": "s2", "group": "Group 2"}]}"#,
        )
        .unwrap();
        let mut form = ExperimentDesignForm::new("iTRAQ4", Path::new("/data")).unwrap();
        input.apply(&mut form).unwrap();
        let record = form.record();
        assert_eq!(record.channel_assignments[1].sample_name, "s2");
        assert_eq!(record.channel_assignments[1].sample_group, "DMSO");
        assert_eq!(record.channel_assignments[0].sample_group, "Treatment");
    }
}
