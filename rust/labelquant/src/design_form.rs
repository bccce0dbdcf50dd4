use std::path::{
    Path,
    PathBuf,
};
use tracing::{
    info,
    warn,
};

use crate::errors::{
    LabelquantError,
    Result,
};
use crate::models::design::or_placeholder;
use crate::models::{
    ChannelAssignment,
    DEFAULT_GROUP1_NAME,
    DEFAULT_GROUP2_NAME,
    ExperimentDesignRecord,
    GroupToken,
    Technique,
};
use crate::output::write_atomically;

pub const OUTPUT_DIR_NAME: &str = "OUT";
pub const DESIGN_FILE_NAME: &str = "exp_design.tsv";

/// Editable values for a single reporter channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSlot {
    pub channel: &'static str,
    pub sample_name: String,
    pub group: GroupToken,
}

/// Result of a successful [`ExperimentDesignForm::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub path: PathBuf,
    /// True only for the save that made completion available.
    pub completion_unlocked: bool,
}

/// Channel to sample to group assignment for one labeling technique.
#[derive(Debug, Clone)]
pub struct ExperimentDesignForm {
    technique: Technique,
    group1_name: String,
    group2_name: String,
    slots: Vec<ChannelSlot>,
    output_path: PathBuf,
    saved: bool,
}

impl ExperimentDesignForm {
    /// `technique_key` must be a key of the channel catalog. The output path
    /// is derived from `work_dir` here and never changes afterwards.
    pub fn new(technique_key: &str, work_dir: &Path) -> Result<Self> {
        let technique = Technique::from_key(technique_key)?;
        let slots = technique
            .channels()
            .iter()
            .map(|&channel| ChannelSlot {
                channel,
                sample_name: String::new(),
                group: GroupToken::default(),
            })
            .collect();
        Ok(Self {
            technique,
            group1_name: String::new(),
            group2_name: String::new(),
            slots,
            output_path: work_dir.join(OUTPUT_DIR_NAME).join(DESIGN_FILE_NAME),
            saved: false,
        })
    }

    pub fn technique(&self) -> Technique {
        self.technique
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn get_channel_slots(&self) -> Vec<&'static str> {
        self.slots.iter().map(|s| s.channel).collect()
    }

    pub fn slots(&self) -> &[ChannelSlot] {
        &self.slots
    }

    pub fn set_group_names(&mut self, group1: &str, group2: &str) {
        self.group1_name = group1.to_string();
        self.group2_name = group2.to_string();
    }

    fn slot_mut(&mut self, channel: &str) -> Result<&mut ChannelSlot> {
        let technique = self.technique.key();
        self.slots
            .iter_mut()
            .find(|s| s.channel == channel)
            .ok_or_else(|| LabelquantError::UnknownChannel {
                channel: channel.to_string(),
                technique,
            })
    }

    pub fn set_sample_name(&mut self, channel: &str, name: &str) -> Result<()> {
        self.slot_mut(channel)?.sample_name = name.to_string();
        Ok(())
    }

    pub fn set_group(&mut self, channel: &str, group: GroupToken) -> Result<()> {
        self.slot_mut(channel)?.group = group;
        Ok(())
    }

    /// Resolves placeholders into the rows that will be written.
    pub fn record(&self) -> ExperimentDesignRecord {
        let group1_name = or_placeholder(&self.group1_name, || DEFAULT_GROUP1_NAME.to_string());
        let group2_name = or_placeholder(&self.group2_name, || DEFAULT_GROUP2_NAME.to_string());
        let channel_assignments = self
            .slots
            .iter()
            .map(|slot| ChannelAssignment {
                channel: slot.channel.to_string(),
                sample_name: or_placeholder(&slot.sample_name, || {
                    format!("Sample {}", slot.channel)
                }),
                sample_group: match slot.group {
                    GroupToken::Group1 => group1_name.clone(),
                    GroupToken::Group2 => group2_name.clone(),
                },
            })
            .collect();
        ExperimentDesignRecord {
            group1_name,
            group2_name,
            channel_assignments,
        }
    }

    /// Writes the design table, replacing the previous one.
    pub fn save(&mut self) -> Result<SaveOutcome> {
        let record = self.record();
        for warning in record.warnings() {
            warn!("{}", warning);
        }

        if let Some(parent) = self.output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_atomically(&self.output_path, |file| {
            let mut writer = csv::WriterBuilder::new()
                .delimiter(b'\t')
                .from_writer(file);
            for row in &record.channel_assignments {
                writer.serialize(row)?;
            }
            writer.flush()?;
            Ok(())
        })?;
        info!(
            "Wrote {} channel assignments to {}",
            record.channel_assignments.len(),
            self.output_path.display()
        );

        let completion_unlocked = !self.saved;
        self.saved = true;
        Ok(SaveOutcome {
            path: self.output_path.clone(),
            completion_unlocked,
        })
    }
}
