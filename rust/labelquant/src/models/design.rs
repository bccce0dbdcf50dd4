use serde::{
    Deserialize,
    Serialize,
};
use std::collections::HashMap;

pub const DEFAULT_GROUP1_NAME: &str = "Treatment";
pub const DEFAULT_GROUP2_NAME: &str = "Control";

/// Which of the two treatment groups a channel belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroupToken {
    #[default]
    #[serde(rename = "Group 1", alias = "group1")]
    Group1,
    #[serde(rename = "Group 2", alias = "group2")]
    Group2,
}

/// One row of the design table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAssignment {
    pub channel: String,
    pub sample_name: String,
    pub sample_group: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentDesignRecord {
    pub group1_name: String,
    pub group2_name: String,
    pub channel_assignments: Vec<ChannelAssignment>,
}

/// Returns the trimmed value, or the fallback when nothing but whitespace was entered.
pub(crate) fn or_placeholder(value: &str, fallback: impl FnOnce() -> String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback()
    } else {
        trimmed.to_string()
    }
}

impl ExperimentDesignRecord {
    /// Things that look off in a design but are still saved.
    ///
    /// Sample names are not required to be unique and both groups do not
    /// need members, so these are only ever reported.
    pub fn warnings(&self) -> Vec<String> {
        let mut out = Vec::new();

        let mut seen: HashMap<&str, Vec<&str>> = HashMap::new();
        for row in &self.channel_assignments {
            seen.entry(row.sample_name.as_str())
                .or_default()
                .push(row.channel.as_str());
        }
        let mut dupes: Vec<_> = seen.into_iter().filter(|(_, v)| v.len() > 1).collect();
        dupes.sort_unstable();
        for (name, channels) in dupes {
            out.push(format!(
                "Sample name '{}' is used by channels {}",
                name,
                channels.join(", ")
            ));
        }

        for group in [&self.group1_name, &self.group2_name] {
            if !self
                .channel_assignments
                .iter()
                .any(|row| &row.sample_group == group)
            {
                out.push(format!("Group '{}' has no channels assigned", group));
            }
        }

        if self.group1_name == self.group2_name {
            out.push(format!(
                "Both groups are named '{}', they will not be distinguishable",
                self.group1_name
            ));
        }
        out
    }
}
