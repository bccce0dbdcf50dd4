pub mod design;
pub mod labeling;
pub mod ptms;
pub mod search_config;

pub use design::{
    ChannelAssignment,
    DEFAULT_GROUP1_NAME,
    DEFAULT_GROUP2_NAME,
    ExperimentDesignRecord,
    GroupToken,
};
pub use labeling::{
    LabelingMethod,
    Technique,
};
pub use ptms::{
    DEFAULT_VARIABLE_PTM,
    FixedPtm,
    SummarizationMethod,
    VARIABLE_PTM_CATALOG,
};
pub use search_config::{
    ConfigurationFile,
    Domain,
    SearchConfiguration,
};
