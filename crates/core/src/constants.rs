/// Inner padding between a group's border and its first grid cell
pub const GROUP_PADDING: f64 = 20.0;

/// Width of one grid cell inside a group
pub const GROUP_CHILD_WIDTH: f64 = 300.0;

/// Height of one grid cell inside a group
pub const GROUP_CHILD_HEIGHT: f64 = 200.0;

/// Spacing between grid cells inside a group
pub const GROUP_GAP: f64 = 20.0;

/// Number of grid columns inside a group
pub const GROUP_COLUMNS: usize = 2;

/// Number of example ads inserted by `create_examples`
pub const EXAMPLE_AD_COUNT: usize = 3;

/// Pipeline stage assigned to a freshly created ad
pub const INITIAL_PIPELINE_STAGE: &str = "concept";

/// Version assigned to a freshly materialized ad document
pub const INITIAL_DOCUMENT_VERSION: i32 = 1;
