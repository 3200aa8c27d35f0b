mod config;
mod options;
mod search;
mod specification;

pub use config::{APP_DIR, CONFIG_ENV, Config, DEFAULT_PROGRAM, SearchConfig, StorageConfig};
pub use options::{
    ActionOptions, ExecVariant, NamePathOptions, PermissionMatch, PermissionOwnershipOptions,
    PruneTest, SizeFilterOptions, SymlinkMode, TextMatchMode, TextSearchOptions,
    TimeFilterOptions, TimePreset, TraversalFilesystemOptions, TypeFilterOptions, WarningMode,
};
pub use search::{ExecutionOptions, ExecutionResult, OutputFormat, SavedSpecification};
pub use specification::{Specification, limits};
