//! Root search specification.

use serde::{Deserialize, Serialize};

use super::options::{
    ActionOptions, NamePathOptions, PermissionOwnershipOptions, SizeFilterOptions,
    TextSearchOptions, TimeFilterOptions, TraversalFilesystemOptions, TypeFilterOptions,
};
use crate::utils::text::truncate_to;

/// Upper bounds, in bytes, for the free-text fields of a specification.
pub mod limits {
    pub const NAME: usize = 127;
    pub const PATH: usize = 4095;
    pub const TEXT: usize = 255;
    pub const SIZE_SPEC: usize = 31;
    pub const SHORT_SPEC: usize = 15;
    pub const DEPTH: usize = 7;
    pub const TIMESTAMP: usize = 63;
    pub const ACCOUNT: usize = 63;
    pub const NUMERIC_ID: usize = 31;
    pub const EXEC_COMMAND: usize = 511;
}

/// A structured, editable description of a file search.
///
/// Each `enable_*` flag is the only switch deciding whether its option group
/// contributes to the compiled command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Specification {
    pub spec_name: String,
    pub start_location: String,
    pub search_text: String,
    pub include_patterns: String,
    pub exclude_patterns: String,
    pub include_subdirectories: bool,
    pub include_hidden: bool,
    pub follow_symlinks: bool,
    pub stay_on_same_filesystem: bool,
    pub enable_text_search: bool,
    pub enable_name_path_tests: bool,
    pub enable_time_filters: bool,
    pub enable_size_filters: bool,
    pub enable_type_filters: bool,
    pub enable_permission_ownership: bool,
    pub enable_traversal_filters: bool,
    pub enable_action_options: bool,
    pub text_options: TextSearchOptions,
    pub name_path_options: NamePathOptions,
    pub time_options: TimeFilterOptions,
    pub size_options: SizeFilterOptions,
    pub type_options: TypeFilterOptions,
    pub permission_options: PermissionOwnershipOptions,
    pub traversal_options: TraversalFilesystemOptions,
    pub action_options: ActionOptions,
}

impl Default for Specification {
    fn default() -> Self {
        Self {
            spec_name: String::new(),
            start_location: ".".to_string(),
            search_text: String::new(),
            include_patterns: String::new(),
            exclude_patterns: String::new(),
            include_subdirectories: true,
            include_hidden: false,
            follow_symlinks: false,
            stay_on_same_filesystem: false,
            enable_text_search: true,
            enable_name_path_tests: false,
            enable_time_filters: false,
            enable_size_filters: false,
            enable_type_filters: false,
            enable_permission_ownership: false,
            enable_traversal_filters: false,
            enable_action_options: true,
            text_options: TextSearchOptions::default(),
            name_path_options: NamePathOptions::default(),
            time_options: TimeFilterOptions::default(),
            size_options: SizeFilterOptions::default(),
            type_options: TypeFilterOptions::default(),
            permission_options: PermissionOwnershipOptions::default(),
            traversal_options: TraversalFilesystemOptions::default(),
            action_options: ActionOptions::default(),
        }
    }
}

impl Specification {
    /// Create a default specification rooted at `start`.
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            start_location: start.into(),
            ..Default::default()
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.spec_name = name.into();
        self
    }

    /// Set the free-text search term.
    #[must_use]
    pub fn with_search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    /// Whether captured matches should be refined by reading file contents.
    pub fn wants_content_filter(&self) -> bool {
        self.enable_text_search
            && self.text_options.search_in_contents
            && !self.search_text.trim().is_empty()
    }

    /// Truncate every free-text field to its storage limit.
    pub fn enforce_limits(&mut self) {
        use limits::*;

        truncate_to(&mut self.spec_name, NAME);
        truncate_to(&mut self.start_location, PATH);
        truncate_to(&mut self.search_text, TEXT);
        truncate_to(&mut self.include_patterns, TEXT);
        truncate_to(&mut self.exclude_patterns, TEXT);

        let np = &mut self.name_path_options;
        for pattern in [
            &mut np.name_pattern,
            &mut np.iname_pattern,
            &mut np.path_pattern,
            &mut np.ipath_pattern,
            &mut np.regex_pattern,
            &mut np.iregex_pattern,
            &mut np.lname_pattern,
            &mut np.ilname_pattern,
            &mut np.prune_pattern,
        ] {
            truncate_to(pattern, TEXT);
        }

        let time = &mut self.time_options;
        truncate_to(&mut time.custom_from, SIZE_SPEC);
        truncate_to(&mut time.custom_to, SIZE_SPEC);
        for value in [
            &mut time.mtime,
            &mut time.atime,
            &mut time.ctime,
            &mut time.mmin,
            &mut time.amin,
            &mut time.cmin,
            &mut time.used,
        ] {
            truncate_to(value, SHORT_SPEC);
        }
        for value in [&mut time.newer, &mut time.anewer, &mut time.cnewer] {
            truncate_to(value, PATH);
        }
        for value in [&mut time.newermt, &mut time.newerat, &mut time.newerct] {
            truncate_to(value, TIMESTAMP);
        }

        let size = &mut self.size_options;
        for value in [&mut size.min_spec, &mut size.max_spec, &mut size.exact_spec] {
            truncate_to(value, SIZE_SPEC);
        }

        let types = &mut self.type_options;
        truncate_to(&mut types.type_letters, SHORT_SPEC);
        truncate_to(&mut types.xtype_letters, SHORT_SPEC);
        truncate_to(&mut types.extensions, TEXT);
        truncate_to(&mut types.detector_tags, TEXT);

        let perm = &mut self.permission_options;
        truncate_to(&mut perm.perm_spec, SHORT_SPEC);
        truncate_to(&mut perm.user, ACCOUNT);
        truncate_to(&mut perm.group, ACCOUNT);
        truncate_to(&mut perm.uid, NUMERIC_ID);
        truncate_to(&mut perm.gid, NUMERIC_ID);

        let trav = &mut self.traversal_options;
        truncate_to(&mut trav.max_depth, DEPTH);
        truncate_to(&mut trav.min_depth, DEPTH);
        truncate_to(&mut trav.files_from, PATH);
        truncate_to(&mut trav.fs_type, ACCOUNT);
        truncate_to(&mut trav.link_count, SHORT_SPEC);
        truncate_to(&mut trav.same_file, PATH);
        truncate_to(&mut trav.inode, NUMERIC_ID);

        let actions = &mut self.action_options;
        truncate_to(&mut actions.exec_command, EXEC_COMMAND);
        truncate_to(&mut actions.printf_format, TEXT);
        truncate_to(&mut actions.fprintf_format, TEXT);
        for value in [
            &mut actions.fprint_file,
            &mut actions.fprint0_file,
            &mut actions.fls_file,
            &mut actions.fprintf_file,
        ] {
            truncate_to(value, PATH);
        }
    }
}
