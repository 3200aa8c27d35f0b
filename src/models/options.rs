//! Option groups that make up a search specification.
//!
//! Every group is serialized with camelCase keys and `#[serde(default)]`, so a
//! document written by an older release (or a partial one) still loads with the
//! missing fields at their defaults. Enums are stored as integer ordinals.

use serde::{Deserialize, Serialize};

/// Implements the integer-ordinal conversions used by the persisted format.
///
/// Unknown ordinals map to the enum's default variant instead of failing the
/// whole document.
macro_rules! ordinal_enum {
    ($name:ident { $($variant:ident = $value:literal),+ $(,)? }) => {
        impl From<$name> for u16 {
            fn from(value: $name) -> Self {
                match value {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl From<u16> for $name {
            fn from(value: u16) -> Self {
                match value {
                    $($value => $name::$variant,)+
                    _ => $name::default(),
                }
            }
        }
    };
}

/// How the free-text search term is matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum TextMatchMode {
    #[default]
    Contains,
    WholeWord,
    RegularExpression,
}

ordinal_enum!(TextMatchMode {
    Contains = 0,
    WholeWord = 1,
    RegularExpression = 2,
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextSearchOptions {
    pub mode: TextMatchMode,
    pub match_case: bool,
    pub search_in_contents: bool,
    pub search_in_file_names: bool,
    pub allow_multiple_terms: bool,
    pub treat_binary_as_text: bool,
}

impl Default for TextSearchOptions {
    fn default() -> Self {
        Self {
            mode: TextMatchMode::Contains,
            match_case: false,
            search_in_contents: true,
            search_in_file_names: true,
            allow_multiple_terms: false,
            treat_binary_as_text: false,
        }
    }
}

/// Test used to select directories that are pruned from the traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum PruneTest {
    Name,
    Iname,
    #[default]
    Path,
    Ipath,
    Regex,
    Iregex,
}

ordinal_enum!(PruneTest {
    Name = 0,
    Iname = 1,
    Path = 2,
    Ipath = 3,
    Regex = 4,
    Iregex = 5,
});

impl PruneTest {
    /// The `find` primary for this test.
    pub fn flag(self) -> &'static str {
        match self {
            PruneTest::Name => "-name",
            PruneTest::Iname => "-iname",
            PruneTest::Path => "-path",
            PruneTest::Ipath => "-ipath",
            PruneTest::Regex => "-regex",
            PruneTest::Iregex => "-iregex",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NamePathOptions {
    pub name_enabled: bool,
    pub iname_enabled: bool,
    pub path_enabled: bool,
    pub ipath_enabled: bool,
    pub regex_enabled: bool,
    pub iregex_enabled: bool,
    pub lname_enabled: bool,
    pub ilname_enabled: bool,
    pub prune_enabled: bool,
    pub prune_directories_only: bool,
    pub prune_test: PruneTest,
    pub name_pattern: String,
    pub iname_pattern: String,
    pub path_pattern: String,
    pub ipath_pattern: String,
    pub regex_pattern: String,
    pub iregex_pattern: String,
    pub lname_pattern: String,
    pub ilname_pattern: String,
    pub prune_pattern: String,
}

impl Default for NamePathOptions {
    fn default() -> Self {
        Self {
            name_enabled: false,
            iname_enabled: false,
            path_enabled: false,
            ipath_enabled: false,
            regex_enabled: false,
            iregex_enabled: false,
            lname_enabled: false,
            ilname_enabled: false,
            prune_enabled: false,
            prune_directories_only: true,
            prune_test: PruneTest::Path,
            name_pattern: String::new(),
            iname_pattern: String::new(),
            path_pattern: String::new(),
            ipath_pattern: String::new(),
            regex_pattern: String::new(),
            iregex_pattern: String::new(),
            lname_pattern: String::new(),
            ilname_pattern: String::new(),
            prune_pattern: String::new(),
        }
    }
}

impl NamePathOptions {
    /// Enabled matchers in emission order, as `(flag, pattern)` pairs.
    pub fn matchers(&self) -> [(bool, &'static str, &str); 8] {
        [
            (self.name_enabled, "-name", &self.name_pattern),
            (self.iname_enabled, "-iname", &self.iname_pattern),
            (self.path_enabled, "-path", &self.path_pattern),
            (self.ipath_enabled, "-ipath", &self.ipath_pattern),
            (self.regex_enabled, "-regex", &self.regex_pattern),
            (self.iregex_enabled, "-iregex", &self.iregex_pattern),
            (self.lname_enabled, "-lname", &self.lname_pattern),
            (self.ilname_enabled, "-ilname", &self.ilname_pattern),
        ]
    }

    /// Whether a prune clause will be emitted.
    pub fn prune_active(&self) -> bool {
        self.prune_enabled && !self.prune_pattern.is_empty()
    }
}

/// Canned time windows offered to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum TimePreset {
    #[default]
    AnyTime,
    PastDay,
    PastWeek,
    PastMonth,
    PastSixMonths,
    PastYear,
    PastSixYears,
    CustomRange,
}

ordinal_enum!(TimePreset {
    AnyTime = 0,
    PastDay = 1,
    PastWeek = 2,
    PastMonth = 3,
    PastSixMonths = 4,
    PastYear = 5,
    PastSixYears = 6,
    CustomRange = 7,
});

impl TimePreset {
    /// Window length in days, `None` for presets without a fixed window.
    pub fn days(self) -> Option<u32> {
        match self {
            TimePreset::PastDay => Some(1),
            TimePreset::PastWeek => Some(7),
            TimePreset::PastMonth => Some(30),
            TimePreset::PastSixMonths => Some(182),
            TimePreset::PastYear => Some(365),
            TimePreset::PastSixYears => Some(365 * 6),
            TimePreset::AnyTime | TimePreset::CustomRange => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeFilterOptions {
    pub preset: TimePreset,
    pub include_modified: bool,
    pub include_created: bool,
    pub include_accessed: bool,
    pub custom_from: String,
    pub custom_to: String,

    pub use_m_time: bool,
    pub use_a_time: bool,
    pub use_c_time: bool,
    pub use_m_min: bool,
    pub use_a_min: bool,
    pub use_c_min: bool,
    pub use_used: bool,
    pub use_newer: bool,
    pub use_a_newer: bool,
    pub use_c_newer: bool,
    pub use_newermt: bool,
    pub use_newerat: bool,
    pub use_newerct: bool,
    pub mtime: String,
    pub atime: String,
    pub ctime: String,
    pub mmin: String,
    pub amin: String,
    pub cmin: String,
    pub used: String,
    pub newer: String,
    pub anewer: String,
    pub cnewer: String,
    pub newermt: String,
    pub newerat: String,
    pub newerct: String,
}

impl Default for TimeFilterOptions {
    fn default() -> Self {
        Self {
            preset: TimePreset::AnyTime,
            include_modified: true,
            include_created: false,
            include_accessed: false,
            custom_from: String::new(),
            custom_to: String::new(),
            use_m_time: false,
            use_a_time: false,
            use_c_time: false,
            use_m_min: false,
            use_a_min: false,
            use_c_min: false,
            use_used: false,
            use_newer: false,
            use_a_newer: false,
            use_c_newer: false,
            use_newermt: false,
            use_newerat: false,
            use_newerct: false,
            mtime: String::new(),
            atime: String::new(),
            ctime: String::new(),
            mmin: String::new(),
            amin: String::new(),
            cmin: String::new(),
            used: String::new(),
            newer: String::new(),
            anewer: String::new(),
            cnewer: String::new(),
            newermt: String::new(),
            newerat: String::new(),
            newerct: String::new(),
        }
    }
}

impl TimeFilterOptions {
    /// Manual per-field overrides in emission order.
    pub fn overrides(&self) -> [(bool, &'static str, &str); 13] {
        [
            (self.use_m_time, "-mtime", &self.mtime),
            (self.use_a_time, "-atime", &self.atime),
            (self.use_c_time, "-ctime", &self.ctime),
            (self.use_m_min, "-mmin", &self.mmin),
            (self.use_a_min, "-amin", &self.amin),
            (self.use_c_min, "-cmin", &self.cmin),
            (self.use_used, "-used", &self.used),
            (self.use_newer, "-newer", &self.newer),
            (self.use_a_newer, "-anewer", &self.anewer),
            (self.use_c_newer, "-cnewer", &self.cnewer),
            (self.use_newermt, "-newermt", &self.newermt),
            (self.use_newerat, "-newerat", &self.newerat),
            (self.use_newerct, "-newerct", &self.newerct),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SizeFilterOptions {
    pub min_enabled: bool,
    pub max_enabled: bool,
    pub exact_enabled: bool,
    pub range_inclusive: bool,
    pub include_zero_byte: bool,
    pub treat_directories_as_files: bool,
    pub use_decimal_units: bool,
    pub empty_enabled: bool,
    pub min_spec: String,
    pub max_spec: String,
    pub exact_spec: String,
}

impl Default for SizeFilterOptions {
    fn default() -> Self {
        Self {
            min_enabled: false,
            max_enabled: false,
            exact_enabled: false,
            range_inclusive: true,
            include_zero_byte: true,
            treat_directories_as_files: false,
            use_decimal_units: false,
            empty_enabled: false,
            min_spec: String::new(),
            max_spec: String::new(),
            exact_spec: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypeFilterOptions {
    pub type_enabled: bool,
    pub xtype_enabled: bool,
    pub use_extensions: bool,
    pub extension_case_insensitive: bool,
    pub use_detectors: bool,
    pub type_letters: String,
    pub xtype_letters: String,
    pub extensions: String,
    pub detector_tags: String,
}

impl Default for TypeFilterOptions {
    fn default() -> Self {
        Self {
            type_enabled: false,
            xtype_enabled: false,
            use_extensions: false,
            extension_case_insensitive: true,
            use_detectors: false,
            type_letters: String::new(),
            xtype_letters: String::new(),
            extensions: String::new(),
            detector_tags: String::new(),
        }
    }
}

/// How a permission spec is compared against a file's mode bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum PermissionMatch {
    #[default]
    Exact,
    AllBits,
    AnyBit,
}

ordinal_enum!(PermissionMatch {
    Exact = 0,
    AllBits = 1,
    AnyBit = 2,
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PermissionOwnershipOptions {
    pub perm_enabled: bool,
    pub readable: bool,
    pub writable: bool,
    pub executable: bool,
    pub perm_mode: PermissionMatch,
    pub perm_spec: String,

    pub user_enabled: bool,
    pub uid_enabled: bool,
    pub group_enabled: bool,
    pub gid_enabled: bool,
    pub no_user: bool,
    pub no_group: bool,
    pub user: String,
    pub uid: String,
    pub group: String,
    pub gid: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum SymlinkMode {
    #[default]
    Physical,
    CommandLine,
    Everywhere,
}

ordinal_enum!(SymlinkMode {
    Physical = 0,
    CommandLine = 1,
    Everywhere = 2,
});

impl SymlinkMode {
    pub fn flag(self) -> &'static str {
        match self {
            SymlinkMode::Physical => "-P",
            SymlinkMode::CommandLine => "-H",
            SymlinkMode::Everywhere => "-L",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum WarningMode {
    #[default]
    Default,
    ForceWarn,
    SuppressWarn,
}

ordinal_enum!(WarningMode {
    Default = 0,
    ForceWarn = 1,
    SuppressWarn = 2,
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TraversalFilesystemOptions {
    pub symlink_mode: SymlinkMode,
    pub warning_mode: WarningMode,
    pub depth_first: bool,
    pub stay_on_filesystem: bool,
    pub assume_no_leaf: bool,
    pub ignore_readdir_race: bool,
    pub day_start: bool,
    pub max_depth_enabled: bool,
    pub min_depth_enabled: bool,
    pub files_from_enabled: bool,
    pub files_from_null_separated: bool,
    pub fstype_enabled: bool,
    pub links_enabled: bool,
    pub same_file_enabled: bool,
    pub inum_enabled: bool,
    pub max_depth: String,
    pub min_depth: String,
    pub files_from: String,
    pub fs_type: String,
    pub link_count: String,
    pub same_file: String,
    pub inode: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum ExecVariant {
    #[default]
    Exec,
    ExecDir,
    Ok,
    OkDir,
}

ordinal_enum!(ExecVariant {
    Exec = 0,
    ExecDir = 1,
    Ok = 2,
    OkDir = 3,
});

impl ExecVariant {
    pub fn flag(self) -> &'static str {
        match self {
            ExecVariant::Exec => "-exec",
            ExecVariant::ExecDir => "-execdir",
            ExecVariant::Ok => "-ok",
            ExecVariant::OkDir => "-okdir",
        }
    }
}

/// What `find` does with each match.
///
/// The `*_append` flags are carried for collaborators that write the output
/// files themselves; `find` has no append mode, so they never reach the
/// compiled command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActionOptions {
    pub print: bool,
    pub print0: bool,
    pub ls: bool,
    pub delete_matches: bool,
    pub quit_early: bool,
    pub exec_enabled: bool,
    pub exec_use_plus: bool,
    pub exec_variant: ExecVariant,
    pub fprint_enabled: bool,
    pub fprint_append: bool,
    pub fprint0_enabled: bool,
    pub fprint0_append: bool,
    pub fls_enabled: bool,
    pub fls_append: bool,
    pub printf_enabled: bool,
    pub fprintf_enabled: bool,
    pub fprintf_append: bool,
    pub exec_command: String,
    pub fprint_file: String,
    pub fprint0_file: String,
    pub fls_file: String,
    pub printf_format: String,
    pub fprintf_file: String,
    pub fprintf_format: String,
}

impl Default for ActionOptions {
    fn default() -> Self {
        Self {
            print: true,
            print0: false,
            ls: false,
            delete_matches: false,
            quit_early: false,
            exec_enabled: false,
            exec_use_plus: false,
            exec_variant: ExecVariant::Exec,
            fprint_enabled: false,
            fprint_append: false,
            fprint0_enabled: false,
            fprint0_append: false,
            fls_enabled: false,
            fls_append: false,
            printf_enabled: false,
            fprintf_enabled: false,
            fprintf_append: false,
            exec_command: String::new(),
            fprint_file: String::new(),
            fprint0_file: String::new(),
            fls_file: String::new(),
            printf_format: String::new(),
            fprintf_file: String::new(),
            fprintf_format: String::new(),
        }
    }
}

impl ActionOptions {
    /// Whether any action is selected at all.
    ///
    /// `quitEarly` does not count: `-quit` alone produces no output.
    pub fn any_selected(&self) -> bool {
        self.print
            || self.print0
            || self.ls
            || self.delete_matches
            || self.exec_enabled
            || self.fprint_enabled
            || self.fprint0_enabled
            || self.fls_enabled
            || self.printf_enabled
            || self.fprintf_enabled
    }

    /// Forces `print` on when nothing else is selected.
    pub fn ensure_print(&mut self) {
        if !self.any_selected() {
            self.print = true;
        }
    }
}
