//! Compiles a [`Specification`] into a `find` argument vector.
//!
//! The output is deterministic: the same specification always yields the same
//! argument list. Fields that are empty or belong to a disabled group emit
//! nothing, so compilation never fails.

use tracing::debug;

use crate::models::{
    ActionOptions, DEFAULT_PROGRAM, NamePathOptions, PermissionMatch, PermissionOwnershipOptions,
    SizeFilterOptions, Specification, TextMatchMode, TimeFilterOptions, TimePreset,
    TraversalFilesystemOptions, TypeFilterOptions, WarningMode,
};
use crate::utils::text::{shell_quote, split_command, split_patterns, tokenize_terms};

type Expr = Vec<String>;

/// Compile `spec` into an argument vector for the default `find` program.
pub fn compile(spec: &Specification, include_actions: bool) -> Vec<String> {
    compile_with_program(spec, include_actions, DEFAULT_PROGRAM)
}

/// Compile `spec` into an argument vector whose first token is `program`.
pub fn compile_with_program(
    spec: &Specification,
    include_actions: bool,
    program: &str,
) -> Vec<String> {
    let mut args = vec![program.to_string()];
    args.extend(parse_start_locations(&spec.start_location));
    add_traversal_args(&mut args, spec);

    let tests = build_tests(spec);
    let actions = build_actions(spec, include_actions);

    match prune_expression(spec) {
        Some(prune) => {
            args.push("(".to_string());
            args.extend(prune);
            args.push("-prune".to_string());
            args.push("-o".to_string());
            if !tests.is_empty() {
                args.push("(".to_string());
                args.extend(tests);
                args.push(")".to_string());
            }
            args.extend(actions);
            args.push(")".to_string());
        }
        None => {
            args.extend(tests);
            args.extend(actions);
        }
    }

    debug!(command = %render_command(&args), "compiled specification");
    args
}

/// Render an argument vector as a copy-pasteable shell command line.
pub fn render_command(argv: &[String]) -> String {
    argv.iter()
        .map(|token| shell_quote(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split the start location field into one or more paths.
///
/// Entries are separated by `;` or line breaks; an empty field means `.`.
pub fn parse_start_locations(raw: &str) -> Vec<String> {
    let paths: Vec<String> = raw
        .split([';', '\n', '\r'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if paths.is_empty() {
        vec![".".to_string()]
    } else {
        paths
    }
}

/// Wrap two or more expressions in `( a -o b ... )`; a single one is emitted bare.
fn or_group(target: &mut Vec<String>, expressions: Vec<Expr>) {
    match expressions.len() {
        0 => {}
        1 => target.extend(expressions.into_iter().flatten()),
        len => {
            target.push("(".to_string());
            for (i, expr) in expressions.into_iter().enumerate() {
                target.extend(expr);
                if i + 1 < len {
                    target.push("-o".to_string());
                }
            }
            target.push(")".to_string());
        }
    }
}

fn and_group(target: &mut Vec<String>, expressions: Vec<Expr>) {
    target.extend(expressions.into_iter().flatten());
}

fn pair(flag: &str, value: &str) -> Expr {
    vec![flag.to_string(), value.to_string()]
}

fn push_if(target: &mut Vec<String>, enabled: bool, flag: &str, value: &str) {
    if enabled && !value.is_empty() {
        target.extend(pair(flag, value));
    }
}

fn add_traversal_args(args: &mut Vec<String>, spec: &Specification) {
    if spec.enable_traversal_filters {
        add_traversal_options(args, &spec.traversal_options, spec.include_subdirectories);
        return;
    }

    args.push(if spec.follow_symlinks { "-L" } else { "-P" }.to_string());
    if spec.stay_on_same_filesystem {
        args.push("-xdev".to_string());
    }
    if !spec.include_subdirectories {
        args.extend(pair("-maxdepth", "1"));
    }
}

fn add_traversal_options(
    args: &mut Vec<String>,
    options: &TraversalFilesystemOptions,
    recurse: bool,
) {
    args.push(options.symlink_mode.flag().to_string());

    match options.warning_mode {
        WarningMode::ForceWarn => args.push("-warn".to_string()),
        WarningMode::SuppressWarn => args.push("-nowarn".to_string()),
        WarningMode::Default => {}
    }

    for (enabled, flag) in [
        (options.depth_first, "-depth"),
        (options.stay_on_filesystem, "-xdev"),
        (options.assume_no_leaf, "-noleaf"),
        (options.ignore_readdir_race, "-ignore_readdir_race"),
        (options.day_start, "-daystart"),
    ] {
        if enabled {
            args.push(flag.to_string());
        }
    }

    let files_from_flag = if options.files_from_null_separated {
        "-files0-from"
    } else {
        "-files-from"
    };
    push_if(args, options.files_from_enabled, files_from_flag, &options.files_from);
    push_if(args, options.fstype_enabled, "-fstype", &options.fs_type);
    push_if(args, options.links_enabled, "-links", &options.link_count);
    push_if(args, options.same_file_enabled, "-samefile", &options.same_file);
    push_if(args, options.inum_enabled, "-inum", &options.inode);

    if options.max_depth_enabled && !options.max_depth.is_empty() {
        args.extend(pair("-maxdepth", &options.max_depth));
    } else if !recurse {
        args.extend(pair("-maxdepth", "1"));
    }
    push_if(args, options.min_depth_enabled, "-mindepth", &options.min_depth);
}

fn build_tests(spec: &Specification) -> Vec<String> {
    let mut tests = Vec::new();

    if !spec.include_hidden {
        and_group(
            &mut tests,
            vec![
                vec!["!".into(), "-name".into(), ".*".into()],
                vec!["!".into(), "-path".into(), "*/.*".into()],
            ],
        );
    }

    add_include_exclude(&mut tests, &spec.include_patterns, &spec.exclude_patterns);

    if spec.enable_name_path_tests {
        add_name_path_tests(&mut tests, &spec.name_path_options);
    }

    tests.extend(text_name_tests(spec));

    if spec.enable_time_filters {
        add_time_tests(&mut tests, &spec.time_options);
    }
    if spec.enable_size_filters {
        add_size_tests(&mut tests, &spec.size_options);
    }
    if spec.enable_type_filters {
        add_type_tests(&mut tests, &spec.type_options);
    }
    if spec.enable_permission_ownership {
        add_permission_tests(&mut tests, &spec.permission_options);
    }

    tests
}

fn add_include_exclude(tests: &mut Vec<String>, include: &str, exclude: &str) {
    let includes = split_patterns(include)
        .iter()
        .map(|pattern| pair("-name", pattern))
        .collect();
    or_group(tests, includes);

    for pattern in split_patterns(exclude) {
        tests.push("!".to_string());
        tests.extend(pair("-name", &pattern));
    }
}

fn add_name_path_tests(tests: &mut Vec<String>, options: &NamePathOptions) {
    for (enabled, flag, pattern) in options.matchers() {
        push_if(tests, enabled, flag, pattern);
    }
}

/// Name clauses derived from the free-text search term.
fn text_name_tests(spec: &Specification) -> Vec<String> {
    let mut tests = Vec::new();
    let text = &spec.text_options;
    let search_text = spec.search_text.trim();

    if !spec.enable_text_search || search_text.is_empty() || !text.search_in_file_names {
        return tests;
    }

    let terms = if text.allow_multiple_terms {
        tokenize_terms(search_text)
    } else {
        vec![search_text.to_string()]
    };

    let insensitive = !text.match_case;
    let expressions = terms
        .iter()
        .map(|term| match text.mode {
            TextMatchMode::Contains => {
                pair(if insensitive { "-iname" } else { "-name" }, &format!("*{term}*"))
            }
            TextMatchMode::WholeWord => pair(if insensitive { "-iname" } else { "-name" }, term),
            TextMatchMode::RegularExpression => pair(
                if insensitive { "-iregex" } else { "-regex" },
                &format!(".*{term}.*"),
            ),
        })
        .collect();
    and_group(&mut tests, expressions);
    tests
}

fn add_time_tests(tests: &mut Vec<String>, options: &TimeFilterOptions) {
    let kinds = [
        (options.include_modified, "m"),
        (options.include_created, "c"),
        (options.include_accessed, "a"),
    ];

    if let Some(days) = options.preset.days() {
        let window = format!("-{days}");
        for (enabled, kind) in kinds {
            if enabled {
                tests.extend(pair(&format!("-{kind}time"), &window));
            }
        }
    }

    if options.preset == TimePreset::CustomRange {
        let from = options.custom_from.trim();
        let to = options.custom_to.trim();
        for (enabled, kind) in kinds {
            if !enabled {
                continue;
            }
            let flag = format!("-newer{kind}t");
            if !from.is_empty() {
                tests.extend(pair(&flag, from));
            }
            if !to.is_empty() {
                tests.push("!".to_string());
                tests.extend(pair(&flag, to));
            }
        }
    }

    for (enabled, flag, value) in options.overrides() {
        push_if(tests, enabled, flag, value);
    }
}

fn prefixed_size(spec: &str, prefix: char) -> String {
    let spec = spec.trim();
    if spec.is_empty() || spec.starts_with(['+', '-']) {
        spec.to_string()
    } else {
        format!("{prefix}{spec}")
    }
}

fn add_size_tests(tests: &mut Vec<String>, options: &SizeFilterOptions) {
    let exact = options.exact_spec.trim();
    let min = prefixed_size(&options.min_spec, '+');
    let max = prefixed_size(&options.max_spec, '-');

    let min_active = options.min_enabled && !min.is_empty();
    let max_active = options.max_enabled && !max.is_empty();

    if options.exact_enabled && !exact.is_empty() {
        tests.extend(pair("-size", exact));
    } else if min_active && max_active {
        tests.extend(pair("-size", &min));
        tests.extend(pair("-size", &max));
    } else if min_active {
        tests.extend(pair("-size", &min));
    } else if max_active {
        tests.extend(pair("-size", &max));
    } else if options.empty_enabled {
        tests.push("-empty".to_string());
    }

    if !options.include_zero_byte {
        tests.extend(["!", "-size", "0"].map(String::from));
    }
}

fn letter_group(tests: &mut Vec<String>, flag: &str, letters: &str) {
    let expressions = letters
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|letter| pair(flag, &letter.to_string()))
        .collect();
    or_group(tests, expressions);
}

fn add_type_tests(tests: &mut Vec<String>, options: &TypeFilterOptions) {
    if options.type_enabled {
        letter_group(tests, "-type", &options.type_letters);
    }
    if options.xtype_enabled {
        letter_group(tests, "-xtype", &options.xtype_letters);
    }
    if options.use_extensions {
        let flag = if options.extension_case_insensitive {
            "-iname"
        } else {
            "-name"
        };
        let expressions = split_patterns(&options.extensions)
            .iter()
            .map(|ext| pair(flag, &format!("*.{ext}")))
            .collect();
        or_group(tests, expressions);
    }
}

fn add_permission_tests(tests: &mut Vec<String>, options: &PermissionOwnershipOptions) {
    for (enabled, flag) in [
        (options.readable, "-readable"),
        (options.writable, "-writable"),
        (options.executable, "-executable"),
    ] {
        if enabled {
            tests.push(flag.to_string());
        }
    }

    if options.perm_enabled && !options.perm_spec.is_empty() {
        let spec = match options.perm_mode {
            PermissionMatch::Exact => options.perm_spec.clone(),
            PermissionMatch::AllBits => format!("-{}", options.perm_spec),
            PermissionMatch::AnyBit => format!("/{}", options.perm_spec),
        };
        tests.extend(pair("-perm", &spec));
    }

    push_if(tests, options.user_enabled, "-user", &options.user);
    push_if(tests, options.uid_enabled, "-uid", &options.uid);
    push_if(tests, options.group_enabled, "-group", &options.group);
    push_if(tests, options.gid_enabled, "-gid", &options.gid);

    if options.no_user {
        tests.push("-nouser".to_string());
    }
    if options.no_group {
        tests.push("-nogroup".to_string());
    }
}

fn prune_expression(spec: &Specification) -> Option<Expr> {
    let options = &spec.name_path_options;
    if !spec.enable_name_path_tests || !options.prune_active() {
        return None;
    }
    Some(pair(options.prune_test.flag(), &options.prune_pattern))
}

/// Action tokens, or a bare `-print` when actions are off or produce nothing.
fn build_actions(spec: &Specification, include_actions: bool) -> Vec<String> {
    if !include_actions || !spec.enable_action_options {
        return vec!["-print".to_string()];
    }

    let mut actions = spec.action_options.clone();
    actions.ensure_print();
    let tokens = action_tokens(&actions);
    if tokens.is_empty() {
        vec!["-print".to_string()]
    } else {
        tokens
    }
}

/// Tokens for every selected action, in `find`'s conventional order.
pub fn action_tokens(options: &ActionOptions) -> Vec<String> {
    let mut tokens = Vec::new();

    for (enabled, flag) in [
        (options.print, "-print"),
        (options.print0, "-print0"),
        (options.ls, "-ls"),
        (options.delete_matches, "-delete"),
        (options.quit_early, "-quit"),
    ] {
        if enabled {
            tokens.push(flag.to_string());
        }
    }

    if options.exec_enabled {
        let command = split_command(&options.exec_command);
        if !command.is_empty() {
            tokens.push(options.exec_variant.flag().to_string());
            tokens.extend(command);
            tokens.push(if options.exec_use_plus { "+" } else { ";" }.to_string());
        }
    }

    push_if(&mut tokens, options.fprint_enabled, "-fprint", &options.fprint_file);
    push_if(&mut tokens, options.fprint0_enabled, "-fprint0", &options.fprint0_file);
    push_if(&mut tokens, options.fls_enabled, "-fls", &options.fls_file);
    push_if(&mut tokens, options.printf_enabled, "-printf", &options.printf_format);

    if options.fprintf_enabled && !options.fprintf_file.is_empty() {
        tokens.extend([
            "-fprintf".to_string(),
            options.fprintf_file.clone(),
            options.fprintf_format.clone(),
        ]);
    }

    tokens
}
