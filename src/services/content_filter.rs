//! In-process content check applied to captured matches.

use std::path::{Path, PathBuf};

use regex::RegexBuilder;
use tracing::debug;

use crate::models::{Specification, TextMatchMode, TextSearchOptions};
use crate::utils::file::{is_binary_file, read_file_lossy};
use crate::utils::text::tokenize_terms;

/// Terms and pattern derived once from a specification's search text.
#[derive(Debug, Clone)]
pub struct ContentMatcher {
    options: TextSearchOptions,
    terms: Vec<String>,
    pattern: String,
}

impl ContentMatcher {
    pub fn new(spec: &Specification) -> Self {
        let text = spec.search_text.trim();
        let terms = if spec.text_options.allow_multiple_terms {
            tokenize_terms(text)
        } else {
            vec![text.to_string()]
        };

        Self {
            options: spec.text_options.clone(),
            terms,
            pattern: spec.search_text.clone(),
        }
    }

    /// Whether the file at `path` satisfies the search text.
    ///
    /// Binary files are rejected unless binary-as-text is set. Unreadable
    /// files never match.
    pub fn matches_file(&self, path: &Path) -> bool {
        if !self.options.treat_binary_as_text && is_binary_file(path) {
            return false;
        }

        match read_file_lossy(path) {
            Ok(content) => self.matches_text(&content),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "skipping unreadable file");
                false
            }
        }
    }

    pub fn matches_text(&self, content: &str) -> bool {
        let insensitive = !self.options.match_case;
        match self.options.mode {
            TextMatchMode::Contains => matches_contains(content, &self.terms, insensitive),
            TextMatchMode::WholeWord => matches_whole_word(content, &self.terms, insensitive),
            TextMatchMode::RegularExpression => matches_regex(content, &self.pattern, insensitive),
        }
    }
}

/// Keep matches whose content satisfies `spec`'s search text.
///
/// Paths that are not regular files (directories, sockets, dangling links)
/// pass through untouched.
pub fn filter_matches(matches: Vec<PathBuf>, spec: &Specification) -> Vec<PathBuf> {
    let matcher = ContentMatcher::new(spec);
    let before = matches.len();

    let kept: Vec<PathBuf> = matches
        .into_iter()
        .filter(|path| !path.is_file() || matcher.matches_file(path))
        .collect();

    debug!(before, after = kept.len(), "content filter applied");
    kept
}

/// Every term appears as a substring.
pub fn matches_contains(haystack: &str, terms: &[String], case_insensitive: bool) -> bool {
    if case_insensitive {
        let haystack = haystack.to_lowercase();
        terms
            .iter()
            .all(|term| haystack.contains(&term.to_lowercase()))
    } else {
        terms.iter().all(|term| haystack.contains(term.as_str()))
    }
}

/// Every term equals one of the whitespace-separated words.
pub fn matches_whole_word(haystack: &str, terms: &[String], case_insensitive: bool) -> bool {
    let fold = |s: &str| {
        if case_insensitive {
            s.to_lowercase()
        } else {
            s.to_string()
        }
    };

    let words: Vec<String> = haystack.split_whitespace().map(fold).collect();
    terms.iter().all(|term| {
        let term = fold(term);
        words.iter().any(|word| *word == term)
    })
}

/// The pattern is found somewhere in the haystack. Invalid patterns never match.
pub fn matches_regex(haystack: &str, pattern: &str, case_insensitive: bool) -> bool {
    match RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
    {
        Ok(re) => re.is_match(haystack),
        Err(e) => {
            debug!(pattern, error = %e, "invalid content pattern");
            false
        }
    }
}
