//! Text processing utilities shared by the compiler and the store.

/// Maximum length of a storage slug.
pub const MAX_SLUG_LENGTH: usize = 64;

/// Split `value` on `separator`, trimming items and dropping empty ones.
pub fn split_list(value: &str, separator: char) -> Vec<String> {
    value
        .split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Split a list that may use commas, spaces, or both as separators.
pub fn split_patterns(value: &str) -> Vec<String> {
    split_list(value, ',')
        .iter()
        .flat_map(|item| split_list(item, ' '))
        .collect()
}

/// Whitespace-separated terms.
pub fn tokenize_terms(input: &str) -> Vec<String> {
    input.split_whitespace().map(String::from).collect()
}

/// Split a command line the way a POSIX shell would for simple input.
///
/// Single and double quotes group words (a closing quote always ends the
/// current token, so `''` yields an empty argument) and a backslash outside
/// single quotes escapes the next character.
pub fn split_command(command: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_single = false;
    let mut in_double = false;
    let mut chars = command.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' if !in_double => {
                if in_single || !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                in_single = !in_single;
            }
            '"' if !in_single => {
                if in_double || !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                in_double = !in_double;
            }
            c if c.is_whitespace() && !in_single && !in_double => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            '\\' if !in_single => match chars.next() {
                Some(next) => current.push(next),
                None => current.push('\\'),
            },
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Derive a filesystem-safe storage key from a display name.
///
/// ASCII alphanumerics are kept (lowercased), runs of whitespace, `-`, `_`
/// and `.` collapse into a single dash, anything else is dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_dash = false;
        } else if (matches!(ch, '-' | '_' | '.') || ch.is_whitespace())
            && !last_was_dash
            && !slug.is_empty()
        {
            slug.push('-');
            last_was_dash = true;
        }
    }

    let trimmed = slug.trim_matches('-');
    let mut slug = if trimmed.is_empty() {
        "spec".to_string()
    } else {
        trimmed.to_string()
    };
    slug.truncate(MAX_SLUG_LENGTH);
    slug
}

/// Truncate `value` to at most `max_bytes`, backing off to a char boundary.
pub fn truncate_to(value: &mut String, max_bytes: usize) {
    if value.len() <= max_bytes {
        return;
    }
    let mut end = max_bytes;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    value.truncate(end);
}

/// Quote a token for display in a POSIX shell.
pub fn shell_quote(token: &str) -> String {
    let safe = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if safe {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" a, b ,,c ", ','), vec!["a", "b", "c"]);
        assert!(split_list("  ", ',').is_empty());
    }

    #[test]
    fn test_split_patterns_mixed_separators() {
        assert_eq!(
            split_patterns("rs, toml md,,  txt"),
            vec!["rs", "toml", "md", "txt"]
        );
    }

    #[test]
    fn test_tokenize_terms() {
        assert_eq!(tokenize_terms("  foo\tbar \n baz "), vec!["foo", "bar", "baz"]);
        assert!(tokenize_terms("   ").is_empty());
    }

    #[test]
    fn test_split_command_quotes_and_escapes() {
        assert_eq!(split_command("grep -n foo {}"), vec!["grep", "-n", "foo", "{}"]);
        assert_eq!(
            split_command(r#"sh -c 'echo "$1"' _ {}"#),
            vec!["sh", "-c", r#"echo "$1""#, "_", "{}"]
        );
        assert_eq!(split_command(r"echo a\ b"), vec!["echo", "a b"]);
        assert_eq!(split_command("echo ''"), vec!["echo", ""]);
        assert!(split_command("   ").is_empty());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My Spec"), "my-spec");
        assert_eq!(slugify("  Rust -- sources_v1.2  "), "rust-sources-v1-2");
        assert_eq!(slugify("---"), "spec");
        assert_eq!(slugify("日本語"), "spec");
        assert_eq!(slugify("Ünïcode name"), "ncode-name");
    }

    #[test]
    fn test_slugify_caps_length() {
        let slug = slugify(&"a".repeat(100));
        assert_eq!(slug.len(), MAX_SLUG_LENGTH);
    }

    #[test]
    fn test_truncate_to_respects_char_boundary() {
        let mut value = "héllo".to_string();
        truncate_to(&mut value, 2);
        assert_eq!(value, "h");

        let mut value = "short".to_string();
        truncate_to(&mut value, 10);
        assert_eq!(value, "short");
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("-name"), "-name");
        assert_eq!(shell_quote("*.rs"), "'*.rs'");
        assert_eq!(shell_quote("("), "'('");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
    }
}
