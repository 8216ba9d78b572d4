//! Glob-lite matching over `/`-separated relative paths.
//!
//! `*` matches within one segment, `**` spans any number of segments and
//! `?` matches one non-separator character. Character classes are not
//! supported.

use regex::Regex;

pub fn glob_to_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut out = String::from("^");
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("(?:.*/)?");
                } else {
                    out.push_str(".*");
                }
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            c => out.push_str(&regex::escape(&c.to_string())),
        }
    }

    out.push('$');
    Regex::new(&out)
}

/// A compiled glob; invalid patterns match nothing.
#[derive(Debug, Clone)]
pub struct Glob {
    regex: Option<Regex>,
}

impl Glob {
    pub fn new(pattern: &str) -> Self {
        Self {
            regex: glob_to_regex(pattern).ok(),
        }
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.as_ref().map_or(false, |re| re.is_match(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        star_in_segment = { "src/*.rs", "src/main.rs", true },
        star_stops_at_slash = { "src/*.rs", "src/bin/cli.rs", false },
        double_star_any_depth = { "**/*.rs", "src/bin/cli.rs", true },
        double_star_zero_dirs = { "**/*.rs", "build.rs", true },
        nested_double_star = { "src/main/**/Application.java", "src/main/java/com/example/Application.java", true },
        question_mark = { "v?.txt", "v1.txt", true },
        dot_is_literal = { "*.json", "package_json", false },
        exact = { "Dockerfile", "Dockerfile", true },
    )]
    fn test_glob(pattern: &str, path: &str, expected: bool) {
        assert_eq!(Glob::new(pattern).is_match(path), expected);
    }
}
