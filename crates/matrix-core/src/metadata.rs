//! # Plugin Metadata Reader
//!
//! Reads the handful of declarations the filter needs out of a plugin's
//! `version.php`:
//!
//! ```php
//! $plugin->component = 'local_example';
//! $plugin->supported = [35, 401];
//! $plugin->requires  = 2018120300;
//! ```
//!
//! The file is never executed. Comments are stripped, the three
//! assignments are matched, and everything else is ignored. When an
//! assignment is repeated the last one wins. A zero `requires` and an
//! empty `supported` count as not declared.

use crate::types::{PluginMetadata, SupportedRange};
use crate::version::NumericVersion;
use crate::MatrixError;
use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("metadata pattern is a valid regex")
}

static COMPONENT: Lazy<Regex> =
    Lazy::new(|| compile(r#"\$plugin\s*->\s*component\s*=\s*(?:'([^']*)'|"([^"]*)")\s*;"#));
static SUPPORTED: Lazy<Regex> = Lazy::new(|| {
    compile(r"\$plugin\s*->\s*supported\s*=\s*(?:\[([^\]]*)\]|array\s*\(([^)]*)\))\s*;")
});
static REQUIRES: Lazy<Regex> =
    Lazy::new(|| compile(r"\$plugin\s*->\s*requires\s*=\s*([0-9][0-9_]*(?:\.[0-9_]*)?)\s*;"));

/// Parse the metadata declarations out of `version.php` source text.
pub fn parse_version_file(source: &str) -> Result<PluginMetadata, MatrixError> {
    let code = strip_comments(source);

    let component = COMPONENT.captures_iter(&code).last().and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    });

    let supported = match SUPPORTED.captures_iter(&code).last() {
        Some(caps) => {
            let items = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            parse_supported(items)?
        }
        None => None,
    };

    let requires = REQUIRES
        .captures_iter(&code)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().replace('_', "").parse::<NumericVersion>())
        .transpose()
        .map_err(|e| MatrixError::MetadataParse(format!("$plugin->requires: {e}")))?
        .filter(|version| !version.is_zero());

    Ok(PluginMetadata {
        component,
        supported,
        requires,
    })
}

/// Remove `//`, `#` and `/* */` comments, leaving quoted strings intact.
///
/// Line comments keep their terminating newline.
fn strip_comments(source: &str) -> String {
    let mut code = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            code.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    code.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' => {
                quote = Some(c);
                code.push(c);
            }
            '#' => skip_line(&mut chars),
            '/' if chars.peek() == Some(&'/') => skip_line(&mut chars),
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut previous = '\0';
                for next in chars.by_ref() {
                    if previous == '*' && next == '/' {
                        break;
                    }
                    previous = next;
                }
                code.push(' ');
            }
            _ => code.push(c),
        }
    }
    code
}

fn skip_line(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while chars.next_if(|&c| c != '\n').is_some() {}
}

/// Parse the body of a `supported` array. An empty array means no range.
fn parse_supported(items: &str) -> Result<Option<SupportedRange>, MatrixError> {
    let bounds = items
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.replace('_', "").parse::<u32>().map_err(|_| {
                MatrixError::MetadataParse(format!("$plugin->supported: {item:?} is not a branch number"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    match bounds.as_slice() {
        [] => Ok(None),
        [lower, upper] => Ok(Some(SupportedRange::new(*lower, *upper))),
        _ => Err(MatrixError::MetadataParse(format!(
            "$plugin->supported needs exactly two branches, found {}",
            bounds.len()
        ))),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const VERSION_PHP: &str = r#"<?php
// This file is part of Moodle - https://moodle.org/
defined('MOODLE_INTERNAL') || die();

$plugin->component = 'local_example';
$plugin->version   = 2023010100;
$plugin->release   = 2023010100;
$plugin->requires  = 2018120300;    // Moodle 3.6.
$plugin->supported = [35, 401];
$plugin->maturity  = MATURITY_STABLE;
"#;

    #[test]
    fn reads_all_three_fields() {
        let meta = parse_version_file(VERSION_PHP).expect("parse");
        assert_eq!(meta.component.as_deref(), Some("local_example"));
        assert_eq!(meta.supported, Some(SupportedRange::new(35, 401)));
        assert_eq!(meta.requires, Some(NumericVersion::from_whole(2018120300)));
    }

    #[test]
    fn fields_are_optional() {
        let meta = parse_version_file("<?php\n$plugin->version = 2023010100;\n").expect("parse");
        assert_eq!(meta, PluginMetadata::default());
    }

    #[test]
    fn commented_out_declarations_are_ignored() {
        let source = r#"<?php
$plugin->component = "tool_thing";
// $plugin->supported = [35, 39];
/*
$plugin->requires = 2015051100;
*/
# $plugin->requires = 2016052300;
"#;
        let meta = parse_version_file(source).expect("parse");
        assert_eq!(meta.component.as_deref(), Some("tool_thing"));
        assert_eq!(meta.supported, None);
        assert_eq!(meta.requires, None);
    }

    #[test]
    fn comments_right_after_a_statement_are_ignored() {
        let source = "<?php\n$plugin->component = 'local_x';//$plugin->supported=[1,2];\n\
                      $plugin->requires = 2018120300;#$plugin->supported = [3, 4];\n";
        let meta = parse_version_file(source).expect("parse");
        assert_eq!(meta.component.as_deref(), Some("local_x"));
        assert_eq!(meta.supported, None);
        assert_eq!(meta.requires, Some(NumericVersion::from_whole(2018120300)));
    }

    #[test]
    fn comment_markers_inside_strings_are_kept() {
        let source = "<?php\n$plugin->release = 'v1 // see https://example.org/#a';\n\
                      $plugin->component = \"local_/*x*/\";\n$plugin->supported = [39, 401];\n";
        let meta = parse_version_file(source).expect("parse");
        assert_eq!(meta.component.as_deref(), Some("local_/*x*/"));
        assert_eq!(meta.supported, Some(SupportedRange::new(39, 401)));
    }

    #[test]
    fn zero_requires_means_absent() {
        let meta = parse_version_file("<?php\n$plugin->requires = 0;\n").expect("parse");
        assert_eq!(meta.requires, None);
        let meta = parse_version_file("<?php\n$plugin->requires = 0.0;\n").expect("parse");
        assert_eq!(meta.requires, None);
    }

    #[test]
    fn long_array_syntax_and_decimals() {
        let source = "<?php\n$plugin->supported = array(39, 311);\n$plugin->requires = 2020061500.00;\n";
        let meta = parse_version_file(source).expect("parse");
        assert_eq!(meta.supported, Some(SupportedRange::new(39, 311)));
        assert_eq!(meta.requires, "2020061500".parse().ok());
    }

    #[test]
    fn last_assignment_wins() {
        let source = "<?php\n$plugin->supported = [35, 39];\n$plugin->supported = [38, 400];\n";
        let meta = parse_version_file(source).expect("parse");
        assert_eq!(meta.supported, Some(SupportedRange::new(38, 400)));
    }

    #[test]
    fn empty_supported_means_absent() {
        let meta = parse_version_file("<?php\n$plugin->supported = [];\n").expect("parse");
        assert_eq!(meta.supported, None);
    }

    #[test]
    fn malformed_supported_is_an_error() {
        let one = parse_version_file("<?php\n$plugin->supported = [35];\n");
        assert!(matches!(one, Err(MatrixError::MetadataParse(_))));

        let words = parse_version_file("<?php\n$plugin->supported = [35, 'main'];\n");
        assert!(matches!(words, Err(MatrixError::MetadataParse(_))));
    }

    #[test]
    fn numeric_separators_are_accepted() {
        let meta = parse_version_file("<?php\n$plugin->requires = 2018_12_03_00;\n").expect("parse");
        assert_eq!(meta.requires, Some(NumericVersion::from_whole(2018120300)));
    }
}
