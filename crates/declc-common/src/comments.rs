//! Documentation comment extraction.
//!
//! The front-end hands the raw text of a `/** ... */` block that immediately
//! precedes a declaration; this module strips the comment framing and pulls
//! out the tags the model cares about.

use serde::Serialize;

/// A parsed documentation comment attached to a declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DocComment {
    /// Comment body with framing and leading `*` gutters removed.
    pub text: String,
    /// Set when the body carries an `@deprecated` tag.
    pub deprecated: bool,
    /// Set when the body carries an `@systemapi` tag.
    pub system_api: bool,
}

impl DocComment {
    /// Parse the raw source text of a doc comment block.
    ///
    /// Accepts the full `/** ... */` text. Leading `*` gutters on
    /// continuation lines are stripped, tag detection is case-insensitive
    /// on the tag name only.
    pub fn parse(raw: &str) -> DocComment {
        let inner = raw
            .strip_prefix("/**")
            .unwrap_or(raw)
            .strip_suffix("*/")
            .unwrap_or(raw);

        let mut lines = Vec::new();
        for line in inner.lines() {
            let trimmed = line.trim_start();
            let body = trimmed.strip_prefix('*').unwrap_or(trimmed);
            let body = body.strip_prefix(' ').unwrap_or(body);
            lines.push(body.trim_end());
        }
        while lines.first().is_some_and(|l| l.trim().is_empty()) {
            lines.remove(0);
        }
        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }
        let text = lines.join("\n");

        let deprecated = has_tag(&text, "deprecated");
        let system_api = has_tag(&text, "systemapi");

        DocComment {
            text,
            deprecated,
            system_api,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && !self.deprecated && !self.system_api
    }
}

/// Whether `@tag` appears at a tag position (start of a line or after
/// whitespace), not merely as a substring of prose.
fn has_tag(text: &str, tag: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    let needle = format!("@{tag}");
    let mut from = 0;
    while let Some(pos) = lower[from..].find(&needle) {
        let abs = from + pos;
        let before_ok = abs == 0
            || lower[..abs]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_whitespace());
        let after = lower[abs + needle.len()..].chars().next();
        let after_ok = after.is_none_or(|c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        from = abs + needle.len();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_gutter_and_framing() {
        let doc = DocComment::parse("/**\n * Adds two numbers.\n * @param a left\n */");
        assert_eq!(doc.text, "Adds two numbers.\n@param a left");
        assert!(!doc.deprecated);
    }

    #[test]
    fn detects_deprecated_tag() {
        let doc = DocComment::parse("/** Old API. @deprecated since 9 */");
        assert!(doc.deprecated);
        assert!(!doc.system_api);
    }

    #[test]
    fn detects_systemapi_tag() {
        let doc = DocComment::parse("/**\n * @systemapi\n */");
        assert!(doc.system_api);
    }

    #[test]
    fn tag_not_matched_inside_word() {
        let doc = DocComment::parse("/** mail me at x@deprecatedmail.com */");
        assert!(!doc.deprecated);
    }

    #[test]
    fn single_line_comment_kept_verbatim() {
        let doc = DocComment::parse("/** Adds two numbers. */");
        assert_eq!(doc.text, "Adds two numbers.");
    }
}
