//! Blank-line normalization between runs of list lines.

use std::sync::LazyLock;

use regex::Regex;

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid newline regex"));

/// Class of a rendered line, taken from its leading token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineClass {
    /// `- [ ]` or `- [x]`
    Checkbox,
    /// `* `
    Bullet,
    /// `1. `
    Numbered,
    /// Anything else, including blank lines
    #[default]
    Other,
}

impl LineClass {
    /// Classify a line, ignoring leading tabs and spaces.
    pub fn of(line: &str) -> Self {
        let line = line.trim_start();
        if line.starts_with("- [ ]") || line.starts_with("- [x]") {
            LineClass::Checkbox
        } else if line.starts_with("* ") {
            LineClass::Bullet
        } else if line.starts_with("1. ") {
            LineClass::Numbered
        } else {
            LineClass::Other
        }
    }

    /// Check if this is one of the list classes.
    pub fn is_list(self) -> bool {
        self != LineClass::Other
    }
}

/// Normalize blank lines in a rendered document.
///
/// Blank lines inside a run of list lines are dropped, one blank line is
/// placed wherever the line class changes, and longer blank runs are
/// collapsed to one. The result ends with exactly one newline. Applying the
/// pass twice gives the same string.
pub fn normalize(markdown: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut prev = LineClass::Other;

    for line in markdown.lines() {
        let class = LineClass::of(line);

        if prev.is_list() && line.is_empty() {
            continue;
        }

        if class != prev {
            lines.push("");
        }

        lines.push(line);
        prev = class;
    }

    let joined = lines.join("\n");
    let collapsed = EXCESS_NEWLINES.replace_all(&joined, "\n\n");

    let mut result = collapsed.trim_matches('\n').to_string();
    if !result.is_empty() {
        result.push('\n');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_class() {
        assert_eq!(LineClass::of("- [x] done"), LineClass::Checkbox);
        assert_eq!(LineClass::of("\t\t- [ ] todo"), LineClass::Checkbox);
        assert_eq!(LineClass::of("  * item"), LineClass::Bullet);
        assert_eq!(LineClass::of("1. first"), LineClass::Numbered);
        assert_eq!(LineClass::of("# Heading"), LineClass::Other);
        assert_eq!(LineClass::of("- plain dash"), LineClass::Other);
        assert_eq!(LineClass::of(""), LineClass::Other);
    }

    #[test]
    fn test_bullet_run_then_numbered() {
        let input = "* a\n\n* b\n\n* c\n\n1. d\n\n";
        assert_eq!(normalize(input), "* a\n* b\n* c\n\n1. d\n");
    }

    #[test]
    fn test_list_followed_by_paragraph() {
        let input = "Intro\n\n* a\n\n* b\n\nOutro\n\n";
        assert_eq!(normalize(input), "Intro\n\n* a\n* b\n\nOutro\n");
    }

    #[test]
    fn test_nested_checkboxes_stay_grouped() {
        let input = "- [ ] parent\n\n\t- [x] child\n\n- [ ] sibling\n\n";
        assert_eq!(normalize(input), "- [ ] parent\n\t- [x] child\n- [ ] sibling\n");
    }

    #[test]
    fn test_collapses_blank_runs() {
        let input = "# Title\n\n\n\n\nBody\n\n";
        assert_eq!(normalize(input), "# Title\n\nBody\n");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "* a\n\n* b\n\n* c\n\n1. d\n\n",
            "# H\n\nText\n\n- [ ] x\n\n1. y\n\n* z\n\n---\n\n",
            "\n\n\nleading blanks\n\n\n\n1. n\n\n\tcode\n\n",
            "",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\n\n\n"), "");
    }
}
