//! String-level repair of near-JSON text.
//!
//! Nothing in here parses; every function is a total `&str -> String`
//! transform, so callers can chain them freely.

use once_cell::sync::Lazy;
use regex::Regex;

static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",(\s*[}\]])").expect("trailing comma pattern"));

static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("blank line pattern"));

static QUIZ_OPENING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""quiz":\s*\[\s*\{"#).expect("quiz opening pattern"));

static STRUCTURAL_GAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(["\]}])\s*([,\]}])"#).expect("structural gap pattern"));

/// Full repair: unescape, normalize whitespace, trim, drop trailing commas,
/// strip control characters.
pub fn sanitize(text: &str) -> String {
    let text = unescape_literals(text);
    let text = normalize_whitespace(&text);
    let text = remove_trailing_commas(text.trim());
    strip_control_chars(&text)
}

/// Turns literal `\n`, `\"` and `\\` sequences into the characters they name.
pub fn unescape_literals(text: &str) -> String {
    text.replace("\\n", "\n")
        .replace("\\\"", "\"")
        .replace("\\\\", "\\")
}

pub fn normalize_whitespace(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\t', "  ")
}

pub fn remove_trailing_commas(text: &str) -> String {
    TRAILING_COMMA.replace_all(text, "$1").into_owned()
}

/// Removes C0 and C1 control characters (U+0000-U+001F, U+007F-U+009F).
pub fn strip_control_chars(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}

pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_LINES.replace_all(text, "\n").into_owned()
}

/// Pulls separators up against the token they follow, e.g. `"x"  ,` -> `"x",`.
pub fn tighten_structure(text: &str) -> String {
    let text = QUIZ_OPENING.replace_all(text, r#""quiz": [{"#);
    STRUCTURAL_GAP.replace_all(&text, "$1$2").into_owned()
}

/// Undoes one level of double escaping (`\\n` -> `\n`, `\\"` -> `\"`, `\\t` -> `\t`).
pub fn collapse_double_escapes(text: &str) -> String {
    text.replace("\\\\n", "\\n")
        .replace("\\\\\"", "\\\"")
        .replace("\\\\t", "\\t")
}

/// Repair applied to the interior of a fenced block before parsing.
pub fn repair_candidate(text: &str) -> String {
    let text = unescape_literals(text);
    let text = normalize_whitespace(&text);
    let text = remove_trailing_commas(text.trim());
    let text = collapse_blank_lines(&text);
    let text = remove_trailing_commas(&text);
    let text = tighten_structure(&text);
    strip_control_chars(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_literals() {
        assert_eq!(unescape_literals(r#"{\"a\":\n1}"#), "{\"a\":\n1}");
        assert_eq!(unescape_literals(r"C:\\temp"), r"C:\temp");
    }

    #[test]
    fn test_trailing_commas_removed() {
        assert_eq!(remove_trailing_commas("[1, 2, ]"), "[1, 2 ]");
        assert_eq!(remove_trailing_commas("{\"a\": 1,\n}"), "{\"a\": 1\n}");
        assert_eq!(remove_trailing_commas("\"a, b\""), "\"a, b\"");
    }

    #[test]
    fn test_strip_control_chars() {
        let input = "a\u{0000}b\u{001F}c\u{007F}d\u{009F}e\u{00A0}";
        assert_eq!(strip_control_chars(input), "abcde\u{00A0}");
    }

    #[test]
    fn test_sanitize_applies_every_step() {
        let input = "  {\\\"title\\\": \"X\",\r\n\t\"tags\": [\"a\",],}  ";
        let out = sanitize(input);
        assert_eq!(out, "{\"title\": \"X\",  \"tags\": [\"a\"]}");
        assert!(serde_json::from_str::<serde_json::Value>(&out).is_ok());
    }

    #[test]
    fn test_sanitize_never_panics_on_odd_input() {
        for input in ["", "\\", "\\\\\\", "\u{0085}", ",}", "```"] {
            let _ = sanitize(input);
        }
    }

    #[test]
    fn test_tighten_structure() {
        assert_eq!(tighten_structure("[\"a\" , \"b\" ]"), "[\"a\", \"b\"]");
        assert_eq!(
            tighten_structure("\"quiz\":  [\n  {\"q\": 1} ]"),
            "\"quiz\": [{\"q\": 1}]"
        );
    }

    #[test]
    fn test_collapse_double_escapes() {
        assert_eq!(
            collapse_double_escapes(r#"{"a":"x\\ny"}"#),
            r#"{"a":"x\ny"}"#
        );
    }

    #[test]
    fn test_repair_candidate_handles_llm_artifacts() {
        let block = "{\n  \"title\": \"T\" ,\n\n  \"modules\": [\n    {\"module_title\": \"M\"},\n  ],\n}";
        let repaired = repair_candidate(block);
        let value: serde_json::Value = serde_json::from_str(&repaired).unwrap();
        assert_eq!(value["title"], "T");
        assert_eq!(value["modules"][0]["module_title"], "M");
    }
}
