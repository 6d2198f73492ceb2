//! Regex-driven line breaking for function source.

use std::sync::LazyLock;

use regex::Regex;

fn pattern(source: &str) -> Regex {
    Regex::new(source).unwrap_or_else(|e| panic!("normalize pattern {source:?} is invalid: {e}"))
}

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\s+"));
static OPEN_BRACE_SPACE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\{\s+"));
static SEMICOLON_SPACE: LazyLock<Regex> = LazyLock::new(|| pattern(r";\s+"));
static TRAILING_CLOSE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\}\s*$"));
static OPEN_PAREN_SPACE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\(\s+"));
static SPACE_CLOSE_PAREN: LazyLock<Regex> = LazyLock::new(|| pattern(r"\s+\)"));
static COMMA_SPACE: LazyLock<Regex> = LazyLock::new(|| pattern(r",\s+"));
static EMPTY_BLOCK: LazyLock<Regex> = LazyLock::new(|| pattern(r"\{\s+\}"));
static ARROW_BLOCK: LazyLock<Regex> = LazyLock::new(|| pattern(r"=> \{\n"));
static FINAL_CLOSE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\n\s*\}\s*$"));

/// Clipboard form of a function's source.
///
/// Whitespace runs collapse to one space, then a newline and two-space indent
/// follow every `{` and `;` that was followed by whitespace, the final `}` moves
/// to its own line, and spacing inside parentheses and after commas is tidied.
pub fn normalize_function_source(source: &str) -> String {
    let s = WHITESPACE.replace_all(source, " ");
    let s = OPEN_BRACE_SPACE.replace_all(&s, "{\n  ");
    let s = SEMICOLON_SPACE.replace_all(&s, ";\n  ");
    let s = TRAILING_CLOSE.replace_all(&s, "\n}");
    let s = OPEN_PAREN_SPACE.replace_all(&s, "(");
    let s = SPACE_CLOSE_PAREN.replace_all(&s, ")");
    COMMA_SPACE.replace_all(&s, ", ").into_owned()
}

/// Break a function body onto lines at braces and semicolons.
///
/// Empty blocks collapse to `{ }` and an arrow body's opening brace stays on
/// the arrow's line.
pub fn format_function_body(body: &str) -> String {
    let collapsed = WHITESPACE.replace_all(body, " ");
    let s = collapsed
        .trim()
        .replace('{', "{\n  ")
        .replace(';', ";\n  ")
        .replace('}', "\n}");
    let s = EMPTY_BLOCK.replace_all(&s, "{ }");
    let s = ARROW_BLOCK.replace_all(&s, "=> {");
    FINAL_CLOSE.replace_all(&s, " }").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipboard_source_breaks_after_braces_and_statements() {
        let source = "function add( a,  b ) {\n  return a + b;\n}";
        assert_eq!(
            normalize_function_source(source),
            "function add(a, b) {\n  return a + b;\n  \n}"
        );
    }

    #[test]
    fn one_liners_stay_on_one_line() {
        assert_eq!(normalize_function_source("() => 1"), "() => 1");
    }

    #[test]
    fn empty_body_collapses() {
        assert_eq!(format_function_body("{   }"), "{ }");
    }
}
