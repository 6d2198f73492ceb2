#![warn(missing_docs)]
#![forbid(unsafe_code)]
//! Best-effort pretty printing for function source text.
//!
//! The inspector treats functions as opaque values, but it still shows their
//! source: a one-line preview in the field list, an indented listing when a
//! function is expanded, and a whitespace-normalized copy on the clipboard.
//! None of this parses the language; it is token shuffling that produces
//! readable output for typical component callbacks.

mod formatter;
mod normalize;

pub use formatter::format_function_source;
pub use normalize::{format_function_body, normalize_function_source};

use std::sync::LazyLock;

use regex::Regex;

/// Glyph used for functions in previews.
pub const FUNCTION_GLYPH: &str = "ƒ";

static PARAMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:function\s*)?(?:\(([^)]*)\)|([^=>\s]+))\s*=>?")
        .unwrap_or_else(|e| panic!("function parameter pattern is invalid: {e}"))
});

/// Preview text for a function given its source.
///
/// Collapsed previews look like `ƒ (a,b) => ...`. Expanded previews are the
/// source run through [`format_function_source`]. When no parameter list can
/// be found the bare glyph is returned.
pub fn function_preview(source: &str, expanded: bool) -> String {
    let Some(captures) = PARAMS.captures(source) else {
        return FUNCTION_GLYPH.to_string();
    };

    if expanded {
        return format_function_source(source);
    }

    let params = captures
        .get(1)
        .or_else(|| captures.get(2))
        .map(|m| m.as_str())
        .unwrap_or_default();
    let params: String = params.chars().filter(|c| !c.is_whitespace()).collect();

    format!("{FUNCTION_GLYPH} ({params}) => ...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_preview_strips_parameter_whitespace() {
        assert_eq!(function_preview("(a, b) => a + b", false), "ƒ (a,b) => ...");
    }

    #[test]
    fn function_declarations_fall_back_to_the_glyph() {
        // The parameter pattern needs an `=`/`=>` after the list.
        assert_eq!(
            function_preview("function handleClick(event) { return event; }", false),
            FUNCTION_GLYPH
        );
    }

    #[test]
    fn bare_parameter_arrow() {
        assert_eq!(function_preview("x => x * 2", false), "ƒ (x) => ...");
    }

    #[test]
    fn unrecognized_source_is_a_glyph() {
        assert_eq!(function_preview("", false), FUNCTION_GLYPH);
    }
}
