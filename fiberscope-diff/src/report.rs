//! Human-readable change reports.
//!
//! [`DiffReport`] renders a [`DiffResult`] as one line per change, and
//! [`AggregatedChanges`] counts how often a named input changed across renders.

use fiberscope_value::{Value, format_preview};
use indexmap::IndexMap;
use owo_colors::OwoColorize;

use crate::theme;
use crate::{DiffChange, DiffResult};

/// How a [`DiffReport`] is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Emit ANSI colors.
    pub colors: bool,
    /// Stop after this many changes and summarize the rest.
    pub max_changes: Option<usize>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            colors: true,
            max_changes: None,
        }
    }
}

impl ReportOptions {
    /// Colored output, every change listed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain text without ANSI escapes.
    pub fn plain(mut self) -> Self {
        self.colors = false;
        self
    }

    /// Set whether ANSI colors are emitted.
    pub fn colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    /// List at most `max` changes.
    pub fn max_changes(mut self, max: usize) -> Self {
        self.max_changes = Some(max);
        self
    }
}

/// A diff result ready to be rendered.
///
/// ```
/// use fiberscope_diff::{DiffReport, ReportOptions, diff};
/// use fiberscope_value::Value;
///
/// let result = diff(
///     &Value::record([("count", Value::from(1))]),
///     &Value::record([("count", Value::from(2))]),
/// );
/// let text = DiffReport::new(&result).render(&ReportOptions::new().plain());
/// assert_eq!(text, "count: 1 → 2");
/// ```
pub struct DiffReport<'a> {
    result: &'a DiffResult,
}

impl<'a> DiffReport<'a> {
    /// Wrap a diff result.
    pub const fn new(result: &'a DiffResult) -> Self {
        Self { result }
    }

    /// The wrapped result.
    pub const fn result(&self) -> &'a DiffResult {
        self.result
    }

    /// Render without colors.
    pub fn render_plain(&self) -> String {
        self.render(&ReportOptions::new().plain())
    }

    /// Render one line per change.
    pub fn render(&self, options: &ReportOptions) -> String {
        let changes = &self.result.changes;
        let shown = options.max_changes.unwrap_or(changes.len()).min(changes.len());

        let mut out = String::new();
        for change in &changes[..shown] {
            if !out.is_empty() {
                out.push('\n');
            }
            render_change(&mut out, change, options.colors);
        }

        let hidden = changes.len() - shown;
        if hidden > 0 {
            let note = format!("... and {hidden} more");
            if !out.is_empty() {
                out.push('\n');
            }
            push_styled(&mut out, &note, options.colors, |s| s.color(theme::MUTED).to_string());
        }
        out
    }
}

fn push_styled(out: &mut String, text: &str, colors: bool, style: impl Fn(&str) -> String) {
    if colors {
        out.push_str(&style(text));
    } else {
        out.push_str(text);
    }
}

fn render_change(out: &mut String, change: &DiffChange, colors: bool) {
    let path = if change.path.is_empty() {
        "(root)".to_string()
    } else {
        change.path.to_string()
    };
    push_styled(out, &path, colors, |s| s.color(theme::FIELD_NAME).to_string());
    out.push_str(": ");

    if change.is_circular() {
        push_styled(out, crate::CIRCULAR, colors, |s| s.color(theme::MUTED).to_string());
        return;
    }

    if change.is_same_function() {
        out.push_str(&format_preview(&change.current));
        push_styled(out, " (same source)", colors, |s| s.color(theme::MUTED).to_string());
        return;
    }

    push_styled(out, &format_preview(&change.previous), colors, |s| {
        s.color(theme::DELETION).to_string()
    });
    out.push_str(" → ");
    push_styled(out, &format_preview(&change.current), colors, |s| {
        s.color(theme::INSERTION).to_string()
    });
}

/// Running tally for one named input.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedChange {
    /// The input's name, such as a prop name or a display path.
    pub name: String,
    /// How many renders changed it.
    pub count: usize,
    /// The value before the latest change.
    pub previous: Value,
    /// The value after the latest change.
    pub current: Value,
}

/// Per-name change counts accumulated across renders, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct AggregatedChanges {
    entries: IndexMap<String, AggregatedChange>,
}

impl AggregatedChanges {
    /// No changes recorded yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one change of `name`, keeping the latest values.
    pub fn record(&mut self, name: impl Into<String>, previous: Value, current: Value) {
        let name = name.into();
        match self.entries.get_mut(&name) {
            Some(entry) => {
                entry.count += 1;
                entry.previous = previous;
                entry.current = current;
            }
            None => {
                self.entries.insert(
                    name.clone(),
                    AggregatedChange {
                        name,
                        count: 1,
                        previous,
                        current,
                    },
                );
            }
        }
    }

    /// Count every change in a diff under its formatted path. Cycle markers
    /// and recreated functions are not counted.
    pub fn record_diff(&mut self, result: &DiffResult) {
        for change in &result.changes {
            if change.is_circular() || change.is_same_function() {
                continue;
            }
            self.record(change.path.to_string(), change.previous.clone(), change.current.clone());
        }
    }

    /// The tally for `name`.
    pub fn get(&self, name: &str) -> Option<&AggregatedChange> {
        self.entries.get(name)
    }

    /// Every tally, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &AggregatedChange> {
        self.entries.values()
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff;

    #[test]
    fn long_reports_are_cut_short() {
        let before = Value::array([Value::from(1), Value::from(2), Value::from(3)]);
        let after = Value::array([Value::from(4), Value::from(5), Value::from(6)]);
        let result = diff(&before, &after);
        let text = DiffReport::new(&result).render(&ReportOptions::new().plain().max_changes(1));
        insta::assert_snapshot!(text, @r"
        [0]: 1 → 4
        ... and 2 more
        ");
    }

    #[test]
    fn colored_output_contains_escapes() {
        let result = diff(&Value::from(1), &Value::from(2));
        let text = DiffReport::new(&result).render(&ReportOptions::new());
        assert!(text.contains('\u{1b}'));
        assert_eq!(DiffReport::new(&result).render_plain(), "(root): 1 → 2");
    }

    #[test]
    fn tallies_keep_the_latest_values() {
        let mut tally = AggregatedChanges::new();
        tally.record("count", Value::from(1), Value::from(2));
        tally.record("count", Value::from(2), Value::from(3));
        tally.record("label", Value::from("a"), Value::from("b"));

        let count = tally.get("count").unwrap();
        assert_eq!(count.count, 2);
        assert_eq!(count.current, Value::from(3));
        assert_eq!(tally.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(), ["count", "label"]);
    }
}
