//! Which inputs of a node changed since its previous render.

use fiberscope_value::{Value, deep_equal};

use crate::node::FiberNode;

/// Why a component re-rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeReason {
    /// A prop changed.
    Props,
    /// Hook or class state changed.
    State,
    /// A consumed context changed.
    Context,
}

/// One input that differs from the previous render.
#[derive(Debug, Clone, PartialEq)]
pub struct InputChange {
    /// The prop name.
    pub name: String,
    /// Its value now.
    pub value: Value,
    /// Its value in the previous render (`undefined` if it was absent).
    pub previous_value: Value,
    /// What kind of input this is.
    pub reason: ChangeReason,
}

/// Props of `fiber` that differ, deeply, from its previous props.
///
/// `children` is never reported.
pub fn changed_inputs<F: FiberNode>(fiber: &F) -> Vec<InputChange> {
    changed_inputs_except(fiber, &["children"])
}

/// [`changed_inputs`] with an explicit list of prop names to skip.
pub fn changed_inputs_except<F: FiberNode>(fiber: &F, skip: &[&str]) -> Vec<InputChange> {
    let current = fiber.memoized_props();
    let previous = fiber.previous_props();

    let Some(fields) = current.as_record().and_then(|r| r.read().map(|r| r.clone())) else {
        return Vec::new();
    };

    fields
        .into_iter()
        .filter(|(name, _)| !skip.contains(&name.as_str()))
        .filter_map(|(name, value)| {
            let previous_value = previous.get(&name).unwrap_or_default();
            if deep_equal(&value, &previous_value) {
                return None;
            }
            trace!(%name, "prop changed");
            Some(InputChange {
                name,
                value,
                previous_value,
                reason: ChangeReason::Props,
            })
        })
        .collect()
}
