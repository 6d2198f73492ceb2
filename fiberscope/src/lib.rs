#![warn(missing_docs)]
#![forbid(unsafe_code)]
//! Inspect the components a host page renders.
//!
//! Point an [`Inspector`] at a [`Host`] and an element on the page to get an
//! [`Inspection`]: the component that owns the element, its current and
//! previous props, a structural diff between them and the props that
//! changed. [`Inspector::fields`] lays the props out for display and
//! [`Inspector::commit_edit`] parses edited text back into a value and sends
//! it to every renderer that accepts prop overrides.
//!
//! The building blocks are re-exported:
//!
//! - [`path`]: display paths and segment lists
//! - [`value`]: the value model, previews, clipboard text and edit parsing
//! - [`diff`]: structural diff and change reports
//! - [`tree`]: navigation between elements and components
//! - [`pretty`]: function source formatting

#[macro_use]
mod tracing_macros;

mod inspector;

pub use fiberscope_diff as diff;
pub use fiberscope_path as path;
pub use fiberscope_pretty as pretty;
pub use fiberscope_tree as tree;
pub use fiberscope_value as value;

pub use fiberscope_tree::{FiberNode, Host, HostElement};
pub use fiberscope_value::Value;
pub use inspector::{EditOutcome, FieldView, Inspection, Inspector, InspectorOptions};
