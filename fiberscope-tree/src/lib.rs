#![forbid(unsafe_code)]
//! Navigation of a host's component tree.
//!
//! The host (a page running a component runtime) is reached only through
//! the traits in this crate: [`Host`] for the page, [`FiberNode`] for tree
//! nodes, [`HostElement`] for platform elements and [`Renderer`] for the
//! runtimes injected into the page's [`DevToolsHook`]. On top of those this
//! crate resolves elements to nodes, finds the component that owns an
//! element, tells whether a node is in the snapshot on screen, reports which
//! props changed and lists the elements worth inspecting.
//!
//! Lookups never fail loudly: a miss is `None`, and a renderer that errors is
//! skipped.

#[macro_use]
mod tracing_macros;

mod geometry;
mod host;
mod inputs;
mod inspectable;
mod navigate;
mod node;
mod overrides;

#[cfg(any(test, feature = "fixture"))]
pub mod fixture;

pub use geometry::{GeometryProvider, Rect, associated_rect};
pub use host::{DevToolsHook, Host, HostError, Renderer, RendererCapabilities, RendererId};
pub use inputs::{ChangeReason, InputChange, changed_inputs, changed_inputs_except};
pub use inspectable::{InspectableElement, list_inspectable_elements};
pub use navigate::{
    INTERNAL_INSTANCE_PREFIXES, NON_VISUAL_TAGS, composite_from_element, current_composite_from_element,
    find_component_element, first_backed_element, is_current_snapshot, is_in_tree, is_non_visual_tag,
    nearest_composite_ancestor, nearest_composite_from_element, resolve_fiber,
};
pub use node::{FiberNode, FiberRootNode, HostElement, StateNode, WorkTag};
pub use overrides::{HookStateOverride, OverrideMethods};
