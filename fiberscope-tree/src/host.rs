//! The host runtime as a set of capabilities.

use fiberscope_value::Value;

use crate::node::{FiberNode, FiberRootNode, HostElement};

/// A host capability failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The renderer is mid-render and its references are inconsistent.
    #[error("renderer is mid-render: {0}")]
    MidRender(String),

    /// The renderer doesn't offer this capability.
    #[error("renderer does not support {0}")]
    Unsupported(&'static str),

    /// The object was removed from the page.
    #[error("host object is detached: {0}")]
    Detached(String),
}

/// Optional capabilities a renderer advertises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererCapabilities {
    /// [`Renderer::override_props`] is implemented.
    pub override_props: bool,
    /// [`Renderer::override_hook_state`] is implemented.
    pub override_hook_state: bool,
}

/// A renderer injected into the devtools hook.
pub trait Renderer<H: Host> {
    /// The node that rendered `element`, if this renderer owns it.
    fn find_fiber_by_host_instance(&self, element: &H::Element) -> Result<Option<H::Fiber>, HostError>;

    /// What this renderer can do beyond lookups.
    fn capabilities(&self) -> RendererCapabilities {
        RendererCapabilities::default()
    }

    /// Replace the prop at `path` on `fiber` and re-render.
    fn override_props(&self, fiber: &H::Fiber, path: &[String], value: &Value) -> Result<(), HostError> {
        let _ = (fiber, path, value);
        Err(HostError::Unsupported("prop overrides"))
    }

    /// Replace part of the state of hook `id` on `fiber` and re-render.
    fn override_hook_state(
        &self,
        fiber: &H::Fiber,
        id: &str,
        path: &[String],
        value: &Value,
    ) -> Result<(), HostError> {
        let _ = (fiber, id, path, value);
        Err(HostError::Unsupported("hook state overrides"))
    }
}

/// Identifier the hook hands out on injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RendererId(pub usize);

/// The registry renderers inject themselves into.
pub struct DevToolsHook<H: Host> {
    renderers: Vec<(RendererId, Box<dyn Renderer<H>>)>,
}

impl<H: Host> Default for DevToolsHook<H> {
    fn default() -> Self {
        Self { renderers: Vec::new() }
    }
}

impl<H: Host> DevToolsHook<H> {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a renderer.
    pub fn inject(&mut self, renderer: impl Renderer<H> + 'static) -> RendererId {
        let id = RendererId(self.renderers.len() + 1);
        self.renderers.push((id, Box::new(renderer)));
        id
    }

    /// Registered renderers, in injection order.
    pub fn renderers(&self) -> impl Iterator<Item = (RendererId, &dyn Renderer<H>)> {
        self.renderers.iter().map(|(id, r)| (*id, &**r))
    }

    /// Number of registered renderers.
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    /// Whether no renderer is registered.
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

/// The page a component tree renders into.
pub trait Host: Sized {
    /// Platform element handle.
    type Element: HostElement;
    /// Root container handle.
    type Root: FiberRootNode<Self::Fiber>;
    /// Tree node handle.
    type Fiber: FiberNode<Element = Self::Element, Root = Self::Root>;

    /// The devtools hook, when one is installed.
    fn devtools_hook(&self) -> Option<&DevToolsHook<Self>>;

    /// Whether `root` is a root the instrumentation has seen commit.
    fn is_known_root(&self, root: &Self::Root) -> bool;

    /// The root container a legacy render attached to `element`.
    fn legacy_root_container(&self, element: &Self::Element) -> Option<Self::Root>;

    /// Own property names of `element`.
    fn element_property_keys(&self, element: &Self::Element) -> Vec<String>;

    /// The node stored on `element` under property `key`.
    fn element_internal_instance(&self, element: &Self::Element, key: &str) -> Option<Self::Fiber>;
}
