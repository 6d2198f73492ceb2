//! Forwarding edits to every renderer that accepts them.

use fiberscope_value::Value;

use crate::host::{Host, Renderer};
use crate::node::FiberNode;

/// How a hook state override was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStateOverride {
    /// The hook's own update queue took the value.
    Dispatched,
    /// Forwarded to this many renderers.
    Forwarded(usize),
}

/// The override capabilities of every renderer in a host's devtools hook,
/// chained so one call reaches them all.
pub struct OverrideMethods<'h, H: Host> {
    props: Vec<&'h dyn Renderer<H>>,
    hook_state: Vec<&'h dyn Renderer<H>>,
}

impl<'h, H: Host> OverrideMethods<'h, H> {
    /// Gather the capabilities of `host`'s renderers. Empty when no hook is
    /// installed.
    pub fn collect(host: &'h H) -> Self {
        let mut props = Vec::new();
        let mut hook_state = Vec::new();
        if let Some(hook) = host.devtools_hook() {
            for (_id, renderer) in hook.renderers() {
                let capabilities = renderer.capabilities();
                trace!(renderer = ?_id, ?capabilities, "collecting override capabilities");
                if capabilities.override_props {
                    props.push(renderer);
                }
                if capabilities.override_hook_state {
                    hook_state.push(renderer);
                }
            }
        }
        Self { props, hook_state }
    }

    /// Whether any renderer can override props.
    pub fn supports_props(&self) -> bool {
        !self.props.is_empty()
    }

    /// Whether any renderer can override hook state.
    pub fn supports_hook_state(&self) -> bool {
        !self.hook_state.is_empty()
    }

    /// Set the prop at `path` on `fiber` through every capable renderer.
    /// Returns how many accepted it.
    pub fn override_props(&self, fiber: &H::Fiber, path: &[String], value: &Value) -> usize {
        self.props
            .iter()
            .filter(|renderer| match renderer.override_props(fiber, path, value) {
                Ok(()) => true,
                Err(_err) => {
                    debug!(error = %_err, "prop override failed");
                    false
                }
            })
            .count()
    }

    /// Set the state of hook `id` on `fiber`.
    ///
    /// A numeric `id` is first tried against the fiber's own hook queue;
    /// otherwise the edit goes to every capable renderer.
    pub fn override_hook_state(&self, fiber: &H::Fiber, id: &str, path: &[String], value: &Value) -> HookStateOverride {
        if let Ok(index) = id.parse::<usize>()
            && fiber.dispatch_hook_state(index, value)
        {
            trace!(index, "hook state dispatched through its queue");
            return HookStateOverride::Dispatched;
        }

        let accepted = self
            .hook_state
            .iter()
            .filter(|renderer| match renderer.override_hook_state(fiber, id, path, value) {
                Ok(()) => true,
                Err(_err) => {
                    debug!(error = %_err, id, "hook state override failed");
                    false
                }
            })
            .count();
        HookStateOverride::Forwarded(accepted)
    }
}
