//! An in-memory host for tests and demos.
//!
//! Elements and nodes live in two `indextree` arenas behind one shared
//! handle, so element, node and root handles stay cheap to clone and compare
//! by identity. Links between nodes follow the arena: `parent` is the arena
//! parent, `child` the first child, `sibling` the next sibling.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use fiberscope_value::{Value, apply_at_path};
use indextree::{Arena, NodeId};

use crate::host::{DevToolsHook, Host, HostError, Renderer, RendererCapabilities, RendererId};
use crate::node::{FiberNode, FiberRootNode, HostElement, StateNode, WorkTag};

#[derive(Debug)]
struct ElementData {
    tag_name: String,
}

#[derive(Debug)]
struct Hook {
    state: Value,
    has_queue: bool,
}

#[derive(Debug)]
struct FiberData {
    tag: WorkTag,
    name: Option<String>,
    element: Option<NodeId>,
    root: Option<usize>,
    props: Value,
    alternate: Option<NodeId>,
    hooks: Vec<Hook>,
}

impl FiberData {
    fn new(tag: WorkTag) -> Self {
        Self {
            tag,
            name: None,
            element: None,
            root: None,
            props: Value::record::<&str>([]),
            alternate: None,
            hooks: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
struct Trees {
    elements: Arena<ElementData>,
    fibers: Arena<FiberData>,
    roots: Vec<Option<NodeId>>,
    rendered_by: HashMap<NodeId, NodeId>,
}

type SharedTrees = Rc<RefCell<Trees>>;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $id:ty) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            trees: SharedTrees,
            id: $id,
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id && Rc::ptr_eq(&self.trees, &other.trees)
            }
        }

        impl Eq for $name {}

        impl core::hash::Hash for $name {
            fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
                core::hash::Hash::hash(&self.id, state);
            }
        }
    };
}

handle!(
    /// An element of the fixture document.
    FixtureElement,
    NodeId
);
handle!(
    /// A node of the fixture component tree.
    FixtureFiber,
    NodeId
);
handle!(
    /// A root container of the fixture.
    FixtureRoot,
    usize
);

impl core::fmt::Debug for FixtureElement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "<{}>", self.tag_name())
    }
}

impl core::fmt::Debug for FixtureFiber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = self.display_name().unwrap_or_else(|| format!("{:?}", self.tag()));
        f.write_str(&name)
    }
}

impl core::fmt::Debug for FixtureRoot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "root#{}", self.id)
    }
}

impl HostElement for FixtureElement {
    fn tag_name(&self) -> String {
        let trees = self.trees.borrow();
        trees
            .elements
            .get(self.id)
            .map(|node| node.get().tag_name.clone())
            .unwrap_or_default()
    }

    fn children(&self) -> Vec<Self> {
        let trees = self.trees.borrow();
        self.id
            .children(&trees.elements)
            .map(|id| FixtureElement {
                trees: self.trees.clone(),
                id,
            })
            .collect()
    }
}

impl FixtureFiber {
    fn with<T>(&self, f: impl FnOnce(&FiberData) -> T) -> Option<T> {
        let trees = self.trees.borrow();
        trees.fibers.get(self.id).map(|node| f(node.get()))
    }

    fn with_mut<T>(&self, f: impl FnOnce(&mut FiberData) -> T) -> Option<T> {
        let mut trees = self.trees.borrow_mut();
        trees.fibers.get_mut(self.id).map(|node| f(node.get_mut()))
    }

    fn handle(&self, id: Option<NodeId>) -> Option<Self> {
        id.map(|id| FixtureFiber {
            trees: self.trees.clone(),
            id,
        })
    }

    /// State of the `index`th hook.
    pub fn hook_state(&self, index: usize) -> Option<Value> {
        self.with(|data| data.hooks.get(index).map(|hook| hook.state.clone()))
            .flatten()
    }
}

impl FiberRootNode<FixtureFiber> for FixtureRoot {
    fn current(&self) -> Option<FixtureFiber> {
        let id = self.trees.borrow().roots.get(self.id).copied().flatten()?;
        Some(FixtureFiber {
            trees: self.trees.clone(),
            id,
        })
    }
}

impl FiberNode for FixtureFiber {
    type Element = FixtureElement;
    type Root = FixtureRoot;

    fn tag(&self) -> WorkTag {
        self.with(|data| data.tag).unwrap_or(WorkTag::Other(u32::MAX))
    }

    fn display_name(&self) -> Option<String> {
        self.with(|data| data.name.clone()).flatten()
    }

    fn state_node(&self) -> StateNode<FixtureElement, FixtureRoot> {
        let Some((tag, element, root)) = self.with(|data| (data.tag, data.element, data.root)) else {
            return StateNode::None;
        };
        let trees = self.trees.clone();
        match (element, root) {
            (Some(id), _) => StateNode::Element(FixtureElement { trees, id }),
            (None, Some(id)) => StateNode::Root(FixtureRoot { trees, id }),
            (None, None) if tag == WorkTag::ClassComponent => StateNode::Instance,
            (None, None) => StateNode::None,
        }
    }

    fn parent(&self) -> Option<Self> {
        let id = self.trees.borrow().fibers.get(self.id)?.parent();
        self.handle(id)
    }

    fn child(&self) -> Option<Self> {
        let id = self.trees.borrow().fibers.get(self.id)?.first_child();
        self.handle(id)
    }

    fn sibling(&self) -> Option<Self> {
        let id = self.trees.borrow().fibers.get(self.id)?.next_sibling();
        self.handle(id)
    }

    fn alternate(&self) -> Option<Self> {
        let id = self.with(|data| data.alternate).flatten();
        self.handle(id)
    }

    fn memoized_props(&self) -> Value {
        self.with(|data| data.props.clone()).unwrap_or_default()
    }

    fn dispatch_hook_state(&self, index: usize, value: &Value) -> bool {
        self.with_mut(|data| match data.hooks.get_mut(index) {
            Some(hook) if hook.has_queue => {
                hook.state = value.clone();
                true
            }
            _ => false,
        })
        .unwrap_or(false)
    }
}

/// One override a [`FixtureRenderer`] received.
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideCall {
    /// `override_props(fiber, path, value)`.
    Props {
        fiber: FixtureFiber,
        path: Vec<String>,
        value: Value,
    },
    /// `override_hook_state(fiber, id, path, value)`.
    HookState {
        fiber: FixtureFiber,
        id: String,
        path: Vec<String>,
        value: Value,
    },
}

/// A renderer over the fixture trees.
///
/// Resolves elements through the host nodes that render them and applies
/// overrides to the fixture's props and hooks. Clones share their call log.
#[derive(Debug, Clone)]
pub struct FixtureRenderer {
    trees: SharedTrees,
    failing: bool,
    overrides: bool,
    calls: Rc<RefCell<Vec<OverrideCall>>>,
}

impl FixtureRenderer {
    /// Fail every lookup as if caught mid-render.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Advertise no override capabilities.
    pub fn without_overrides(mut self) -> Self {
        self.overrides = false;
        self
    }

    /// Every override received so far.
    pub fn calls(&self) -> Vec<OverrideCall> {
        self.calls.borrow().clone()
    }
}

impl Renderer<FixtureHost> for FixtureRenderer {
    fn find_fiber_by_host_instance(&self, element: &FixtureElement) -> Result<Option<FixtureFiber>, HostError> {
        if self.failing {
            return Err(HostError::MidRender(format!("{element:?}")));
        }
        if !Rc::ptr_eq(&self.trees, &element.trees) {
            return Ok(None);
        }
        let id = self.trees.borrow().rendered_by.get(&element.id).copied();
        Ok(id.map(|id| FixtureFiber {
            trees: self.trees.clone(),
            id,
        }))
    }

    fn capabilities(&self) -> RendererCapabilities {
        RendererCapabilities {
            override_props: self.overrides,
            override_hook_state: self.overrides,
        }
    }

    fn override_props(&self, fiber: &FixtureFiber, path: &[String], value: &Value) -> Result<(), HostError> {
        if !self.overrides {
            return Err(HostError::Unsupported("prop overrides"));
        }
        self.calls.borrow_mut().push(OverrideCall::Props {
            fiber: fiber.clone(),
            path: path.to_vec(),
            value: value.clone(),
        });
        let props = apply_at_path(&fiber.memoized_props(), path, value.clone());
        fiber
            .with_mut(|data| data.props = props)
            .ok_or_else(|| HostError::Detached(format!("{fiber:?}")))
    }

    fn override_hook_state(
        &self,
        fiber: &FixtureFiber,
        id: &str,
        path: &[String],
        value: &Value,
    ) -> Result<(), HostError> {
        if !self.overrides {
            return Err(HostError::Unsupported("hook state overrides"));
        }
        self.calls.borrow_mut().push(OverrideCall::HookState {
            fiber: fiber.clone(),
            id: id.to_string(),
            path: path.to_vec(),
            value: value.clone(),
        });
        let index: usize = id
            .parse()
            .map_err(|_| HostError::Detached(format!("hook {id} of {fiber:?}")))?;
        let state = fiber
            .hook_state(index)
            .ok_or_else(|| HostError::Detached(format!("hook {index} of {fiber:?}")))?;
        let state = apply_at_path(&state, path, value.clone());
        fiber.with_mut(|data| {
            if let Some(hook) = data.hooks.get_mut(index) {
                hook.state = state;
            }
        });
        Ok(())
    }
}

/// A host whose document and component tree are built by hand.
///
/// ```
/// use fiberscope_tree::fixture::FixtureHost;
/// use fiberscope_tree::{HostElement, resolve_fiber};
///
/// let mut host = FixtureHost::new();
/// let root = host.root();
/// let top = host.root_fiber(&root);
/// let app = host.component("App", &top);
/// let div = host.element("div", None);
/// let div_fiber = host.host_fiber(&div, &app);
/// host.inject_renderer(host.renderer());
///
/// assert_eq!(div.tag_name(), "div");
/// assert_eq!(resolve_fiber(&host, &div), Some(div_fiber));
/// ```
pub struct FixtureHost {
    trees: SharedTrees,
    hook: Option<DevToolsHook<FixtureHost>>,
    known_roots: HashSet<usize>,
    legacy_roots: HashMap<NodeId, usize>,
    internal_instances: HashMap<NodeId, Vec<(String, NodeId)>>,
}

impl Default for FixtureHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureHost {
    /// An empty document with no devtools hook.
    pub fn new() -> Self {
        Self {
            trees: SharedTrees::default(),
            hook: None,
            known_roots: HashSet::new(),
            legacy_roots: HashMap::new(),
            internal_instances: HashMap::new(),
        }
    }

    fn fiber_handle(&self, id: NodeId) -> FixtureFiber {
        FixtureFiber {
            trees: self.trees.clone(),
            id,
        }
    }

    /// Add an element, appended to `parent` when given.
    pub fn element(&mut self, tag_name: &str, parent: Option<&FixtureElement>) -> FixtureElement {
        let mut trees = self.trees.borrow_mut();
        let id = trees.elements.new_node(ElementData {
            tag_name: tag_name.to_string(),
        });
        if let Some(parent) = parent {
            parent.id.append(id, &mut trees.elements);
        }
        FixtureElement {
            trees: self.trees.clone(),
            id,
        }
    }

    /// Add a root container with nothing on screen.
    pub fn root(&mut self) -> FixtureRoot {
        let mut trees = self.trees.borrow_mut();
        trees.roots.push(None);
        FixtureRoot {
            trees: self.trees.clone(),
            id: trees.roots.len() - 1,
        }
    }

    /// Add a top node holding `root`, and make it the root's current tree
    /// if it has none.
    pub fn root_fiber(&mut self, root: &FixtureRoot) -> FixtureFiber {
        let mut trees = self.trees.borrow_mut();
        let id = trees.fibers.new_node(FiberData {
            root: Some(root.id),
            ..FiberData::new(WorkTag::HostRoot)
        });
        if let Some(slot) = trees.roots.get_mut(root.id)
            && slot.is_none()
        {
            *slot = Some(id);
        }
        drop(trees);
        self.fiber_handle(id)
    }

    /// Add a node of kind `tag` under `parent`.
    pub fn fiber(&mut self, tag: WorkTag, parent: &FixtureFiber) -> FixtureFiber {
        let mut trees = self.trees.borrow_mut();
        let id = trees.fibers.new_node(FiberData::new(tag));
        parent.id.append(id, &mut trees.fibers);
        drop(trees);
        self.fiber_handle(id)
    }

    /// Add a named function component under `parent`.
    pub fn component(&mut self, name: &str, parent: &FixtureFiber) -> FixtureFiber {
        let fiber = self.fiber(WorkTag::FunctionComponent, parent);
        fiber.with_mut(|data| data.name = Some(name.to_string()));
        fiber
    }

    /// Add a host node rendering `element` under `parent`.
    pub fn host_fiber(&mut self, element: &FixtureElement, parent: &FixtureFiber) -> FixtureFiber {
        let fiber = self.fiber(WorkTag::HostComponent, parent);
        let tag_name = element.tag_name();
        fiber.with_mut(|data| {
            data.element = Some(element.id);
            data.name = Some(tag_name);
        });
        self.trees.borrow_mut().rendered_by.insert(element.id, fiber.id);
        fiber
    }

    /// Replace the props of `fiber`.
    pub fn set_props(&mut self, fiber: &FixtureFiber, props: Value) {
        fiber.with_mut(|data| data.props = props);
    }

    /// Make `a` and `b` each other's alternate.
    pub fn link_alternates(&mut self, a: &FixtureFiber, b: &FixtureFiber) {
        a.with_mut(|data| data.alternate = Some(b.id));
        b.with_mut(|data| data.alternate = Some(a.id));
    }

    /// Point `root` at the tree under `fiber`.
    pub fn set_current(&mut self, root: &FixtureRoot, fiber: &FixtureFiber) {
        if let Some(slot) = self.trees.borrow_mut().roots.get_mut(root.id) {
            *slot = Some(fiber.id);
        }
    }

    /// Mark `root` as one the instrumentation has seen commit.
    pub fn register_root(&mut self, root: &FixtureRoot) {
        self.known_roots.insert(root.id);
    }

    /// Give `fiber` a hook holding `state`. Only hooks with a queue accept
    /// dispatched state.
    pub fn push_hook(&mut self, fiber: &FixtureFiber, state: Value, has_queue: bool) {
        fiber.with_mut(|data| data.hooks.push(Hook { state, has_queue }));
    }

    /// Store `fiber` on `element` under property `key`.
    pub fn internal_instance(&mut self, element: &FixtureElement, key: &str, fiber: &FixtureFiber) {
        self.internal_instances
            .entry(element.id)
            .or_default()
            .push((key.to_string(), fiber.id));
    }

    /// Attach `root` to `element` as a legacy render container.
    pub fn legacy_root(&mut self, element: &FixtureElement, root: &FixtureRoot) {
        self.legacy_roots.insert(element.id, root.id);
    }

    /// Install an empty devtools hook.
    pub fn install_hook(&mut self) {
        self.hook.get_or_insert_with(DevToolsHook::new);
    }

    /// A renderer over this host's trees, with override support.
    pub fn renderer(&self) -> FixtureRenderer {
        FixtureRenderer {
            trees: self.trees.clone(),
            failing: false,
            overrides: true,
            calls: Rc::default(),
        }
    }

    /// Register `renderer`, installing the hook if needed.
    pub fn inject_renderer(&mut self, renderer: impl Renderer<FixtureHost> + 'static) -> RendererId {
        self.hook.get_or_insert_with(DevToolsHook::new).inject(renderer)
    }
}

impl Host for FixtureHost {
    type Element = FixtureElement;
    type Root = FixtureRoot;
    type Fiber = FixtureFiber;

    fn devtools_hook(&self) -> Option<&DevToolsHook<Self>> {
        self.hook.as_ref()
    }

    fn is_known_root(&self, root: &FixtureRoot) -> bool {
        Rc::ptr_eq(&self.trees, &root.trees) && self.known_roots.contains(&root.id)
    }

    fn legacy_root_container(&self, element: &FixtureElement) -> Option<FixtureRoot> {
        let id = *self.legacy_roots.get(&element.id)?;
        Some(FixtureRoot {
            trees: self.trees.clone(),
            id,
        })
    }

    fn element_property_keys(&self, element: &FixtureElement) -> Vec<String> {
        let mut keys = vec!["tagName".to_string(), "children".to_string()];
        if let Some(instances) = self.internal_instances.get(&element.id) {
            keys.extend(instances.iter().map(|(key, _)| key.clone()));
        }
        keys
    }

    fn element_internal_instance(&self, element: &FixtureElement, key: &str) -> Option<FixtureFiber> {
        let (_, id) = self
            .internal_instances
            .get(&element.id)?
            .iter()
            .find(|(k, _)| k == key)?;
        Some(self.fiber_handle(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_follow_the_arena() {
        let mut host = FixtureHost::new();
        let root = host.root();
        let top = host.root_fiber(&root);
        let a = host.component("A", &top);
        let b = host.component("B", &top);

        assert_eq!(top.child(), Some(a.clone()));
        assert_eq!(a.sibling(), Some(b.clone()));
        assert_eq!(b.parent(), Some(top.clone()));
        assert_eq!(root.current(), Some(top));
        assert_eq!(format!("{a:?}"), "A");
    }

    #[test]
    fn dispatch_needs_a_queue() {
        let mut host = FixtureHost::new();
        let root = host.root();
        let top = host.root_fiber(&root);
        let app = host.component("App", &top);
        host.push_hook(&app, Value::from(1), false);
        host.push_hook(&app, Value::from(2), true);

        assert!(!app.dispatch_hook_state(0, &Value::from(10)));
        assert!(app.dispatch_hook_state(1, &Value::from(20)));
        assert!(!app.dispatch_hook_state(2, &Value::from(30)));
        assert_eq!(app.hook_state(1), Some(Value::from(20)));
    }
}
