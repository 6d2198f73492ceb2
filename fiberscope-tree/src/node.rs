//! Handle traits for tree nodes, roots and platform elements.

use core::fmt::Debug;
use core::hash::Hash;

use fiberscope_value::Value;

/// Kind of a tree node, as the host's reconciler numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkTag {
    FunctionComponent,
    ClassComponent,
    HostRoot,
    HostPortal,
    HostComponent,
    HostText,
    Fragment,
    Mode,
    ContextConsumer,
    ContextProvider,
    ForwardRef,
    Profiler,
    SuspenseComponent,
    MemoComponent,
    SimpleMemoComponent,
    LazyComponent,
    Offscreen,
    HostHoistable,
    HostSingleton,
    /// Any tag this crate doesn't classify.
    Other(u32),
}

impl WorkTag {
    /// Map the host's numeric tag.
    pub const fn from_raw(tag: u32) -> Self {
        match tag {
            0 => WorkTag::FunctionComponent,
            1 => WorkTag::ClassComponent,
            3 => WorkTag::HostRoot,
            4 => WorkTag::HostPortal,
            5 => WorkTag::HostComponent,
            6 => WorkTag::HostText,
            7 => WorkTag::Fragment,
            8 => WorkTag::Mode,
            9 => WorkTag::ContextConsumer,
            10 => WorkTag::ContextProvider,
            11 => WorkTag::ForwardRef,
            12 => WorkTag::Profiler,
            13 => WorkTag::SuspenseComponent,
            14 => WorkTag::MemoComponent,
            15 => WorkTag::SimpleMemoComponent,
            16 => WorkTag::LazyComponent,
            22 => WorkTag::Offscreen,
            26 => WorkTag::HostHoistable,
            27 => WorkTag::HostSingleton,
            other => WorkTag::Other(other),
        }
    }

    /// Application-authored components: functions, classes, `forwardRef` and `memo` wrappers.
    pub const fn is_composite(self) -> bool {
        matches!(
            self,
            WorkTag::FunctionComponent
                | WorkTag::ClassComponent
                | WorkTag::ForwardRef
                | WorkTag::MemoComponent
                | WorkTag::SimpleMemoComponent
        )
    }

    /// Nodes that render a platform element.
    pub const fn is_host(self) -> bool {
        matches!(
            self,
            WorkTag::HostComponent | WorkTag::HostHoistable | WorkTag::HostSingleton
        )
    }
}

/// What a node's state slot holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateNode<E, R> {
    /// Nothing (function components, fragments).
    None,
    /// A platform element.
    Element(E),
    /// The tree root container.
    Root(R),
    /// A class instance or another non-element object.
    Instance,
}

impl<E, R> StateNode<E, R> {
    /// The element, if this slot holds one.
    pub fn element(self) -> Option<E> {
        match self {
            StateNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Whether the slot is empty.
    pub const fn is_none(&self) -> bool {
        matches!(self, StateNode::None)
    }
}

/// A platform element, such as a DOM element.
///
/// Equality is identity.
pub trait HostElement: Clone + Eq + Hash + Debug {
    /// Tag name as the platform reports it (`DIV`, `span`, ...).
    fn tag_name(&self) -> String;

    /// Element children, in document order.
    fn children(&self) -> Vec<Self>;
}

/// The container a tree is rendered into.
pub trait FiberRootNode<F>: Clone + Debug {
    /// Root node of the tree currently on screen.
    fn current(&self) -> Option<F>;
}

/// A node of the component tree.
///
/// Implementations are cheap handles; equality is node identity, so a node
/// and its alternate are different nodes.
pub trait FiberNode: Clone + Eq + Debug {
    /// Platform element type.
    type Element: HostElement;
    /// Root container type.
    type Root: FiberRootNode<Self>;

    /// Node kind.
    fn tag(&self) -> WorkTag;
    /// Component name, when the node has one.
    fn display_name(&self) -> Option<String>;
    /// The node's state slot.
    fn state_node(&self) -> StateNode<Self::Element, Self::Root>;
    /// The `return` link.
    fn parent(&self) -> Option<Self>;
    /// First child.
    fn child(&self) -> Option<Self>;
    /// Next sibling.
    fn sibling(&self) -> Option<Self>;
    /// The same node in the other tree snapshot.
    fn alternate(&self) -> Option<Self>;
    /// Props of the last render.
    fn memoized_props(&self) -> Value;

    /// Props of the render before that.
    fn previous_props(&self) -> Value {
        self.alternate()
            .map(|alternate| alternate.memoized_props())
            .unwrap_or_default()
    }

    /// Push `value` through the update queue of the `index`th hook.
    ///
    /// Returns `false` when there is no such hook or it has no queue.
    fn dispatch_hook_state(&self, index: usize, value: &Value) -> bool {
        let _ = (index, value);
        false
    }
}
