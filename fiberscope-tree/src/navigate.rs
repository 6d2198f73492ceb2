//! Walking between platform elements and tree nodes.
//!
//! Every function here treats failure as a miss: a renderer that errors while
//! resolving is skipped, and anything that cannot be found is `None`.

use crate::host::Host;
use crate::node::{FiberNode, FiberRootNode, HostElement, StateNode};

/// Property-name prefixes under which the host stores a node on its element.
pub const INTERNAL_INSTANCE_PREFIXES: [&str; 2] = ["__reactInternalInstance$", "__reactFiber"];

/// Tags of elements that never paint anything.
pub const NON_VISUAL_TAGS: [&str; 21] = [
    "html", "head", "meta", "title", "base", "script", "style", "link", "noscript", "source", "track",
    "embed", "object", "param", "template", "portal", "slot", "area", "xml", "doctype", "comment",
];

/// Whether `tag_name` names a non-visual element, in any case.
pub fn is_non_visual_tag(tag_name: &str) -> bool {
    NON_VISUAL_TAGS
        .iter()
        .any(|tag| tag.eq_ignore_ascii_case(tag_name))
}

/// The node that rendered `element`.
///
/// Asks every renderer in the devtools hook first, then a legacy root
/// container on the element, then the element's internal-instance property.
pub fn resolve_fiber<H: Host>(host: &H, element: &H::Element) -> Option<H::Fiber> {
    if let Some(hook) = host.devtools_hook() {
        for (_id, renderer) in hook.renderers() {
            match renderer.find_fiber_by_host_instance(element) {
                Ok(Some(fiber)) => return Some(fiber),
                Ok(None) => {}
                Err(_err) => {
                    debug!(renderer = ?_id, error = %_err, "renderer failed to resolve element, skipping");
                }
            }
        }
    }

    if let Some(root) = host.legacy_root_container(element) {
        trace!(?element, "resolving through legacy root container");
        return root.current().and_then(|current| current.child());
    }

    let key = host
        .element_property_keys(element)
        .into_iter()
        .find(|key| INTERNAL_INSTANCE_PREFIXES.iter().any(|p| key.starts_with(p)));
    match key {
        Some(key) => host.element_internal_instance(element, &key),
        None => {
            debug!(?element, "no node found for element");
            None
        }
    }
}

/// The first platform element at or below `fiber` along `child` links, or
/// failing that at or above where the descent stopped.
pub fn first_backed_element<F: FiberNode>(fiber: &F) -> Option<F::Element> {
    let mut current = fiber.clone();
    loop {
        if let StateNode::Element(element) = current.state_node() {
            return Some(element);
        }
        match current.child() {
            Some(child) => current = child,
            None => break,
        }
    }

    loop {
        if let StateNode::Element(element) = current.state_node() {
            return Some(element);
        }
        current = current.parent()?;
    }
}

/// The closest composite at or above `fiber`, with the last host node passed
/// on the way up.
pub fn nearest_composite_ancestor<F: FiberNode>(fiber: &F) -> Option<(F, Option<F>)> {
    let mut current = Some(fiber.clone());
    let mut last_host = None;
    while let Some(node) = current {
        let tag = node.tag();
        if tag.is_composite() {
            return Some((node, last_host));
        }
        if tag.is_host() {
            last_host = Some(node.clone());
        }
        current = node.parent();
    }
    None
}

/// Whether `fiber` is reachable from `root` over `child` and `sibling` links.
pub fn is_in_tree<F: FiberNode>(root: &F, fiber: &F) -> bool {
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        if node == *fiber {
            return true;
        }
        if let Some(sibling) = node.sibling() {
            stack.push(sibling);
        }
        if let Some(child) = node.child() {
            stack.push(child);
        }
    }
    false
}

/// Whether `fiber` belongs to the snapshot currently on screen.
///
/// Looks for an ancestor holding a root the host has seen commit, then
/// searches that root's current tree for `fiber` itself. `false` when no
/// such ancestor exists.
pub fn is_current_snapshot<H: Host>(host: &H, fiber: &H::Fiber) -> bool {
    let mut current = Some(fiber.clone());
    while let Some(node) = current {
        if let StateNode::Root(root) = node.state_node()
            && host.is_known_root(&root)
        {
            return root.current().is_some_and(|top| is_in_tree(&top, fiber));
        }
        current = node.parent();
    }
    trace!(?fiber, "no registered root above node");
    false
}

/// The composite that rendered `element`.
pub fn nearest_composite_from_element<H: Host>(host: &H, element: &H::Element) -> Option<H::Fiber> {
    let fiber = resolve_fiber(host, element)?;
    nearest_composite_ancestor(&fiber).map(|(composite, _)| composite)
}

/// Like [`nearest_composite_from_element`], but only for a composite that
/// renders some platform element.
pub fn composite_from_element<H: Host>(host: &H, element: &H::Element) -> Option<H::Fiber> {
    let composite = nearest_composite_from_element(host, element)?;
    first_backed_element(&composite)?;
    Some(composite)
}

/// Like [`composite_from_element`], but taken from the snapshot on screen.
pub fn current_composite_from_element<H: Host>(host: &H, element: &H::Element) -> Option<H::Fiber> {
    let resolved = nearest_composite_from_element(host, element)?;
    let resolved = current_or_alternate(host, resolved);
    first_backed_element(&resolved)?;

    let (composite, _) = nearest_composite_ancestor(&resolved)?;
    Some(current_or_alternate(host, composite))
}

fn current_or_alternate<H: Host>(host: &H, fiber: H::Fiber) -> H::Fiber {
    if is_current_snapshot(host, &fiber) {
        fiber
    } else {
        fiber.alternate().unwrap_or(fiber)
    }
}

/// The first element-backed node under `fiber`, depth first.
///
/// With `exclude_non_visual`, a non-visual element stops the search on its
/// branch instead of being returned.
pub fn find_component_element<F: FiberNode>(fiber: &F, exclude_non_visual: bool) -> Option<F::Element> {
    if let StateNode::Element(element) = fiber.state_node() {
        if exclude_non_visual && is_non_visual_tag(&element.tag_name()) {
            return None;
        }
        return Some(element);
    }

    let mut child = fiber.child();
    while let Some(node) = child {
        if let Some(found) = find_component_element(&node, exclude_non_visual) {
            return Some(found);
        }
        child = node.sibling();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_visual_tags_ignore_case() {
        assert!(is_non_visual_tag("SCRIPT"));
        assert!(is_non_visual_tag("Style"));
        assert!(is_non_visual_tag("html"));
        assert!(!is_non_visual_tag("DIV"));
    }
}
