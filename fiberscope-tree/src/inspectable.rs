use crate::host::Host;
use crate::navigate::{composite_from_element, find_component_element};
use crate::node::{FiberNode, HostElement};

/// An element that is the outermost element some component renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectableElement<E> {
    /// The element.
    pub element: E,
    /// How many inspectable elements enclose it.
    pub depth: usize,
    /// The component's display name, `Unknown` when it has none.
    pub name: String,
}

/// Every inspectable element under `root`, in document order.
pub fn list_inspectable_elements<H: Host>(host: &H, root: &H::Element) -> Vec<InspectableElement<H::Element>> {
    let mut found = Vec::new();
    let mut stack = vec![(root.clone(), 0_usize)];

    while let Some((element, depth)) = stack.pop() {
        let owner = composite_from_element(host, &element)
            .filter(|composite| find_component_element(composite, true).as_ref() == Some(&element));

        let child_depth = match owner {
            Some(composite) => {
                trace!(?element, depth, "inspectable element");
                found.push(InspectableElement {
                    element: element.clone(),
                    depth,
                    name: composite.display_name().unwrap_or_else(|| "Unknown".to_string()),
                });
                depth + 1
            }
            None => depth,
        };

        // reversed so the first child is visited first
        for child in element.children().into_iter().rev() {
            stack.push((child, child_depth));
        }
    }

    found
}
