use std::collections::HashMap;
use std::future::Future;

use crate::host::Host;
use crate::navigate::{first_backed_element, nearest_composite_from_element};
use crate::node::HostElement;

/// An element's bounding box in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// Measures elements in batches.
pub trait GeometryProvider<E: HostElement> {
    /// Bounding boxes of `elements`. Elements that could not be measured are
    /// missing from the map.
    fn bounding_rects(&self, elements: &[E]) -> impl Future<Output = HashMap<E, Rect>>;
}

/// The box of the element that the component rendering `element` draws into.
pub async fn associated_rect<H, G>(host: &H, geometry: &G, element: &H::Element) -> Option<Rect>
where
    H: Host,
    G: GeometryProvider<H::Element>,
{
    let composite = nearest_composite_from_element(host, element)?;
    let target = first_backed_element(&composite)?;
    let mut rects = geometry.bounding_rects(core::slice::from_ref(&target)).await;
    rects.remove(&target)
}
