//! The element tree windows are built from.
//!
//! `Surface` is a small arena of elements with class lists, attributes and
//! the handful of style properties the window engine cares about. The drag
//! engine only ever talks to it through selectors, so any window builder that
//! produces the expected classes can reuse the engine unchanged.
//!
//! `remove` detaches a subtree and frees its slots for reuse. Ids carry the
//! generation of their slot, so an id of a removed element stays disposed
//! even after its slot is handed out again, and every write through it is a
//! silent no-op. Sessions that still hold such an id finish without
//! special-casing.

pub mod selector;

use std::collections::BTreeMap;

pub use selector::{Selector, SelectorError};

use crate::geometry::{self, Geometry, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId {
    index: usize,
    generation: u32,
}

/// What kind of element this is, which decides where its translation lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Html,
    Svg,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub transform: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub min_width: Option<f64>,
    pub min_height: Option<f64>,
    pub z_index: Option<u32>,
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    kind: ElementKind,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    style: Style,
    text: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    layout: Option<Geometry>,
}

impl Element {
    fn new(tag: &str, kind: ElementKind, classes: &[&str]) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(classes.len());
        for class in classes {
            if !unique.iter().any(|c| c == class) {
                unique.push((*class).to_string());
            }
        }
        Self {
            tag: tag.to_ascii_lowercase(),
            kind,
            classes: unique,
            attrs: BTreeMap::new(),
            style: Style::default(),
            text: String::new(),
            parent: None,
            children: Vec::new(),
            layout: None,
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

#[derive(Debug, Clone)]
pub struct Surface {
    slots: Vec<Slot>,
    free: Vec<usize>,
    root: ElementId,
    viewport: Size,
}

impl Surface {
    pub fn new(viewport: Size) -> Self {
        let root = Element::new("body", ElementKind::Html, &[]);
        Self {
            slots: vec![Slot {
                generation: 0,
                element: Some(root),
            }],
            free: Vec::new(),
            root: ElementId {
                index: 0,
                generation: 0,
            },
            viewport,
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn create_element(&mut self, tag: &str, classes: &[&str]) -> ElementId {
        self.push(Element::new(tag, ElementKind::Html, classes))
    }

    pub fn create_svg_element(&mut self, tag: &str, classes: &[&str]) -> ElementId {
        self.push(Element::new(tag, ElementKind::Svg, classes))
    }

    fn push(&mut self, element: Element) -> ElementId {
        if let Some(index) = self.free.pop()
            && let Some(slot) = self.slots.get_mut(index)
        {
            slot.generation = slot.generation.wrapping_add(1);
            slot.element = Some(element);
            return ElementId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            element: Some(element),
        });
        ElementId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    fn get(&self, id: ElementId) -> Option<&Element> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.element.as_ref())
    }

    fn get_live_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.element.as_mut())
    }

    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` under `parent`, before `reference` when it is one of
    /// `parent`'s children and at the end otherwise.
    pub fn insert_before(
        &mut self,
        parent: ElementId,
        child: ElementId,
        reference: Option<ElementId>,
    ) -> bool {
        if parent == child || self.is_disposed(parent) || self.is_disposed(child) {
            return false;
        }
        if self.is_ancestor_or_self(child, parent) {
            return false;
        }
        self.unlink(child);
        let Some(parent_el) = self.get_live_mut(parent) else {
            return false;
        };
        let index = reference
            .and_then(|r| parent_el.children.iter().position(|c| *c == r))
            .unwrap_or(parent_el.children.len());
        parent_el.children.insert(index, child);
        if let Some(child_el) = self.get_live_mut(child) {
            child_el.parent = Some(parent);
        }
        true
    }

    fn unlink(&mut self, id: ElementId) {
        let Some(parent) = self.get(id).and_then(|el| el.parent) else {
            return;
        };
        if let Some(parent_el) = self.get_live_mut(parent) {
            parent_el.children.retain(|c| *c != id);
        }
        if let Some(el) = self.get_live_mut(id) {
            el.parent = None;
        }
    }

    /// Detach `id` and its subtree for good, freeing their slots.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if id == self.root || self.is_disposed(id) {
            return false;
        }
        self.unlink(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(el) = self
                .slots
                .get_mut(next.index)
                .filter(|slot| slot.generation == next.generation)
                .and_then(|slot| slot.element.take())
            else {
                continue;
            };
            stack.extend(el.children);
            self.free.push(next.index);
        }
        true
    }

    pub fn is_disposed(&self, id: ElementId) -> bool {
        self.get(id).is_none()
    }

    /// Whether `id` is reachable from the root.
    pub fn is_attached(&self, id: ElementId) -> bool {
        self.is_ancestor_or_self(self.root, id)
    }

    /// Whether `ancestor` is `id` itself or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(el) = current {
            if el == ancestor {
                return !self.is_disposed(el);
            }
            current = self.parent(el);
        }
        false
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(|el| el.parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(|el| el.children.as_slice()).unwrap_or(&[])
    }

    pub fn tag(&self, id: ElementId) -> &str {
        self.get(id).map(|el| el.tag.as_str()).unwrap_or("")
    }

    pub fn kind(&self, id: ElementId) -> Option<ElementKind> {
        self.get(id).map(|el| el.kind)
    }

    pub fn classes(&self, id: ElementId) -> &[String] {
        self.get(id).map(|el| el.classes.as_slice()).unwrap_or(&[])
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.classes(id).iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) -> bool {
        self.toggle_class(id, class, true)
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) -> bool {
        self.toggle_class(id, class, false)
    }

    /// Force `class` on or off. Returns `false` for disposed elements.
    pub fn toggle_class(&mut self, id: ElementId, class: &str, on: bool) -> bool {
        let Some(el) = self.get_live_mut(id) else {
            return false;
        };
        let present = el.classes.iter().position(|c| c == class);
        match (present, on) {
            (None, true) => el.classes.push(class.to_string()),
            (Some(index), false) => {
                el.classes.remove(index);
            }
            _ => {}
        }
        true
    }

    pub fn attr(&self, id: ElementId, name: &str) -> Option<&str> {
        self.get(id)
            .and_then(|el| el.attrs.get(name))
            .map(String::as_str)
    }

    pub fn set_attr(&mut self, id: ElementId, name: &str, value: impl Into<String>) -> bool {
        let Some(el) = self.get_live_mut(id) else {
            return false;
        };
        el.attrs.insert(name.to_string(), value.into());
        true
    }

    pub fn remove_attr(&mut self, id: ElementId, name: &str) -> bool {
        let Some(el) = self.get_live_mut(id) else {
            return false;
        };
        el.attrs.remove(name);
        true
    }

    pub fn text(&self, id: ElementId) -> &str {
        self.get(id).map(|el| el.text.as_str()).unwrap_or("")
    }

    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) -> bool {
        let Some(el) = self.get_live_mut(id) else {
            return false;
        };
        el.text = text.into();
        true
    }

    pub fn style(&self, id: ElementId) -> Option<&Style> {
        self.get(id).map(|el| &el.style)
    }

    fn with_style(&mut self, id: ElementId, f: impl FnOnce(&mut Style)) -> bool {
        let Some(el) = self.get_live_mut(id) else {
            return false;
        };
        f(&mut el.style);
        true
    }

    pub fn set_transform(&mut self, id: ElementId, transform: Option<String>) -> bool {
        self.with_style(id, |style| style.transform = transform)
    }

    pub fn set_width(&mut self, id: ElementId, width: Option<f64>) -> bool {
        self.with_style(id, |style| style.width = width)
    }

    pub fn set_height(&mut self, id: ElementId, height: Option<f64>) -> bool {
        self.with_style(id, |style| style.height = height)
    }

    pub fn set_min_size(&mut self, id: ElementId, min: Option<Size>) -> bool {
        self.with_style(id, |style| {
            style.min_width = min.map(|m| m.width);
            style.min_height = min.map(|m| m.height);
        })
    }

    pub fn set_z_index(&mut self, id: ElementId, z: Option<u32>) -> bool {
        self.with_style(id, |style| style.z_index = z)
    }

    /// Computed box last assigned by a layout pass.
    pub fn layout_box(&self, id: ElementId) -> Option<Geometry> {
        self.get(id).and_then(|el| el.layout)
    }

    pub fn set_layout_box(&mut self, id: ElementId, layout: Option<Geometry>) -> bool {
        let Some(el) = self.get_live_mut(id) else {
            return false;
        };
        el.layout = layout;
        true
    }

    /// Bounding box of `id`: the viewport for the root, the laid-out box when
    /// one exists, and translation plus style size otherwise.
    pub fn bounding_box(&self, id: ElementId) -> Geometry {
        if id == self.root {
            return Geometry::new(0.0, 0.0, self.viewport.width, self.viewport.height);
        }
        self.layout_box(id)
            .unwrap_or_else(|| geometry::get_geometry(self, id))
    }

    pub fn matches(&self, id: ElementId, selector: &Selector) -> bool {
        !self.is_disposed(id) && selector.matches(self, id)
    }

    /// `id` matches `selector` itself or sits somewhere below a match, the
    /// equivalent of testing against `sel, sel *`.
    pub fn matches_or_descendant(&self, id: ElementId, selector: &Selector) -> bool {
        self.closest(id, selector).is_some()
    }

    /// Nearest inclusive ancestor of `id` matching `selector`.
    pub fn closest(&self, id: ElementId, selector: &Selector) -> Option<ElementId> {
        if self.is_disposed(id) {
            return None;
        }
        let mut current = Some(id);
        while let Some(el) = current {
            if selector.matches(self, el) {
                return Some(el);
            }
            current = self.parent(el);
        }
        None
    }

    /// Attached elements matching `selector`, in document order.
    pub fn query_all(&self, selector: &Selector) -> Vec<ElementId> {
        let mut found = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if selector.matches(self, id) {
                found.push(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        found
    }

    /// Deepest visible element whose layout box contains the point, or the
    /// root when nothing does. Top-level children are stacked by z-index,
    /// later siblings paint over earlier ones.
    pub fn hit_test(&self, x: f64, y: f64) -> ElementId {
        let mut layers: Vec<(u32, usize, ElementId)> = self
            .children(self.root)
            .iter()
            .enumerate()
            .map(|(order, id)| {
                let z = self.style(*id).and_then(|s| s.z_index).unwrap_or(0);
                (z, order, *id)
            })
            .collect();
        layers.sort();
        for (_, _, id) in layers.into_iter().rev() {
            if let Some(hit) = self.hit_test_within(id, x, y) {
                return hit;
            }
        }
        self.root
    }

    fn hit_test_within(&self, id: ElementId, x: f64, y: f64) -> Option<ElementId> {
        if self.has_class(id, "hidden") {
            return None;
        }
        for child in self.children(id).iter().rev() {
            if let Some(hit) = self.hit_test_within(*child, x, y) {
                return Some(hit);
            }
        }
        self.layout_box(id)
            .filter(|b| b.contains(x, y))
            .map(|_| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(s: &str) -> Selector {
        s.parse().unwrap()
    }

    #[test]
    fn closest_walks_up_to_matching_ancestor() {
        let mut s = Surface::new(Size::new(80.0, 24.0));
        let win = s.create_element("div", &["window"]);
        let bar = s.create_element("div", &["title-bar"]);
        let text = s.create_element("span", &[]);
        s.append_child(s.root(), win);
        s.append_child(win, bar);
        s.append_child(bar, text);
        assert_eq!(s.closest(text, &sel(".window")), Some(win));
        assert!(s.matches_or_descendant(text, &sel(".title-bar")));
        assert!(!s.matches_or_descendant(win, &sel(".title-bar")));
    }

    #[test]
    fn removed_subtree_ignores_writes() {
        let mut s = Surface::new(Size::new(80.0, 24.0));
        let win = s.create_element("div", &["window"]);
        let child = s.create_element("div", &[]);
        s.append_child(s.root(), win);
        s.append_child(win, child);
        assert!(s.remove(win));
        assert!(s.is_disposed(child));
        assert!(!s.is_attached(win));
        assert!(!s.set_width(child, Some(3.0)));
        assert!(!s.add_class(win, "dragging"));
        assert!(!s.remove(win));
    }

    #[test]
    fn reused_slots_leave_old_ids_disposed() {
        let mut s = Surface::new(Size::new(80.0, 24.0));
        let old = s.create_element("div", &["window"]);
        s.append_child(s.root(), old);
        s.remove(old);

        let fresh = s.create_element("div", &["window"]);
        s.append_child(s.root(), fresh);
        assert_ne!(old, fresh);
        assert!(s.is_disposed(old));
        assert!(!s.is_disposed(fresh));
        assert!(!s.add_class(old, "dragging"));
        assert!(!s.has_class(fresh, "dragging"));
        assert!(!s.remove(old));
        assert!(s.is_attached(fresh));
        assert_eq!(s.query_all(&sel(".window")), vec![fresh]);
    }

    #[test]
    fn insert_before_respects_reference() {
        let mut s = Surface::new(Size::new(80.0, 24.0));
        let a = s.create_element("div", &[]);
        let b = s.create_element("div", &[]);
        let c = s.create_element("div", &[]);
        s.append_child(s.root(), a);
        s.append_child(s.root(), c);
        s.insert_before(s.root(), b, Some(c));
        assert_eq!(s.children(s.root()), &[a, b, c]);
        // cycles are refused
        assert!(!s.append_child(a, s.root()));
    }

    #[test]
    fn hit_test_prefers_higher_z_index_and_deepest_child() {
        let mut s = Surface::new(Size::new(80.0, 24.0));
        let low = s.create_element("div", &[]);
        let high = s.create_element("div", &[]);
        let inner = s.create_element("div", &[]);
        s.append_child(s.root(), high);
        s.append_child(s.root(), low);
        s.append_child(high, inner);
        s.set_z_index(low, Some(1));
        s.set_z_index(high, Some(2));
        s.set_layout_box(low, Some(Geometry::new(0.0, 0.0, 10.0, 10.0)));
        s.set_layout_box(high, Some(Geometry::new(5.0, 5.0, 10.0, 10.0)));
        s.set_layout_box(inner, Some(Geometry::new(6.0, 6.0, 2.0, 2.0)));
        assert_eq!(s.hit_test(6.0, 6.0), inner);
        assert_eq!(s.hit_test(9.0, 9.0), high);
        assert_eq!(s.hit_test(1.0, 1.0), low);
        assert_eq!(s.hit_test(50.0, 20.0), s.root());
        s.add_class(high, "hidden");
        assert_eq!(s.hit_test(6.0, 6.0), low);
    }

    #[test]
    fn query_all_returns_document_order() {
        let mut s = Surface::new(Size::new(80.0, 24.0));
        let a = s.create_element("div", &["window"]);
        let b = s.create_element("div", &["window"]);
        s.append_child(s.root(), a);
        s.append_child(s.root(), b);
        assert_eq!(s.query_all(&sel(".window")), vec![a, b]);
    }
}
