//! Z-order and focus across visible windows.

use std::collections::{BTreeMap, BTreeSet};

use super::{Window, WindowId};

/// Registry of the windows currently on screen.
///
/// The z-order itself is stored on each [`Window`]; the manager decides it.
/// After every [`bring_to_front`](Self::bring_to_front) the visible windows
/// hold the compact values `1..=n`, the front one `n`.
#[derive(Debug, Default)]
pub struct StackManager {
    visible: BTreeSet<WindowId>,
    focused: Option<WindowId>,
}

impl StackManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.visible.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn focused(&self) -> Option<WindowId> {
        self.focused
    }

    pub fn insert(&mut self, id: WindowId) {
        self.visible.insert(id);
    }

    /// Drop `id` from the visible set. The focus is cleared if it was there;
    /// picking a successor is left to the caller.
    pub fn remove(&mut self, windows: &mut BTreeMap<WindowId, Window>, id: WindowId) -> bool {
        let removed = self.visible.remove(&id);
        if self.focused == Some(id) {
            self.focused = None;
            if let Some(window) = windows.get_mut(&id) {
                window.set_focused(false);
            }
        }
        removed
    }

    /// Visible windows ordered bottom to top.
    pub fn ordered(&self, windows: &BTreeMap<WindowId, Window>) -> Vec<WindowId> {
        let mut ids: Vec<WindowId> = self
            .visible
            .iter()
            .copied()
            .filter(|id| windows.contains_key(id))
            .collect();
        ids.sort_by_key(|id| (windows[id].z_order(), *id));
        ids
    }

    /// Visible window with the highest z-order.
    pub fn topmost_visible(&self, windows: &BTreeMap<WindowId, Window>) -> Option<WindowId> {
        self.ordered(windows).last().copied()
    }

    /// Raise `id` above every other visible window and give it the focus.
    /// Returns `false` for unknown windows.
    pub fn bring_to_front(&mut self, windows: &mut BTreeMap<WindowId, Window>, id: WindowId) -> bool {
        if !windows.contains_key(&id) {
            return false;
        }
        self.visible.insert(id);
        let mut order = self.ordered(windows);
        order.retain(|other| *other != id);
        order.push(id);
        for (index, other) in order.iter().enumerate() {
            if let Some(window) = windows.get_mut(other) {
                window.set_z_order(index as u32 + 1);
            }
        }
        self.set_focus(windows, Some(id));
        true
    }

    /// Move the focus without touching the z-order.
    pub fn set_focus(&mut self, windows: &mut BTreeMap<WindowId, Window>, id: Option<WindowId>) {
        let id = id.filter(|id| self.visible.contains(id));
        for other in &self.visible {
            if Some(*other) == id {
                continue;
            }
            if let Some(window) = windows.get_mut(other)
                && window.is_focused()
            {
                window.set_focused(false);
            }
        }
        if let Some(id) = id
            && let Some(window) = windows.get_mut(&id)
            && !window.is_focused()
        {
            window.set_focused(true);
        }
        self.focused = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::surface::Surface;
    use crate::window::WindowOptions;

    fn windows(n: u64) -> (Surface, BTreeMap<WindowId, Window>) {
        let mut s = Surface::new(Size::new(80.0, 24.0));
        let mut map = BTreeMap::new();
        for raw in 1..=n {
            let id = WindowId::new(raw);
            map.insert(id, Window::build(&mut s, id, WindowOptions::new("w")));
        }
        (s, map)
    }

    #[test]
    fn bring_to_front_renumbers_compactly() {
        let (_s, mut map) = windows(3);
        let mut stack = StackManager::new();
        let [a, b, c] = [WindowId::new(1), WindowId::new(2), WindowId::new(3)];
        for id in [a, b, c] {
            stack.bring_to_front(&mut map, id);
        }
        assert_eq!(stack.ordered(&map), vec![a, b, c]);
        stack.bring_to_front(&mut map, a);
        assert_eq!(stack.ordered(&map), vec![b, c, a]);
        assert_eq!(map[&a].z_order(), 3);
        assert_eq!(map[&b].z_order(), 1);
        assert_eq!(stack.focused(), Some(a));
        assert_eq!(map.values().filter(|w| w.is_focused()).count(), 1);
    }

    #[test]
    fn front_window_keeps_its_place() {
        let (_s, mut map) = windows(2);
        let mut stack = StackManager::new();
        let [a, b] = [WindowId::new(1), WindowId::new(2)];
        stack.bring_to_front(&mut map, a);
        stack.bring_to_front(&mut map, b);
        stack.bring_to_front(&mut map, b);
        assert_eq!(stack.ordered(&map), vec![a, b]);
        assert!(map[&b].is_focused());
        assert!(!map[&a].is_focused());
    }

    #[test]
    fn remove_clears_focus_only_for_that_window() {
        let (_s, mut map) = windows(2);
        let mut stack = StackManager::new();
        let [a, b] = [WindowId::new(1), WindowId::new(2)];
        stack.bring_to_front(&mut map, a);
        stack.bring_to_front(&mut map, b);
        assert!(stack.remove(&mut map, a));
        assert_eq!(stack.focused(), Some(b));
        assert!(stack.remove(&mut map, b));
        assert_eq!(stack.focused(), None);
        assert!(!map[&b].is_focused());
        assert!(!stack.remove(&mut map, b));
        assert_eq!(stack.topmost_visible(&map), None);
    }

    #[test]
    fn unknown_window_is_refused() {
        let (_s, mut map) = windows(1);
        let mut stack = StackManager::new();
        assert!(!stack.bring_to_front(&mut map, WindowId::new(9)));
        assert!(stack.is_empty());
    }
}
