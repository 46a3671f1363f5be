use float_wm::geometry::{self, Geometry, Size};
use float_wm::window::{Desktop, DesktopConfig, WindowId, WindowOptions, WindowState};

fn desktop() -> Desktop {
    Desktop::new(Size::new(120.0, 40.0), DesktopConfig::default()).unwrap()
}

fn open(d: &mut Desktop, title: &str) -> WindowId {
    let id = d.create_window(WindowOptions::dialog(title));
    d.show(id);
    id
}

fn live(d: &Desktop, id: WindowId) -> Geometry {
    geometry::get_geometry(d.surface(), d.window(id).unwrap().root())
}

fn assert_single_focus(d: &Desktop, expected: WindowId) {
    let focused: Vec<WindowId> = d.windows().filter(|w| w.is_focused()).map(|w| w.id()).collect();
    assert_eq!(focused, vec![expected]);
    assert_eq!(d.focused(), Some(expected));
}

#[test]
fn focusing_raises_above_every_other_window() {
    let mut d = desktop();
    let a = open(&mut d, "a");
    let b = open(&mut d, "b");
    let c = open(&mut d, "c");
    assert_eq!(d.draw_order(), vec![a, b, c]);

    for id in [a, c, b, a] {
        d.focus(id);
        let top = d.windows().map(|w| w.z_order()).max().unwrap();
        assert_eq!(d.window(id).unwrap().z_order(), top);
        assert_eq!(*d.draw_order().last().unwrap(), id);
        assert_single_focus(&d, id);
    }

    let mut z: Vec<u32> = d.windows().map(|w| w.z_order()).collect();
    z.sort_unstable();
    assert_eq!(z, vec![1, 2, 3]);
}

#[test]
fn state_classes_are_mutually_exclusive() {
    let mut d = desktop();
    let id = open(&mut d, "a");
    let root = d.window(id).unwrap().root();
    let check = |d: &Desktop, state: WindowState| {
        assert_eq!(d.window(id).unwrap().state(), state);
        let s = d.surface();
        assert_eq!(s.has_class(root, "minimized"), state == WindowState::Minimized);
        assert_eq!(s.has_class(root, "maximized"), state == WindowState::Maximized);
    };

    d.minimize(id);
    check(&d, WindowState::Minimized);
    d.maximize(id);
    check(&d, WindowState::Maximized);
    d.toggle_maximize(id);
    check(&d, WindowState::Normal);
    d.toggle_minimize(id);
    check(&d, WindowState::Minimized);
    d.restore(id);
    check(&d, WindowState::Normal);
}

#[test]
fn restore_after_minimize_then_maximize_uses_first_geometry() {
    let mut d = desktop();
    let id = open(&mut d, "a");
    let root = d.window(id).unwrap().root();
    geometry::set_offset(d.surface_mut(), root, 4.0, 5.0);
    geometry::set_size(d.surface_mut(), root, Size::new(40.0, 12.0));
    d.relayout();

    d.minimize(id);
    d.maximize(id);
    assert_eq!(
        d.surface().layout_box(root),
        Some(Geometry::new(0.0, 0.0, 120.0, 40.0))
    );
    d.restore(id);
    assert_eq!(live(&d, id), Geometry::new(4.0, 5.0, 40.0, 12.0));
}

#[test]
fn closing_the_focused_window_hands_focus_down() {
    let mut d = desktop();
    let a = open(&mut d, "a");
    let b = open(&mut d, "b");
    assert_single_focus(&d, b);
    d.close(b);
    assert_single_focus(&d, a);
    d.close(a);
    assert_eq!(d.focused(), None);
    assert!(d.windows().all(|w| !w.is_focused()));
}

#[test]
fn closed_window_comes_back_where_it_was() {
    let mut d = desktop();
    let id = open(&mut d, "a");
    let root = d.window(id).unwrap().root();
    geometry::set_offset(d.surface_mut(), root, 7.0, 3.0);
    d.relayout();
    d.close(id);
    assert!(d.surface().has_class(root, "hidden"));
    d.show(id);
    assert!(!d.surface().has_class(root, "hidden"));
    assert_eq!(live(&d, id), Geometry::new(7.0, 3.0, 60.0, 20.0));
}

#[test]
fn viewport_change_resizes_maximized_windows() {
    let mut d = desktop();
    let id = open(&mut d, "a");
    d.maximize(id);
    d.set_viewport(Size::new(80.0, 24.0));
    let root = d.window(id).unwrap().root();
    assert_eq!(
        d.surface().layout_box(root),
        Some(Geometry::new(0.0, 0.0, 80.0, 24.0))
    );
}

#[test]
fn minimize_then_restore_round_trips() {
    let mut d = Desktop::new(Size::new(800.0, 600.0), DesktopConfig::default()).unwrap();
    let id = open(&mut d, "a");
    let root = d.window(id).unwrap().root();
    geometry::set_offset(d.surface_mut(), root, 50.0, 60.0);
    geometry::set_size(d.surface_mut(), root, Size::new(300.0, 200.0));
    d.relayout();

    d.minimize(id);
    assert_eq!(d.window(id).unwrap().state(), WindowState::Minimized);
    d.restore(id);
    assert_eq!(d.window(id).unwrap().state(), WindowState::Normal);
    assert_eq!(live(&d, id), Geometry::new(50.0, 60.0, 300.0, 200.0));
    assert!(!d.surface().has_class(root, "minimized"));
}
