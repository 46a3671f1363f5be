use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use float_wm::dialogs::{DialogError, InputDialog, ResultDialog};
use float_wm::dnd::{PointerEvent, PointerKind};
use float_wm::geometry::Size;
use float_wm::surface::ElementId;
use float_wm::window::{Desktop, DesktopConfig};

fn desktop() -> Desktop {
    Desktop::new(Size::new(80.0, 24.0), DesktopConfig::default()).unwrap()
}

fn click(d: &mut Desktop, dialog: &mut InputDialog, target: ElementId) {
    for kind in [PointerKind::Down, PointerKind::Up] {
        d.handle_pointer(&PointerEvent::new(0, kind, 0.0, 0.0, target));
    }
    for event in d.take_events() {
        dialog.handle_event(d, &event);
    }
}

fn type_text(d: &mut Desktop, text: &str) {
    for c in text.chars() {
        let code = if c == '\n' { KeyCode::Enter } else { KeyCode::Char(c) };
        assert!(d.handle_key(&KeyEvent::new(code, KeyModifiers::NONE)));
    }
}

#[test]
fn typed_text_is_delivered_with_crlf_line_breaks() {
    let mut d = desktop();
    let mut dialog = InputDialog::new(&mut d);
    let mut rx = dialog.show_and_wait(&mut d, None).unwrap();
    assert!(dialog.crlf(&d));
    type_text(&mut d, "one\ntwo");
    assert!(rx.try_recv().is_err());

    let apply = dialog.apply_button();
    click(&mut d, &mut dialog, apply);
    assert_eq!(rx.try_recv().unwrap(), Some("one\r\ntwo".to_string()));
    assert!(!dialog.is_open());
    assert!(!d.window(dialog.window()).unwrap().is_visible());
}

#[test]
fn cancel_button_returns_the_initial_value() {
    let mut d = desktop();
    let mut dialog = InputDialog::new(&mut d);
    let mut rx = dialog.show_and_wait(&mut d, Some("keep")).unwrap();
    type_text(&mut d, " me");
    let cancel = dialog.cancel_button();
    click(&mut d, &mut dialog, cancel);
    assert_eq!(rx.try_recv().unwrap(), Some("keep".to_string()));
}

#[test]
fn second_show_only_refocuses() {
    let mut d = desktop();
    let mut dialog = InputDialog::new(&mut d);
    let other = ResultDialog::new(&mut d);
    let _rx = dialog.show_and_wait(&mut d, None).unwrap();
    other.show(&mut d);
    assert_eq!(d.focused(), Some(other.window()));

    assert_eq!(
        dialog.show_and_wait(&mut d, Some("again")).unwrap_err(),
        DialogError::AlreadyOpen
    );
    assert_eq!(d.focused(), Some(dialog.window()));
}

#[test]
fn dispose_resolves_a_pending_wait() {
    let mut d = desktop();
    let mut dialog = InputDialog::new(&mut d);
    let id = dialog.window();
    let mut rx = dialog.show_and_wait(&mut d, Some("orig")).unwrap();
    dialog.dispose(&mut d);
    assert_eq!(rx.try_recv().unwrap(), Some("orig".to_string()));
    assert!(d.window(id).is_none());
}

#[test]
fn keys_reach_only_the_focused_editor() {
    let mut d = desktop();
    let mut dialog = InputDialog::new(&mut d);
    let result = ResultDialog::new(&mut d);
    let _rx = dialog.show_and_wait(&mut d, None).unwrap();
    result.show(&mut d);
    assert!(!d.handle_key(&KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)));
    d.focus(dialog.window());
    type_text(&mut d, "x");
    assert_eq!(dialog.value(&d), Some("x".to_string()));
}
