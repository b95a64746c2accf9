//! Dialog focus handling, stacking and transitions.

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use erpkit_ui::dialog::{Dialog, DialogOutcome, DialogSide, DialogSize, DialogStack, PointerTarget, ReturnFocus};
use erpkit_ui::focus::{FocusCandidate, FocusHost, FocusId, FocusTree};
use erpkit_ui::keys::{Key, KeyCombo};
use erpkit_ui::transition::Phase;

fn escape() -> KeyCombo {
    KeyCombo::key(Key::Escape)
}

fn tab() -> KeyCombo {
    KeyCombo::key(Key::Tab)
}

fn shift_tab() -> KeyCombo {
    KeyCombo::key(Key::Tab).shift()
}

/// A page with an opener button and a dialog panel holding two inputs and a
/// disabled button.
fn page() -> FocusTree {
    let mut tree = FocusTree::new();
    tree.insert(FocusCandidate::new("opener"), None);
    tree.insert(FocusCandidate::new("panel").tab_index(-1), None);
    let panel = FocusId::from("panel");
    tree.insert(FocusCandidate::new("name"), Some(&panel));
    tree.insert(FocusCandidate::new("hidden").hidden(), Some(&panel));
    tree.insert(FocusCandidate::new("code"), Some(&panel));
    tree.insert(FocusCandidate::new("save").disabled(), Some(&panel));
    tree
}

fn open_dialog(dialog: &mut Dialog, tree: &mut FocusTree, now: Instant) {
    dialog.set_open(true, tree, now);
    dialog.frame(tree);
    dialog.frame(tree);
}

// =============================================================================
// Focus
// =============================================================================

#[test]
fn test_open_focuses_first_field_and_close_restores() {
    let stack = DialogStack::new();
    let mut tree = page();
    tree.focus(&FocusId::from("opener"));
    let mut dialog = Dialog::new(&stack, "panel").title("New role");

    open_dialog(&mut dialog, &mut tree, Instant::now());
    assert!(tree.is_focused("name"));

    dialog.set_open(false, &mut tree, Instant::now());
    assert!(tree.is_focused("opener"));
}

#[test]
fn test_panel_focused_without_focusables() {
    let stack = DialogStack::new();
    let mut tree = FocusTree::new();
    tree.insert(FocusCandidate::new("panel"), None);
    let mut dialog = Dialog::new(&stack, "panel");

    open_dialog(&mut dialog, &mut tree, Instant::now());
    assert!(tree.is_focused("panel"));

    assert_eq!(dialog.on_key(&tab(), &mut tree), DialogOutcome::Consumed);
    assert!(tree.is_focused("panel"));
}

#[test]
fn test_return_focus_ref_wins() {
    let stack = DialogStack::new();
    let mut tree = page();
    tree.insert(FocusCandidate::new("role-input"), None);
    tree.focus(&FocusId::from("opener"));

    let slot = Arc::new(RwLock::new(None));
    let mut dialog = Dialog::new(&stack, "panel").return_focus(ReturnFocus::Ref(slot.clone()));
    open_dialog(&mut dialog, &mut tree, Instant::now());

    *slot.write().unwrap() = Some(FocusId::from("role-input"));
    dialog.set_open(false, &mut tree, Instant::now());
    assert!(tree.is_focused("role-input"));
}

#[test]
fn test_detached_return_target_falls_back() {
    let stack = DialogStack::new();
    let mut tree = page();
    tree.focus(&FocusId::from("opener"));
    let mut dialog =
        Dialog::new(&stack, "panel").return_focus(ReturnFocus::resolver(|| Some(FocusId::from("gone"))));

    open_dialog(&mut dialog, &mut tree, Instant::now());
    dialog.set_open(false, &mut tree, Instant::now());
    assert!(tree.is_focused("opener"));
}

#[test]
fn test_detached_opener_leaves_focus_alone() {
    let stack = DialogStack::new();
    let mut tree = page();
    tree.focus(&FocusId::from("opener"));
    let mut dialog = Dialog::new(&stack, "panel");

    open_dialog(&mut dialog, &mut tree, Instant::now());
    tree.remove(&FocusId::from("opener"));
    dialog.set_open(false, &mut tree, Instant::now());
    assert!(tree.is_focused("name"));
}

#[test]
fn test_tab_wraps_inside_panel() {
    let stack = DialogStack::new();
    let mut tree = page();
    let mut dialog = Dialog::new(&stack, "panel");
    open_dialog(&mut dialog, &mut tree, Instant::now());

    dialog.on_key(&tab(), &mut tree);
    assert!(tree.is_focused("code"));
    dialog.on_key(&tab(), &mut tree);
    assert!(tree.is_focused("name"));
    dialog.on_key(&shift_tab(), &mut tree);
    assert!(tree.is_focused("code"));
}

#[test]
fn test_tab_pulls_escaped_focus_back() {
    let stack = DialogStack::new();
    let mut tree = page();
    let mut dialog = Dialog::new(&stack, "panel");
    open_dialog(&mut dialog, &mut tree, Instant::now());

    tree.focus(&FocusId::from("opener"));
    dialog.on_key(&tab(), &mut tree);
    assert!(tree.is_focused("name"));

    tree.focus(&FocusId::from("opener"));
    dialog.on_key(&shift_tab(), &mut tree);
    assert!(tree.is_focused("code"));
}

// =============================================================================
// Stacking
// =============================================================================

#[test]
fn test_escape_closes_only_topmost() {
    let stack = DialogStack::new();
    let mut tree = page();
    tree.insert(FocusCandidate::new("panel-b"), None);
    let now = Instant::now();

    let mut a = Dialog::new(&stack, "panel");
    let mut b = Dialog::new(&stack, "panel-b");
    open_dialog(&mut a, &mut tree, now);
    open_dialog(&mut b, &mut tree, now);
    assert_eq!(stack.len(), 2);

    assert_eq!(a.on_key(&escape(), &mut tree), DialogOutcome::Ignored);
    assert_eq!(b.on_key(&escape(), &mut tree), DialogOutcome::CloseRequested);

    b.set_open(false, &mut tree, now);
    assert_eq!(stack.topmost(), Some(a.id()));
    assert_eq!(a.on_key(&escape(), &mut tree), DialogOutcome::CloseRequested);
}

#[test]
fn test_escape_disabled() {
    let stack = DialogStack::new();
    let mut tree = page();
    let mut dialog = Dialog::new(&stack, "panel").close_on_esc(false);
    open_dialog(&mut dialog, &mut tree, Instant::now());
    assert_eq!(dialog.on_key(&escape(), &mut tree), DialogOutcome::Ignored);
}

#[test]
fn test_drop_unregisters() {
    let stack = DialogStack::new();
    let mut tree = page();
    {
        let mut dialog = Dialog::new(&stack, "panel");
        open_dialog(&mut dialog, &mut tree, Instant::now());
        assert_eq!(stack.len(), 1);
    }
    assert!(stack.is_empty());
}

#[test]
fn test_reopen_cycles_leave_stack_clean() {
    let stack = DialogStack::new();
    let mut tree = page();
    let mut dialog = Dialog::new(&stack, "panel");
    for _ in 0..3 {
        open_dialog(&mut dialog, &mut tree, Instant::now());
        dialog.set_open(false, &mut tree, Instant::now());
    }
    assert!(stack.is_empty());
}

// =============================================================================
// Overlay and transitions
// =============================================================================

#[test]
fn test_backdrop_click() {
    let stack = DialogStack::new();
    let mut tree = page();
    let mut closable = Dialog::new(&stack, "panel");
    assert_eq!(closable.pointer_down(PointerTarget::Backdrop), DialogOutcome::Ignored);

    open_dialog(&mut closable, &mut tree, Instant::now());
    assert_eq!(closable.pointer_down(PointerTarget::Backdrop), DialogOutcome::CloseRequested);
    assert_eq!(closable.pointer_down(PointerTarget::Panel), DialogOutcome::Ignored);

    let mut sticky = Dialog::new(&stack, "panel").close_on_overlay(false);
    open_dialog(&mut sticky, &mut tree, Instant::now());
    assert_eq!(sticky.pointer_down(PointerTarget::Backdrop), DialogOutcome::Consumed);
}

#[test]
fn test_mount_and_exit_timing() {
    let stack = DialogStack::new();
    let mut tree = page();
    let mut dialog = Dialog::new(&stack, "panel").exit_duration(Duration::from_millis(150));
    let now = Instant::now();

    assert!(!dialog.is_mounted());
    dialog.set_open(true, &mut tree, now);
    assert!(dialog.is_mounted());
    assert!(!dialog.is_shown());

    dialog.frame(&mut tree);
    assert_eq!(dialog.phase(), Phase::Entering { frames_left: 1 });
    dialog.frame(&mut tree);
    assert!(dialog.is_shown());

    dialog.set_open(false, &mut tree, now);
    assert!(dialog.is_mounted());
    assert!(!dialog.is_shown());
    assert!(!dialog.tick(now + Duration::from_millis(100)));
    assert!(dialog.tick(now + Duration::from_millis(150)));
    assert!(!dialog.is_mounted());
}

#[test]
fn test_initial_focus_waits_until_shown() {
    let stack = DialogStack::new();
    let mut tree = page();
    tree.focus(&FocusId::from("opener"));
    let mut dialog = Dialog::new(&stack, "panel");

    dialog.set_open(true, &mut tree, Instant::now());
    dialog.frame(&mut tree);
    assert!(tree.is_focused("opener"));

    dialog.frame(&mut tree);
    assert!(tree.is_focused("name"));
}

#[test]
fn test_keys_ignored_while_closed() {
    let stack = DialogStack::new();
    let mut tree = page();
    let mut dialog = Dialog::new(&stack, "panel");
    assert_eq!(dialog.on_key(&escape(), &mut tree), DialogOutcome::Ignored);
    assert_eq!(dialog.on_key(&tab(), &mut tree), DialogOutcome::Ignored);
}

#[test]
fn test_drawer_area() {
    let stack = DialogStack::new();
    let dialog = Dialog::new(&stack, "panel")
        .side(DialogSide::Right)
        .size(DialogSize::Md);
    let area = dialog.area(100, 40);
    assert_eq!(area.height, 40);
    assert_eq!(area.width, 50);
    assert_eq!(area.x + area.width, 100);
}
