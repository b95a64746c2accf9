//! Dialog state: open/close lifecycle, focus capture and the Tab trap.

use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::focus::{FocusHost, FocusId, focusable_in};
use crate::keys::{Key, KeyCombo};
use crate::transition::{Phase, Transition};

use super::layout::{DialogArea, DialogSide, DialogSize};
use super::stack::{DialogId, DialogStack, StackEntry};

/// A shared slot a parent fills with the element that should get focus back.
pub type FocusRef = Arc<RwLock<Option<FocusId>>>;

/// Where focus goes when the dialog closes.
#[derive(Clone)]
pub enum ReturnFocus {
    Element(FocusId),
    Ref(FocusRef),
    Resolver(Arc<dyn Fn() -> Option<FocusId> + Send + Sync>),
}

impl ReturnFocus {
    pub fn resolver(f: impl Fn() -> Option<FocusId> + Send + Sync + 'static) -> Self {
        Self::Resolver(Arc::new(f))
    }

    fn resolve(&self) -> Option<FocusId> {
        match self {
            ReturnFocus::Element(id) => Some(id.clone()),
            ReturnFocus::Ref(slot) => slot.read().unwrap_or_else(|e| e.into_inner()).clone(),
            ReturnFocus::Resolver(f) => f(),
        }
    }
}

impl fmt::Debug for ReturnFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnFocus::Element(id) => f.debug_tuple("Element").field(id).finish(),
            ReturnFocus::Ref(slot) => f.debug_tuple("Ref").field(slot).finish(),
            ReturnFocus::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

/// Where a pointer-down landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The backdrop itself, not something inside the panel.
    Backdrop,
    Panel,
}

/// What the dialog wants after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Ignored,
    Consumed,
    /// The parent should set `open` to false.
    CloseRequested,
}

/// A modal dialog.
///
/// The parent owns the `open` flag and passes it in with
/// [`Dialog::set_open`]; the dialog only ever *requests* closing.
///
/// While open, the dialog is registered on its [`DialogStack`]. Escape and
/// Tab are handled only by the topmost open dialog, so nested dialogs
/// compose.
#[derive(Debug)]
pub struct Dialog {
    id: DialogId,
    stack: DialogStack,
    entry: Option<StackEntry>,
    /// The panel element that contains the dialog's content.
    panel: FocusId,

    title: String,
    side: DialogSide,
    size: DialogSize,
    close_on_overlay: bool,
    close_on_esc: bool,
    return_focus: Option<ReturnFocus>,

    open: bool,
    transition: Transition,
    captured_focus: Option<FocusId>,
    initial_focus_done: bool,
}

impl Dialog {
    pub fn new(stack: &DialogStack, panel: impl Into<FocusId>) -> Self {
        Self {
            id: DialogId::new(),
            stack: stack.clone(),
            entry: None,
            panel: panel.into(),
            title: String::new(),
            side: DialogSide::default(),
            size: DialogSize::default(),
            close_on_overlay: true,
            close_on_esc: true,
            return_focus: None,
            open: false,
            transition: Transition::default(),
            captured_focus: None,
            initial_focus_done: false,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn side(mut self, side: DialogSide) -> Self {
        self.side = side;
        self
    }

    pub fn size(mut self, size: DialogSize) -> Self {
        self.size = size;
        self
    }

    pub fn close_on_overlay(mut self, enabled: bool) -> Self {
        self.close_on_overlay = enabled;
        self
    }

    pub fn close_on_esc(mut self, enabled: bool) -> Self {
        self.close_on_esc = enabled;
        self
    }

    pub fn return_focus(mut self, target: ReturnFocus) -> Self {
        self.return_focus = Some(target);
        self
    }

    /// Length of the exit animation; the dialog stays mounted this long.
    pub fn exit_duration(mut self, duration: Duration) -> Self {
        self.transition = Transition::new(duration);
        self
    }

    pub fn id(&self) -> DialogId {
        self.id
    }

    pub fn panel(&self) -> &FocusId {
        &self.panel
    }

    pub fn title_text(&self) -> &str {
        &self.title
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_mounted(&self) -> bool {
        self.transition.is_mounted()
    }

    pub fn is_shown(&self) -> bool {
        self.transition.is_shown()
    }

    pub fn phase(&self) -> Phase {
        self.transition.phase()
    }

    /// Whether this dialog is open and on top of its stack.
    pub fn is_topmost(&self) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|entry| self.stack.is_topmost(entry.id()))
    }

    /// Panel area for a screen of the given size.
    pub fn area(&self, screen_width: u16, screen_height: u16) -> DialogArea {
        DialogArea::calculate(screen_width, screen_height, self.side, self.size)
    }

    /// Sync with the parent's `open` flag.
    pub fn set_open(&mut self, open: bool, host: &mut dyn FocusHost, now: Instant) {
        if open == self.open {
            return;
        }
        self.open = open;

        if open {
            self.entry = Some(self.stack.enter(self.id));
            self.captured_focus = host.active_element();
            self.initial_focus_done = false;
            self.transition.open();
            log::debug!("Dialog {} opened (captured focus {:?})", self.id, self.captured_focus);
        } else {
            self.entry = None;
            self.transition.close(now);
            self.restore_focus(host);
            log::debug!("Dialog {} closing", self.id);
        }
    }

    /// Called once after each paint.
    ///
    /// The first frame of an open session moves focus into the panel.
    pub fn frame(&mut self, host: &mut dyn FocusHost) {
        self.transition.frame();
        if self.open && self.transition.is_shown() && !self.initial_focus_done {
            self.initial_focus_done = true;
            let target = focusable_in(host, &self.panel)
                .into_iter()
                .next()
                .unwrap_or_else(|| self.panel.clone());
            host.focus(&target);
        }
    }

    /// Advance the exit timer. Returns true when the dialog unmounts.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.transition.tick(now)
    }

    /// Handle a key press. Only the topmost open dialog responds.
    pub fn on_key(&mut self, key: &KeyCombo, host: &mut dyn FocusHost) -> DialogOutcome {
        if !(self.open && self.transition.is_mounted()) || !self.is_topmost() {
            return DialogOutcome::Ignored;
        }

        match key.key {
            Key::Escape if self.close_on_esc => {
                log::debug!("Dialog {} close requested via Escape", self.id);
                DialogOutcome::CloseRequested
            }
            Key::Tab => {
                self.trap_tab(key.modifiers.shift, host);
                DialogOutcome::Consumed
            }
            _ => DialogOutcome::Ignored,
        }
    }

    /// Handle a pointer-down on the overlay.
    pub fn pointer_down(&self, target: PointerTarget) -> DialogOutcome {
        if !self.open {
            return DialogOutcome::Ignored;
        }
        match target {
            PointerTarget::Backdrop if self.close_on_overlay => DialogOutcome::CloseRequested,
            PointerTarget::Backdrop => DialogOutcome::Consumed,
            PointerTarget::Panel => DialogOutcome::Ignored,
        }
    }

    fn trap_tab(&self, backwards: bool, host: &mut dyn FocusHost) {
        let focusables = focusable_in(host, &self.panel);
        let (Some(first), Some(last)) = (focusables.first(), focusables.last()) else {
            host.focus(&self.panel);
            return;
        };

        let active = host.active_element();
        let position = active
            .as_ref()
            .and_then(|a| focusables.iter().position(|f| f == a));

        let target = match position {
            Some(index) if backwards => {
                if index == 0 {
                    last
                } else {
                    &focusables[index - 1]
                }
            }
            Some(index) => focusables.get(index + 1).unwrap_or(first),
            // Focus escaped the panel (or sits on the panel itself).
            None if backwards => last,
            None => first,
        };
        host.focus(target);
    }

    fn restore_focus(&mut self, host: &mut dyn FocusHost) {
        let captured = self.captured_focus.take();
        let target = self
            .return_focus
            .as_ref()
            .and_then(ReturnFocus::resolve)
            .filter(|id| host.is_attached(id))
            .or_else(|| captured.filter(|id| host.is_attached(id)));

        if let Some(target) = target {
            log::debug!("Dialog {} returning focus to {}", self.id, target);
            host.focus(&target);
        }
    }
}
