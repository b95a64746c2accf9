//! Combobox widget state.

use erpkit_lib::error::FieldError;
use erpkit_lib::model::{FilterParams, SelectOption, dedup_options};

use crate::events::{ChangeEvent, EventResult};
use crate::keys::{Key, KeyCombo};
use crate::latch::CancelLatch;
use crate::validation::{ErrorDisplay, require};

use super::create::Creator;
use super::filter::{exact_label_match, filter_options};
use super::remote::OptionsFrom;

/// How typed text relates to the emitted value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueMode {
    /// Only option values may be emitted. Unmatched text is cleared on blur.
    #[default]
    Strict,
    /// Typed text is the value unless it exactly matches an option label.
    FreeText,
}

/// A text input bound to a list of options.
///
/// The combobox keeps two things apart: the display `text` the user edits and
/// the `value` that gets submitted. Changes to the value are queued as
/// [`ChangeEvent`]s and drained with [`Combobox::take_events`].
///
/// # Example
///
/// ```ignore
/// let mut role = Combobox::new("role")
///     .options(vec![SelectOption::new("Owner", "owner")]);
///
/// role.input("own");
/// assert_eq!(role.filtered().count(), 1);
/// role.blur();
/// // Strict mode: "own" is not an exact label, so the field clears.
/// assert_eq!(role.take_events(), vec![ChangeEvent::cleared("role")]);
/// ```
#[derive(Debug)]
pub struct Combobox {
    name: String,
    label: String,
    mode: ValueMode,
    required: bool,
    read_only: bool,
    error_display: ErrorDisplay,

    // Input state
    pub(super) text: String,
    /// The user typed since the text last matched the value.
    edited: bool,
    pub(super) value: Option<String>,
    pub(super) error: Option<String>,

    // Dropdown state
    pub(super) options: Vec<SelectOption>,
    /// Indices into `options` matching the current text.
    filtered: Vec<usize>,
    open: bool,
    /// Index into `filtered`.
    highlighted: Option<usize>,

    // Remote state
    pub(super) source: OptionsFrom,
    pub(super) params: FilterParams,
    pub(super) fetch_latch: Option<CancelLatch>,
    pub(super) loading: bool,
    /// A strict blur that arrived while the first fetch was still running.
    pub(super) pending_blur: bool,

    // Create state
    pub(super) creator: Option<Creator>,
    pub(super) creating: bool,
    /// Label of the option just created; suppresses "create" for that text.
    pub(super) locked: Option<String>,

    events: Vec<ChangeEvent>,
}

impl Combobox {
    /// Create an empty combobox for the form field `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            mode: ValueMode::Strict,
            required: false,
            read_only: false,
            error_display: ErrorDisplay::default(),
            text: String::new(),
            edited: false,
            value: None,
            error: None,
            options: Vec::new(),
            filtered: Vec::new(),
            open: false,
            highlighted: None,
            source: OptionsFrom::Static,
            params: FilterParams::new(),
            fetch_latch: None,
            loading: false,
            pending_blur: false,
            creator: None,
            creating: false,
            locked: None,
            events: Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Builders
    // -------------------------------------------------------------------------

    /// Set the visible field label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Use a static option list.
    pub fn options(mut self, options: impl IntoIterator<Item = SelectOption>) -> Self {
        self.options = dedup_options(options);
        self.refilter();
        self
    }

    /// Fetch options from `endpoint` (see [`Combobox::begin_fetch`]).
    pub fn remote(mut self, endpoint: impl Into<String>) -> Self {
        self.source = OptionsFrom::Remote {
            endpoint: endpoint.into(),
        };
        self
    }

    /// Auxiliary filter parameters sent with every fetch.
    pub fn params(mut self, params: FilterParams) -> Self {
        self.params = params;
        self
    }

    pub fn mode(mut self, mode: ValueMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for `mode(ValueMode::FreeText)`.
    pub fn allow_custom_value(self) -> Self {
        self.mode(ValueMode::FreeText)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn creator(mut self, creator: Creator) -> Self {
        self.creator = Some(creator);
        self
    }

    pub fn error_display(mut self, display: ErrorDisplay) -> Self {
        self.error_display = display;
        self
    }

    /// Initial value. For static options the text is set to the matching label.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.text = self.label_for(&value).unwrap_or_else(|| match self.mode {
            ValueMode::FreeText => value.clone(),
            ValueMode::Strict => String::new(),
        });
        self.value = Some(value);
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_label(&self) -> &str {
        &self.label
    }

    pub fn value_mode(&self) -> ValueMode {
        self.mode
    }

    /// The display text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The emitted value.
    pub fn current_value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn all_options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Options matching the current text, in list order.
    pub fn filtered(&self) -> impl Iterator<Item = &SelectOption> {
        self.filtered.iter().filter_map(|&i| self.options.get(i))
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Highlighted position within [`Combobox::filtered`].
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn highlighted_option(&self) -> Option<&SelectOption> {
        self.highlighted
            .and_then(|h| self.filtered.get(h))
            .and_then(|&i| self.options.get(i))
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn error_placement(&self) -> ErrorDisplay {
        self.error_display
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Whether an option fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn filter_params(&self) -> &FilterParams {
        &self.params
    }

    /// Drain queued change events.
    pub fn take_events(&mut self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.events)
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    /// Replace the display text, as on every keystroke.
    pub fn input(&mut self, text: impl Into<String>) {
        if self.read_only {
            return;
        }
        self.text = text.into();
        self.edited = true;
        self.pending_blur = false;
        if self.locked.as_deref() != Some(self.text.as_str()) {
            self.locked = None;
        }
        self.error = None;
        self.refilter();
        self.open = true;
        self.highlighted = if self.filtered.is_empty() { None } else { Some(0) };

        if self.mode == ValueMode::FreeText {
            let value = self.free_text_value();
            self.set_value_emitting(value);
        }
    }

    /// Handle a key press while the input has focus.
    pub fn on_key(&mut self, key: &KeyCombo) -> EventResult {
        if key.modifiers.ctrl || key.modifiers.alt || self.read_only {
            return EventResult::Ignored;
        }

        match key.key {
            Key::Down => {
                self.move_highlight(1);
                EventResult::Consumed
            }
            Key::Up => {
                self.move_highlight(-1);
                EventResult::Consumed
            }
            Key::Enter => match (self.open, self.highlighted) {
                (true, Some(index)) => {
                    self.select(index);
                    EventResult::Consumed
                }
                _ => EventResult::Ignored,
            },
            Key::Escape if self.open => {
                self.close();
                EventResult::Consumed
            }
            Key::Char(c) => {
                let mut text = self.text.clone();
                text.push(c);
                self.input(text);
                EventResult::Consumed
            }
            Key::Backspace => {
                let mut text = self.text.clone();
                text.pop();
                self.input(text);
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    /// Open the dropdown without changing the text (focus, click).
    pub fn open(&mut self) {
        if self.read_only {
            return;
        }
        self.open = true;
        self.pending_blur = false;
        if self.highlighted.is_none() && !self.filtered.is_empty() {
            self.highlighted = Some(0);
        }
    }

    pub fn close(&mut self) {
        self.open = false;
        self.highlighted = None;
    }

    /// Select the option at `index` within [`Combobox::filtered`].
    pub fn select(&mut self, index: usize) -> bool {
        let Some(option) = self
            .filtered
            .get(index)
            .and_then(|&i| self.options.get(i))
            .cloned()
        else {
            return false;
        };
        self.select_option(&option);
        true
    }

    /// Focus left the input.
    ///
    /// Strict mode keeps the text only if it is exactly an option label;
    /// anything else clears the field. Free-text mode keeps the text.
    pub fn blur(&mut self) {
        self.close();
        if self.read_only {
            return;
        }

        match self.mode {
            ValueMode::Strict => {
                if let Some(index) = exact_label_match(&self.text, &self.options) {
                    let option = self.options[index].clone();
                    self.select_option(&option);
                } else if self.loading && !self.edited && self.value.is_some() {
                    log::debug!("Combobox {} keeping untouched value while loading", self.name);
                } else if self.loading && self.options.is_empty() && !self.text.is_empty() {
                    // Nothing to compare against yet; decide once the fetch lands.
                    log::debug!("Combobox {} deferring blur until options load", self.name);
                    self.pending_blur = true;
                } else {
                    self.clear();
                }
            }
            ValueMode::FreeText => {
                if let Some(index) = exact_label_match(&self.text, &self.options) {
                    self.text = self.options[index].label.clone();
                }
                self.edited = false;
                let value = self.free_text_value();
                self.set_value_emitting(value);
            }
        }
    }

    /// Clear text and value, emitting a cleared change event if anything was set.
    pub fn clear(&mut self) {
        let had_something = !self.text.is_empty() || self.value.is_some();
        self.text.clear();
        self.edited = false;
        self.value = None;
        self.locked = None;
        self.pending_blur = false;
        self.refilter();
        if had_something {
            log::debug!("Combobox {} cleared", self.name);
            self.events.push(ChangeEvent::cleared(&self.name));
        }
    }

    /// Replace the option list wholesale.
    ///
    /// In strict mode a value that is no longer among the options is cleared.
    pub fn set_options(&mut self, options: Vec<SelectOption>) {
        self.options = dedup_options(options);
        self.refilter();
        self.enforce_value_in_options();
    }

    /// Check the required constraint, storing the error on the field.
    pub fn validate(&mut self) -> Result<(), FieldError> {
        if !self.required {
            return Ok(());
        }
        let result = require(&self.label, self.value.as_deref());
        self.error = result.as_ref().err().map(ToString::to_string);
        result
    }

    // -------------------------------------------------------------------------
    // Internals shared with the remote/create/prompt modules
    // -------------------------------------------------------------------------

    pub(super) fn select_option(&mut self, option: &SelectOption) {
        self.text = option.label.clone();
        self.edited = false;
        self.error = None;
        self.pending_blur = false;
        self.close();
        self.refilter();
        self.set_value_emitting(Some(option.value.clone()));
    }

    pub(super) fn refilter(&mut self) {
        self.filtered = filter_options(&self.text, &self.options);
        if let Some(h) = self.highlighted
            && h >= self.filtered.len()
        {
            self.highlighted = if self.filtered.is_empty() { None } else { Some(0) };
        }
    }

    pub(super) fn enforce_value_in_options(&mut self) {
        if self.mode != ValueMode::Strict {
            return;
        }
        let Some(value) = self.value.clone() else {
            return;
        };
        match self.label_for(&value) {
            Some(label) => {
                if !self.edited {
                    self.text = label;
                    self.refilter();
                }
            }
            None => {
                log::debug!("Combobox {} value {:?} no longer in options", self.name, value);
                self.clear();
            }
        }
    }

    pub(super) fn set_value_emitting(&mut self, value: Option<String>) {
        if self.value != value {
            self.value = value.clone();
            self.events.push(ChangeEvent::new(&self.name, value));
        }
    }

    fn label_for(&self, value: &str) -> Option<String> {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.clone())
    }

    fn free_text_value(&self) -> Option<String> {
        match exact_label_match(&self.text, &self.options) {
            Some(index) => Some(self.options[index].value.clone()),
            None if self.text.is_empty() => None,
            None => Some(self.text.clone()),
        }
    }

    fn move_highlight(&mut self, delta: isize) {
        if !self.open {
            self.open();
            return;
        }
        let len = self.filtered.len();
        if len == 0 {
            self.highlighted = None;
            return;
        }
        let next = match self.highlighted {
            Some(current) => (current as isize + delta).rem_euclid(len as isize) as usize,
            None if delta < 0 => len - 1,
            None => 0,
        };
        self.highlighted = Some(next);
    }
}

impl Drop for Combobox {
    fn drop(&mut self) {
        // Results of in-flight fetches have nowhere to go.
        if let Some(latch) = &self.fetch_latch {
            latch.trip();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles() -> Vec<SelectOption> {
        vec![
            SelectOption::new("Owner", "owner"),
            SelectOption::new("Manager", "manager"),
            SelectOption::new("Clerk", "clerk"),
        ]
    }

    #[test]
    fn test_arrow_keys_wrap() {
        let mut cb = Combobox::new("role").options(roles());
        cb.input("");
        assert_eq!(cb.highlighted(), Some(0));
        cb.on_key(&KeyCombo::key(Key::Up));
        assert_eq!(cb.highlighted(), Some(2));
        cb.on_key(&KeyCombo::key(Key::Down));
        assert_eq!(cb.highlighted(), Some(0));
    }

    #[test]
    fn test_down_opens_closed_dropdown() {
        let mut cb = Combobox::new("role").options(roles());
        assert!(!cb.is_open());
        cb.on_key(&KeyCombo::key(Key::Down));
        assert!(cb.is_open());
        assert_eq!(cb.highlighted(), Some(0));
    }

    #[test]
    fn test_enter_selects_highlighted() {
        let mut cb = Combobox::new("role").options(roles());
        cb.input("er");
        assert_eq!(cb.filtered_count(), 3);
        cb.on_key(&KeyCombo::key(Key::Down));
        assert_eq!(cb.on_key(&KeyCombo::key(Key::Enter)), EventResult::Consumed);
        assert_eq!(cb.text(), "Manager");
        assert_eq!(cb.current_value(), Some("manager"));
        assert!(!cb.is_open());
    }

    #[test]
    fn test_ctrl_keys_ignored() {
        let mut cb = Combobox::new("role").options(roles());
        assert_eq!(
            cb.on_key(&KeyCombo::key(Key::Char('a')).ctrl()),
            EventResult::Ignored
        );
        assert_eq!(cb.text(), "");
    }

    #[test]
    fn test_read_only_ignores_input() {
        let mut cb = Combobox::new("role").options(roles()).value("owner").read_only();
        cb.input("Clerk");
        cb.blur();
        assert_eq!(cb.text(), "Owner");
        assert!(cb.take_events().is_empty());
    }

    #[test]
    fn test_validate_required() {
        let mut cb = Combobox::new("role").label("Role").options(roles()).required();
        assert!(cb.validate().is_err());
        assert_eq!(cb.error(), Some("Role is required"));
        cb.select(0);
        assert!(cb.validate().is_ok());
        assert_eq!(cb.error(), None);
    }
}
