//! External directives that force the combobox's selection.

use erpkit_lib::model::{RawOption, SelectOption};
use serde_json::Value;

use super::Combobox;

/// A directive from outside the widget, e.g. a parent resetting a form or
/// pre-filling a field after an inline create.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    Clear,
    /// Select the option matching this value or label.
    Select(RawOption),
}

impl Prompt {
    /// Parse `{ "action": "clear" }` or any option shape / bare value.
    pub fn from_json(value: &Value) -> Option<Self> {
        if value.get("action").and_then(Value::as_str) == Some("clear") {
            return Some(Prompt::Clear);
        }
        RawOption::from_json(value).map(Prompt::Select)
    }
}

impl Combobox {
    /// Apply a directive without user interaction.
    ///
    /// Matching tries the option value first, then the label. Without a match
    /// the field is cleared.
    pub fn apply_prompt(&mut self, prompt: Prompt) {
        match prompt {
            Prompt::Clear => self.clear(),
            Prompt::Select(raw) => {
                let wanted = SelectOption::from(raw);
                let found = self
                    .options
                    .iter()
                    .find(|o| o.value == wanted.value)
                    .or_else(|| self.options.iter().find(|o| o.label == wanted.label))
                    .cloned();
                match found {
                    Some(option) => self.select_option(&option),
                    None => {
                        log::debug!(
                            "Combobox {} prompt {:?} matched no option",
                            self.name(),
                            wanted.value
                        );
                        self.clear();
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_prompts() {
        assert_eq!(Prompt::from_json(&json!({"action": "clear"})), Some(Prompt::Clear));
        assert!(matches!(Prompt::from_json(&json!("owner")), Some(Prompt::Select(_))));
        assert!(matches!(
            Prompt::from_json(&json!({"id": 3, "name": "Clerk"})),
            Some(Prompt::Select(RawOption::NameId { .. }))
        ));
        assert_eq!(Prompt::from_json(&json!({"action": "reload"})), None);
    }
}
