//! Inline creation of options that don't exist yet.

use std::fmt;
use std::sync::Arc;

use erpkit_lib::OptionSource;
use erpkit_lib::error::ApiError;
use erpkit_lib::model::{RawOption, SelectOption};
use serde_json::{Map, Value};

use super::Combobox;
use super::filter::has_label_ignore_case;

/// Callback receiving create requests for a parent-driven flow.
pub type CreateCallback = Arc<dyn Fn(&CreateRequest) + Send + Sync>;

/// How a combobox creates new options.
#[derive(Clone)]
pub enum Creator {
    /// `POST { <field name>: <text> }` to this endpoint.
    Endpoint(String),
    /// Hand the request to the parent, which runs its own flow (typically a
    /// dialog) and later calls [`Combobox::insert_created`].
    Callback(CreateCallback),
}

impl Creator {
    pub fn endpoint(endpoint: impl Into<String>) -> Self {
        Self::Endpoint(endpoint.into())
    }

    pub fn callback(f: impl Fn(&CreateRequest) + Send + Sync + 'static) -> Self {
        Self::Callback(Arc::new(f))
    }
}

impl fmt::Debug for Creator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Creator::Endpoint(endpoint) => f.debug_tuple("Endpoint").field(endpoint).finish(),
            Creator::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// What the parent receives from a callback creator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    /// Form field name.
    pub name: String,
    /// Text the user typed.
    pub label: String,
    /// Proposed value (same as the label until the backend assigns one).
    pub value: String,
}

/// A create POST that has been started but not yet sent.
#[derive(Debug, Clone)]
pub struct PendingCreate {
    endpoint: String,
    field: String,
    text: String,
}

impl PendingCreate {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The request body: `{ <field>: <text> }`.
    pub fn payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert(self.field.clone(), Value::String(self.text.clone()));
        payload
    }

    pub async fn run(&self, source: &dyn OptionSource) -> Result<Value, ApiError> {
        source.create_record(&self.endpoint, self.payload()).await
    }

    /// The option to add once the backend accepted the record.
    ///
    /// Records carrying their own label (`{label, value}`, `{name, id}`) are
    /// used as returned. Otherwise the typed text is the label, paired with
    /// the returned value when there is one.
    fn created_option(&self, record: &Value) -> SelectOption {
        match RawOption::from_json(record) {
            Some(raw @ (RawOption::LabelValue { .. } | RawOption::NameId { .. })) => {
                SelectOption::from(raw)
            }
            Some(RawOption::ValueOnly { value }) => SelectOption::new(&self.text, value.to_string()),
            _ => SelectOption::new(&self.text, &self.text),
        }
    }
}

/// The first half of a create action.
#[derive(Debug, Clone)]
pub enum CreateStep {
    /// Creating is not possible for the current text.
    Unavailable,
    /// The callback was invoked with this request.
    Delegated(CreateRequest),
    /// A POST should be sent; finish with [`Combobox::finish_create`].
    Post(PendingCreate),
}

/// How a create action ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Unavailable,
    Delegated(CreateRequest),
    Created(SelectOption),
    /// The field error now shown on the combobox.
    Failed(String),
}

impl Combobox {
    /// Whether the "create" affordance should be offered.
    pub fn can_create(&self) -> bool {
        let text = self.text.trim();
        self.creator.is_some()
            && !self.is_read_only()
            && !self.creating
            && !text.is_empty()
            && !has_label_ignore_case(text, &self.options)
            && self.locked.as_deref() != Some(self.text.as_str())
    }

    /// Whether a create POST is in flight.
    pub fn is_creating(&self) -> bool {
        self.creating
    }

    /// Whether the field is locked to a just-created option.
    pub fn is_locked(&self) -> bool {
        self.locked.is_some()
    }

    /// Start creating an option from the current text.
    pub fn begin_create(&mut self) -> CreateStep {
        if !self.can_create() {
            return CreateStep::Unavailable;
        }
        let text = self.text.trim().to_string();

        match self.creator.clone() {
            Some(Creator::Callback(callback)) => {
                let request = CreateRequest {
                    name: self.name().to_string(),
                    label: text.clone(),
                    value: text,
                };
                log::debug!("Combobox {} delegating create of {:?}", self.name(), request.label);
                callback(&request);
                CreateStep::Delegated(request)
            }
            Some(Creator::Endpoint(endpoint)) => {
                self.creating = true;
                self.error = None;
                log::debug!("Combobox {} creating {:?} via {}", self.name(), text, endpoint);
                CreateStep::Post(PendingCreate {
                    endpoint,
                    field: self.name().to_string(),
                    text,
                })
            }
            None => CreateStep::Unavailable,
        }
    }

    /// Apply the backend's answer to a create POST.
    ///
    /// On failure the typed text stays and the error is shown on the field.
    pub fn finish_create(
        &mut self,
        pending: PendingCreate,
        result: Result<Value, ApiError>,
    ) -> CreateOutcome {
        self.creating = false;
        match result {
            Ok(record) => {
                let option = pending.created_option(&record);
                self.insert_created(option.clone());
                CreateOutcome::Created(option)
            }
            Err(err) => {
                log::warn!("Combobox {} create failed: {}", self.name(), err);
                let message = err.user_message();
                self.error = Some(message.clone());
                CreateOutcome::Failed(message)
            }
        }
    }

    /// Run the whole create action against `source`.
    pub async fn create(&mut self, source: &dyn OptionSource) -> CreateOutcome {
        match self.begin_create() {
            CreateStep::Unavailable => CreateOutcome::Unavailable,
            CreateStep::Delegated(request) => CreateOutcome::Delegated(request),
            CreateStep::Post(pending) => {
                let result = pending.run(source).await;
                self.finish_create(pending, result)
            }
        }
    }

    /// Add a newly created option, select it and lock the field to it.
    pub fn insert_created(&mut self, option: SelectOption) {
        if !self.options.iter().any(|o| o.value == option.value) {
            self.options.push(option.clone());
        }
        self.select_option(&option);
        self.locked = Some(option.label);
    }
}
