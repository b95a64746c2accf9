//! The `OptionSource` seam between widgets and the backend.

use async_trait::async_trait;
use serde_json::Map;
use serde_json::Value;

use crate::ErpClient;
use crate::error::ApiError;
use crate::model::FilterParams;
use crate::model::SelectOption;
use crate::model::normalize_options;

/// Something that can list options and create records.
///
/// [`ErpClient`] is the production implementation. Widgets only depend on
/// this trait, so tests and offline tools can supply their own.
#[async_trait]
pub trait OptionSource: Send + Sync {
    /// Fetch and normalize the options behind `endpoint`.
    async fn fetch_options(
        &self,
        endpoint: &str,
        params: &FilterParams,
    ) -> Result<Vec<SelectOption>, ApiError>;

    /// Create a record and return it (already unwrapped from `{data: ..}`).
    async fn create_record(
        &self,
        endpoint: &str,
        payload: Map<String, Value>,
    ) -> Result<Value, ApiError>;
}

#[async_trait]
impl OptionSource for ErpClient {
    async fn fetch_options(
        &self,
        endpoint: &str,
        params: &FilterParams,
    ) -> Result<Vec<SelectOption>, ApiError> {
        let rows = self.list(endpoint, params).await?;
        Ok(normalize_options(&rows))
    }

    async fn create_record(
        &self,
        endpoint: &str,
        payload: Map<String, Value>,
    ) -> Result<Value, ApiError> {
        self.create(endpoint, &payload).await
    }
}
