//! Remote option loading.

use erpkit_lib::OptionSource;
use erpkit_lib::error::ApiError;
use erpkit_lib::model::{FilterParams, SelectOption};

use crate::latch::CancelLatch;

use super::Combobox;

/// Where a combobox gets its options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OptionsFrom {
    /// Supplied by the caller.
    #[default]
    Static,
    /// Fetched from a list endpoint.
    Remote { endpoint: String },
}

/// A single fetch started by [`Combobox::begin_fetch`].
///
/// The ticket carries everything needed to run the request, so the combobox
/// need not be borrowed while it is in flight.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    latch: CancelLatch,
    endpoint: String,
    params: FilterParams,
}

impl FetchTicket {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    /// Whether a newer fetch (or teardown) has superseded this one.
    pub fn is_stale(&self) -> bool {
        self.latch.is_tripped()
    }

    pub async fn run(&self, source: &dyn OptionSource) -> Result<Vec<SelectOption>, ApiError> {
        source.fetch_options(&self.endpoint, &self.params).await
    }
}

impl Combobox {
    /// Start a silent (re)fetch for the current parameters.
    ///
    /// Any earlier fetch becomes stale. Returns `None` for static options.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let OptionsFrom::Remote { endpoint } = &self.source else {
            return None;
        };
        if let Some(previous) = self.fetch_latch.take() {
            previous.trip();
        }
        let latch = CancelLatch::new();
        self.fetch_latch = Some(latch.clone());
        self.loading = true;
        log::debug!("Combobox {} fetching {} {:?}", self.name(), endpoint, self.params);
        Some(FetchTicket {
            latch,
            endpoint: endpoint.clone(),
            params: self.params.clone(),
        })
    }

    /// Apply the result of a fetch. Returns false if the ticket was stale.
    ///
    /// A failed fetch leaves an empty option list.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<SelectOption>, ApiError>,
    ) -> bool {
        if ticket.is_stale() {
            log::debug!("Combobox {} discarding stale fetch", self.name());
            return false;
        }
        self.fetch_latch = None;
        self.loading = false;

        match result {
            Ok(options) => {
                log::debug!("Combobox {} loaded {} options", self.name(), options.len());
                self.set_options(options);
            }
            Err(err) => {
                log::warn!("Combobox {} failed to load options: {}", self.name(), err);
                self.set_options(Vec::new());
            }
        }

        if std::mem::take(&mut self.pending_blur) {
            self.blur();
        }
        true
    }

    /// Fetch and apply options in one step.
    pub async fn load(&mut self, source: &dyn OptionSource) -> bool {
        let Some(ticket) = self.begin_fetch() else {
            return false;
        };
        let result = ticket.run(source).await;
        self.finish_fetch(ticket, result)
    }

    /// Change the auxiliary filter parameters.
    ///
    /// The current selection is cleared so a value picked under the old
    /// filter cannot leak into the new one. Returns the ticket for the
    /// re-fetch, or `None` if nothing changed or the options are static.
    pub fn set_params(&mut self, params: FilterParams) -> Option<FetchTicket> {
        if params == self.params {
            return None;
        }
        self.params = params;
        self.clear();
        self.begin_fetch()
    }

    /// Abandon any in-flight fetch, as when the widget is torn down.
    pub fn cancel_fetch(&mut self) {
        if let Some(latch) = self.fetch_latch.take() {
            latch.trip();
        }
        self.loading = false;
        self.pending_blur = false;
    }
}
