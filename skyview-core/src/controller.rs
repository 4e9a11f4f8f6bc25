//! View state for the lookup screen and the transitions that drive it.
//!
//! [`ViewState`] is an immutable snapshot. Every transition builds a new one
//! and swaps it in whole, so a renderer never sees a fresh error next to a
//! stale record.
//!
//! Overlapping searches are sequence-stamped: each [`begin_search`] hands out
//! a ticket with a higher number, and [`finish_search`] drops any completion
//! whose ticket is no longer the newest. Last *submitted* search wins, not
//! last completed. Renderers hold on to the `Arc` returned by
//! [`LookupController::state`]; later transitions never mutate it.
//!
//! [`begin_search`]: LookupController::begin_search
//! [`finish_search`]: LookupController::finish_search

use std::sync::Arc;

use tracing::debug;

use crate::{
    Credential, LookupError, WeatherRecord,
    map::{MapView, build_map_url},
    provider::{LookupResult, WeatherLookup},
};

/// What the results area shows: nothing yet, a record, or an error banner.
#[derive(Debug, Clone, PartialEq, Default)]
enum Panel {
    #[default]
    Empty,
    Weather(WeatherRecord),
    Error(LookupError),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    query: String,
    panel: Panel,
    map: Option<MapView>,
    in_flight: bool,
}

impl ViewState {
    /// Current (trimmed) search text.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn weather(&self) -> Option<&WeatherRecord> {
        match &self.panel {
            Panel::Weather(record) => Some(record),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LookupError> {
        match &self.panel {
            Panel::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        self.error().map(LookupError::user_message)
    }

    pub fn map(&self) -> Option<&MapView> {
        self.map.as_ref()
    }

    /// A search has been started and its newest ticket is not finished yet.
    pub fn is_loading(&self) -> bool {
        self.in_flight
    }
}

/// Handle for one started search. Consumed by [`LookupController::finish_search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    query: String,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Owns the view state for the lifetime of the screen.
#[derive(Debug)]
pub struct LookupController<L> {
    service: Arc<L>,
    credential: Credential,
    state: Arc<ViewState>,
    latest_seq: u64,
}

impl<L: WeatherLookup> LookupController<L> {
    pub fn new(service: L, credential: Credential) -> Self {
        Self {
            service: Arc::new(service),
            credential,
            state: Arc::new(ViewState::default()),
            latest_seq: 0,
        }
    }

    pub fn state(&self) -> Arc<ViewState> {
        Arc::clone(&self.state)
    }

    /// Shared handle to the lookup service, for hosts that run searches
    /// concurrently between `begin_search` and `finish_search`.
    pub fn service(&self) -> Arc<L> {
        Arc::clone(&self.service)
    }

    /// Record an edit of the search field without searching.
    pub fn set_query(&mut self, text: &str) {
        let query = text.trim();
        if query == self.state.query {
            return;
        }
        self.replace(|prev| ViewState {
            query: query.to_string(),
            ..prev.clone()
        });
    }

    /// Search for `text` and apply the outcome.
    pub async fn submit_search(&mut self, text: &str) {
        let Some(ticket) = self.begin_search(text) else {
            return;
        };
        let result = self.service.lookup(ticket.query(), &self.credential).await;
        self.finish_search(ticket, result);
    }

    /// Start a search. Returns `None`, leaving state untouched, for blank text.
    pub fn begin_search(&mut self, text: &str) -> Option<SearchTicket> {
        let query = text.trim();
        if query.is_empty() {
            return None;
        }

        self.latest_seq += 1;
        let ticket = SearchTicket {
            seq: self.latest_seq,
            query: query.to_string(),
        };

        self.replace(|prev| ViewState {
            query: ticket.query.clone(),
            in_flight: true,
            ..prev.clone()
        });

        Some(ticket)
    }

    /// Apply a finished search. Returns false if a newer search has started
    /// since `ticket` was issued; the result is discarded in that case.
    pub fn finish_search(&mut self, ticket: SearchTicket, result: LookupResult) -> bool {
        if ticket.seq != self.latest_seq {
            debug!(
                stale = ticket.seq,
                latest = self.latest_seq,
                query = %ticket.query,
                "discarding superseded search result"
            );
            return false;
        }

        self.replace(|prev| {
            let panel = match result {
                Ok(record) => Panel::Weather(record),
                Err(LookupError::EmptyInput) => prev.panel.clone(),
                Err(err) => Panel::Error(err),
            };
            ViewState {
                panel,
                in_flight: false,
                ..prev.clone()
            }
        });

        true
    }

    /// Point the map at the current query, centered on the last record's
    /// coordinates when there is one. Does nothing while the query is blank.
    pub fn request_map(&mut self) {
        let current = self.state();
        let coordinates = current.weather().and_then(|w| w.coordinates);

        let Some(view) = build_map_url(current.query(), coordinates) else {
            return;
        };

        self.replace(|prev| ViewState {
            map: Some(view),
            ..prev.clone()
        });
    }

    fn replace(&mut self, next: impl FnOnce(&ViewState) -> ViewState) {
        self.state = Arc::new(next(&self.state));
    }
}
