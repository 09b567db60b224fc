//! Per-resource fetch state with last-issued-wins response ordering.

use tracing::{debug, warn};

/// Identifies one issued request; later requests carry larger tickets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResourceState<T> {
    Idle,
    Fetching { ticket: RequestTicket },
    Loaded { value: T, ticket: RequestTicket },
}

/// Fetch state of one logical backend resource (category list, filter
/// options for a dimension, ...).
///
/// Only the response to the most recently issued request is accepted, so a
/// slow earlier response can never overwrite newer data.
#[derive(Debug, Clone)]
pub struct Resource<T> {
    name: String,
    state: ResourceState<T>,
    next_ticket: u64,
}

impl<T> Resource<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: ResourceState::Idle,
            next_ticket: 0,
        }
    }

    pub fn state(&self) -> &ResourceState<T> {
        &self.state
    }

    pub fn value(&self) -> Option<&T> {
        match &self.state {
            ResourceState::Loaded { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self.state, ResourceState::Fetching { .. })
    }

    /// Issue a new request, superseding any in-flight one
    pub fn begin(&mut self) -> RequestTicket {
        self.next_ticket += 1;
        let ticket = RequestTicket(self.next_ticket);
        debug!(resource = %self.name, ticket = ticket.0, "request issued");
        self.state = ResourceState::Fetching { ticket };
        ticket
    }

    /// Issue a request only if nothing was fetched or is being fetched yet
    pub fn begin_if_idle(&mut self) -> Option<RequestTicket> {
        match self.state {
            ResourceState::Idle => Some(self.begin()),
            _ => None,
        }
    }

    /// Accept a response if it belongs to the latest request.
    /// Returns false (and keeps the current state) for stale responses.
    pub fn resolve(&mut self, ticket: RequestTicket, value: T) -> bool {
        if ticket.0 != self.next_ticket {
            warn!(
                resource = %self.name,
                ticket = ticket.0,
                latest = self.next_ticket,
                "dropping stale response"
            );
            return false;
        }
        self.state = ResourceState::Loaded { value, ticket };
        true
    }

    /// Record a failed latest request; the resource becomes idle again so the
    /// caller may retry
    pub fn fail(&mut self, ticket: RequestTicket) {
        if ticket.0 == self.next_ticket && self.is_fetching() {
            self.state = ResourceState::Idle;
        }
    }

    pub fn reset(&mut self) {
        self.state = ResourceState::Idle;
    }
}
