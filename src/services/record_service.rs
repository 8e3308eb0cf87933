use deskboard_api::{ApiError, Page, Record};
use deskboard_ui::Mode;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::listing_page::{FetchTicket, Target};

/// Outcome of a background call, tagged with the page that asked for it
#[derive(Debug)]
pub enum ServiceEvent {
    Listed {
        page: usize,
        generation: u64,
        result: Result<Page, ApiError>,
    },
    Saved {
        page: usize,
        mode: Mode,
        result: Result<Option<Record>, ApiError>,
    },
    Deleted {
        page: usize,
        id: String,
        result: Result<(), ApiError>,
    },
}

/// Runs collection reads and writes on spawned tasks so the event loop never
/// waits on the network
#[derive(Debug, Clone)]
pub struct RecordService {
    events: UnboundedSender<ServiceEvent>,
}

impl RecordService {
    #[must_use]
    pub fn channel() -> (Self, UnboundedReceiver<ServiceEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (Self { events }, receiver)
    }

    fn send(events: &UnboundedSender<ServiceEvent>, event: ServiceEvent) {
        if events.send(event).is_err() {
            tracing::debug!("service event dropped, the application has stopped");
        }
    }

    pub fn list(&self, target: Target, ticket: FetchTicket) {
        let events = self.events.clone();
        tokio::spawn(async move {
            tracing::debug!(
                collection = target.path,
                page = ticket.query.page,
                limit = %ticket.query.limit,
                search = %ticket.query.search,
                sort = %format!("{} {}", ticket.query.sort_field, ticket.query.sort_order),
                generation = ticket.generation,
                "listing"
            );
            let result = target.collection.list(&ticket.query).await;
            if let Err(error) = &result {
                tracing::warn!(collection = target.path, %error, "listing failed");
            }
            Self::send(
                &events,
                ServiceEvent::Listed {
                    page: target.page,
                    generation: ticket.generation,
                    result,
                },
            );
        });
    }

    /// Create a record, or update the one with `id` when editing
    pub fn save(
        &self,
        target: Target,
        mode: Mode,
        id: Option<String>,
        record: Record,
    ) {
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = match (mode, id) {
                (Mode::New, _) => {
                    tracing::debug!(collection = target.path, "creating record");
                    target.collection.create(&record).await
                }
                (Mode::Edit, Some(id)) => {
                    tracing::debug!(collection = target.path, %id, "updating record");
                    target.collection.update(&id, &record).await
                }
                (Mode::Edit, None) => Err(ApiError::MissingId),
            };
            match &result {
                Ok(_) => tracing::info!(collection = target.path, ?mode, "record saved"),
                Err(error) => {
                    tracing::warn!(collection = target.path, ?mode, %error, "save failed");
                }
            }
            Self::send(
                &events,
                ServiceEvent::Saved {
                    page: target.page,
                    mode,
                    result,
                },
            );
        });
    }

    pub fn delete(&self, target: Target, id: String) {
        let events = self.events.clone();
        tokio::spawn(async move {
            tracing::debug!(collection = target.path, %id, "deleting record");
            let result = target.collection.delete(&id).await;
            match &result {
                Ok(()) => tracing::info!(collection = target.path, %id, "record deleted"),
                Err(error) => {
                    tracing::warn!(collection = target.path, %id, %error, "delete failed");
                }
            }
            Self::send(
                &events,
                ServiceEvent::Deleted {
                    page: target.page,
                    id,
                    result,
                },
            );
        });
    }
}
