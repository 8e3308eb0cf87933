pub mod client;
pub mod envelope;
pub mod error;
pub mod memory;
pub mod query;
pub mod record;

pub use client::{ApiClient, Collection, RestCollection};
pub use envelope::Page;
pub use error::ApiError;
pub use memory::MemoryCollection;
pub use query::{
    DEFAULT_LIMITS, ListQuery, PageLimit, QueryError, QueryState, SortOrder,
    SortState, total_pages,
};
pub use record::{Record, TableRecord};
