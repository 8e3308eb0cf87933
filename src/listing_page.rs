use std::sync::{Arc, mpsc::Sender};

use deskboard_api::{
    ApiError, Collection, ListQuery, Page, PageLimit, QueryState, Record,
};
use deskboard_ui::{GridViewState, Pager, RowActions, SortToggle};

use crate::resources::Resource;

/// A listing read waiting to be sent. Only the outcome of the newest ticket
/// is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: ListQuery,
}

#[derive(Debug)]
pub enum FetchOutcome {
    /// A newer fetch was issued after this one
    Stale,
    Loaded { total: usize },
    Failed(ApiError),
}

/// A row action picked in the grid, handed to the application to act on
#[derive(Debug, Clone, PartialEq)]
pub enum RowRequest {
    View(Record),
    Edit(Record),
    Delete(Record),
}

/// Where service calls for a page go
#[derive(Clone)]
pub struct Target {
    pub page: usize,
    pub path: &'static str,
    pub collection: Arc<dyn Collection>,
}

/// One resource's listing: query, current rows and fetch bookkeeping
pub struct ListingPage {
    pub resource: Resource,
    collection: Arc<dyn Collection>,
    limits: Vec<PageLimit>,
    pub query: QueryState,
    pub records: Vec<Record>,
    pub is_loading: bool,
    pub grid: GridViewState,
    generation: u64,
    needs_fetch: bool,
}

impl ListingPage {
    pub fn new(
        resource: Resource,
        collection: Arc<dyn Collection>,
        default_limit: PageLimit,
        limits: Vec<PageLimit>,
    ) -> Self {
        Self {
            resource,
            collection,
            limits,
            query: QueryState::new(default_limit),
            records: Vec::new(),
            is_loading: false,
            grid: GridViewState::new(),
            generation: 0,
            needs_fetch: true,
        }
    }

    #[must_use]
    pub fn target(&self, page: usize) -> Target {
        Target {
            page,
            path: self.resource.path,
            collection: Arc::clone(&self.collection),
        }
    }

    #[must_use]
    pub fn limits(&self) -> &[PageLimit] {
        &self.limits
    }

    #[must_use]
    pub const fn needs_fetch(&self) -> bool {
        self.needs_fetch
    }

    pub const fn request_fetch(&mut self) {
        self.needs_fetch = true;
    }

    /// Issue a fetch if one is due
    pub fn take_fetch(&mut self) -> Option<FetchTicket> {
        self.needs_fetch().then(|| self.begin_fetch())
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.needs_fetch = false;
        self.is_loading = true;
        FetchTicket {
            generation: self.generation,
            query: self.query.list_query(),
        }
    }

    /// Apply the outcome of the fetch issued as `generation`. Rows are
    /// replaced wholesale; on failure the previous rows stay.
    pub fn finish_fetch(
        &mut self,
        generation: u64,
        result: Result<Page, ApiError>,
    ) -> FetchOutcome {
        if generation != self.generation {
            return FetchOutcome::Stale;
        }
        self.is_loading = false;

        match result {
            Ok(page) => {
                self.records = page.records;
                // A shrunken total can leave the cursor past the last page
                if self.query.set_total(page.total) {
                    self.needs_fetch = true;
                }
                self.grid
                    .clamp(self.records.len(), self.resource.columns.len());
                FetchOutcome::Loaded { total: page.total }
            }
            Err(error) => FetchOutcome::Failed(error),
        }
    }

    /// Run `f` against the query with a pager for it, and schedule a fetch if
    /// the listing parameters changed
    pub fn update_query<T>(
        &mut self,
        f: impl FnOnce(Pager<'_>, &mut QueryState) -> T,
    ) -> T {
        let before = self.query.list_query();
        let pager = Pager::from_query(&self.query).limits(&self.limits);
        let out = f(pager, &mut self.query);
        if self.query.list_query() != before {
            self.needs_fetch = true;
            self.grid.table.select(Some(0));
        }
        out
    }

    /// Toggle sorting on the column at `index`. Returns false when the column
    /// does not sort.
    pub fn sort_by_column(&mut self, index: usize) -> bool {
        let Some(field) = self
            .resource
            .columns
            .get(index)
            .filter(|column| column.is_sortable())
            .map(|column| column.key().to_string())
        else {
            return false;
        };

        self.update_query(|_, query| {
            let sort = query.sort().clone();
            SortToggle::new(&field, &sort).activate(query);
        });
        true
    }

    /// Column `s` sorts: the selected one, or else the first sortable one
    #[must_use]
    pub fn sort_target(&self) -> Option<usize> {
        self.grid.selected_column().or_else(|| {
            self.resource
                .columns
                .iter()
                .position(|column| column.is_sortable())
        })
    }

    #[must_use]
    pub fn selected_record(&self) -> Option<&Record> {
        self.grid.selected_record(&self.records)
    }

    /// Callbacks for the action slots this resource offers, each forwarding
    /// the record to `requests`
    #[must_use]
    pub fn row_actions<'a>(
        &self,
        requests: &'a Sender<RowRequest>,
    ) -> RowActions<'a, Record> {
        let forward = move |request: RowRequest| {
            if requests.send(request).is_err() {
                tracing::warn!("row action dropped, receiver is gone");
            }
        };

        let mut actions = RowActions::new();
        if self.resource.actions.view {
            actions = actions
                .on_view(move |record: &Record| forward(RowRequest::View(record.clone())));
        }
        if self.resource.can_edit() {
            actions = actions
                .on_edit(move |record: &Record| forward(RowRequest::Edit(record.clone())));
        }
        if self.resource.actions.delete {
            actions = actions.on_delete(move |record: &Record| {
                forward(RowRequest::Delete(record.clone()));
            });
        }
        actions
    }

    /// One-line description for the top bar
    #[must_use]
    pub fn summary(&self) -> String {
        let sort = self.query.sort();
        let mut summary = format!(
            "{} records · sorted by {} {}",
            self.query.total(),
            sort.field,
            sort.order
        );
        if !self.query.search().is_empty() {
            summary.push_str(&format!(" · matching \"{}\"", self.query.search()));
        }
        summary
    }
}
