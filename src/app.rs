use std::{
    sync::{
        Arc,
        mpsc::{self, Receiver, Sender},
    },
    time::Duration,
};

use color_eyre::Result;
use deskboard_api::{
    ApiClient, ApiError, Collection, MemoryCollection, TableRecord,
};
use deskboard_ui::{
    Hotkey, LISTING_HOTKEYS, ModalAction, ModalManager, Mode, RowAction,
    SearchBox, StatusLine,
};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    app_state::Focus,
    config::ResolvedConfig,
    listing_page::{FetchOutcome, ListingPage, RowRequest},
    resources::{Resource, catalogue, demo_records},
    services::{RecordService, ServiceEvent},
};

pub const APP_NAME: &str = r"
┌┬┐┌─┐┌─┐┬┌─┌┐ ┌─┐┌─┐┬─┐┌┬┐
 ││├┤ └─┐├┴┐├┴┐│ │├─┤├┬┘ ││
─┴┘└─┘└─┘┴ ┴└─┘└─┘┴ ┴┴└──┴┘
";

pub const TOPBAR_HEIGHT: u16 = 6;
pub const SIDEBAR_WIDTH: u16 = 22;

/// Simulated round trip of the in-memory collections behind `--demo`
const DEMO_LATENCY: Duration = Duration::from_millis(250);

/// The main application which holds the state and logic of the application.
pub struct App {
    /// Is the application running?
    pub(crate) running: bool,
    pub(crate) pages: Vec<ListingPage>,
    /// Index of the page on screen
    pub(crate) active: usize,
    pub(crate) focus: Focus,
    pub(crate) hotkeys: &'static [Hotkey<'static>],
    pub(crate) search_box: SearchBox,
    pub(crate) modal_manager: ModalManager,
    pub(crate) status_line: StatusLine,
    pub(crate) skeleton_rows: usize,
    service: RecordService,
    service_events: UnboundedReceiver<ServiceEvent>,
    /// Row actions picked in the grid land here before they open a modal
    pub(crate) row_requests: Sender<RowRequest>,
    row_request_rx: Receiver<RowRequest>,
}

/// One collection handle per resource: seeded in-memory ones for `--demo`,
/// REST endpoints otherwise
fn collections(
    config: &ResolvedConfig,
    resources: &[Resource],
) -> Result<Vec<Arc<dyn Collection>>> {
    if config.demo {
        return Ok(resources
            .iter()
            .map(|resource| {
                Arc::new(
                    MemoryCollection::new(demo_records(resource))
                        .with_latency(DEMO_LATENCY),
                ) as Arc<dyn Collection>
            })
            .collect());
    }

    let client = ApiClient::new(&config.base_url, config.token.clone())?;
    let collections = resources
        .iter()
        .map(|resource| {
            let collection = client.collection(resource.path)?;
            let collection = match resource.create_path {
                Some(path) => collection.with_create_path(path)?,
                None => collection,
            };
            Ok(Arc::new(collection) as Arc<dyn Collection>)
        })
        .collect::<Result<Vec<_>, ApiError>>()?;
    Ok(collections)
}

impl App {
    pub fn new(config: &ResolvedConfig) -> Result<Self> {
        let resources = catalogue()?;
        let collections = collections(config, &resources)?;
        tracing::info!(
            base_url = %config.base_url,
            demo = config.demo,
            resources = resources.len(),
            "starting"
        );
        Ok(Self::with_collections(config, resources, collections))
    }

    pub fn with_collections(
        config: &ResolvedConfig,
        resources: Vec<Resource>,
        collections: Vec<Arc<dyn Collection>>,
    ) -> Self {
        let pages = resources
            .into_iter()
            .zip(collections)
            .map(|(resource, collection)| {
                ListingPage::new(
                    resource,
                    collection,
                    config.default_limit,
                    config.page_limits.clone(),
                )
            })
            .collect();
        let (service, service_events) = RecordService::channel();
        let (row_requests, row_request_rx) = mpsc::channel();

        Self {
            running: false,
            pages,
            active: 0,
            focus: Focus::Grid,
            hotkeys: &LISTING_HOTKEYS,
            search_box: SearchBox::new(),
            modal_manager: ModalManager::new(),
            status_line: StatusLine::new(),
            skeleton_rows: config.skeleton_rows,
            service,
            service_events,
            row_requests,
            row_request_rx,
        }
    }

    /// Run the application's main loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.running = true;
        while self.running {
            self.dispatch_fetches();
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
            self.drain_service_events();
            tokio::task::yield_now().await;
        }
        tracing::info!("shutting down");
        Ok(())
    }

    /// Set running to false to quit the application.
    pub const fn quit(&mut self) {
        self.running = false;
    }

    #[must_use]
    pub fn active_page(&self) -> Option<&ListingPage> {
        self.pages.get(self.active)
    }

    /// Send the listing read for the page on screen if its query changed.
    /// Other pages catch up when they are opened.
    pub fn dispatch_fetches(&mut self) {
        if let Some(page) = self.pages.get_mut(self.active)
            && let Some(ticket) = page.take_fetch()
        {
            self.service.list(page.target(self.active), ticket);
        }
    }

    pub fn drain_service_events(&mut self) {
        while let Ok(event) = self.service_events.try_recv() {
            self.on_service_event(event);
        }
    }

    pub fn on_service_event(&mut self, event: ServiceEvent) {
        match event {
            ServiceEvent::Listed {
                page,
                generation,
                result,
            } => {
                let Some(listing) = self.pages.get_mut(page) else {
                    return;
                };
                match listing.finish_fetch(generation, result) {
                    FetchOutcome::Stale => {
                        tracing::debug!(page, generation, "discarding stale listing");
                    }
                    FetchOutcome::Loaded { total } => {
                        tracing::debug!(page, total, "listing loaded");
                    }
                    FetchOutcome::Failed(error) => {
                        self.status_line.set_error(format!(
                            "Could not load {}: {error}",
                            listing.resource.title.to_lowercase()
                        ));
                    }
                }
            }
            ServiceEvent::Saved { page, mode, result } => {
                let Some(listing) = self.pages.get_mut(page) else {
                    return;
                };
                let singular = listing.resource.singular;
                match result {
                    Ok(_) => {
                        listing.request_fetch();
                        let verb = match mode {
                            Mode::New => "created",
                            Mode::Edit => "updated",
                        };
                        self.status_line.set_info(format!("{singular} {verb}"));
                    }
                    Err(error) => {
                        self.status_line.set_error(format!(
                            "Could not save {}: {error}",
                            singular.to_lowercase()
                        ));
                    }
                }
            }
            ServiceEvent::Deleted { page, id, result } => {
                let Some(listing) = self.pages.get_mut(page) else {
                    return;
                };
                let singular = listing.resource.singular;
                match result {
                    Ok(()) => {
                        listing.request_fetch();
                        self.status_line.set_info(format!("{singular} {id} deleted"));
                    }
                    Err(error) => {
                        self.status_line.set_error(format!(
                            "Could not delete {}: {error}",
                            singular.to_lowercase()
                        ));
                    }
                }
            }
        }
    }

    /// Show `index`, wrapping around the resource list
    pub fn switch_page(&mut self, index: usize) {
        let count = self.pages.len();
        if count == 0 {
            return;
        }
        self.active = index % count;
        if let Some(page) = self.pages.get(self.active) {
            self.search_box.set_value(page.query.search());
        }
        self.status_line.clear();
    }

    pub fn next_page(&mut self) {
        self.switch_page(self.active.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        let count = self.pages.len();
        if count > 0 {
            self.switch_page((self.active + count - 1) % count);
        }
    }

    /// Toggle sorting on the selected column, or the first sortable one
    pub fn sort_selected_column(&mut self) {
        let Some(page) = self.pages.get_mut(self.active) else {
            return;
        };
        let Some(index) = page.sort_target() else {
            self.status_line.set_info(format!(
                "{} has no sortable columns",
                page.resource.title
            ));
            return;
        };
        if !page.sort_by_column(index) {
            let label = page
                .resource
                .columns
                .get(index)
                .map(|column| column.label().to_string())
                .unwrap_or_default();
            self.status_line
                .set_info(format!("Column {label} is not sortable"));
        }
    }

    /// Fire `action` on the selected row through the page's row callbacks
    pub fn activate_row(&mut self, action: RowAction) {
        let Some(page) = self.pages.get(self.active) else {
            return;
        };
        let Some(record) = page.selected_record() else {
            return;
        };
        let mut actions = page.row_actions(&self.row_requests);
        if !actions.invoke(action, record) {
            self.status_line.set_info(format!(
                "{} is not available for {}",
                action.label(),
                page.resource.title.to_lowercase()
            ));
        }
        drop(actions);
        self.process_row_requests();
    }

    fn process_row_requests(&mut self) {
        while let Ok(request) = self.row_request_rx.try_recv() {
            self.on_row_request(request);
        }
    }

    fn on_row_request(&mut self, request: RowRequest) {
        let Some(page) = self.pages.get(self.active) else {
            return;
        };
        let resource = &page.resource;

        match request {
            RowRequest::View(record) => {
                self.modal_manager
                    .open_view(format!("{} details", resource.singular), &record);
            }
            RowRequest::Edit(record) => match record.row_id() {
                Some(id) => self.modal_manager.open_edit(
                    resource.singular,
                    resource.fields,
                    id.into_owned(),
                    &record,
                ),
                None => self.status_line.set_error(ApiError::MissingId.to_string()),
            },
            RowRequest::Delete(record) => match record.row_id() {
                Some(id) => {
                    let name = record
                        .field(resource.display_field)
                        .filter(|name| !name.trim().is_empty())
                        .map_or_else(|| id.to_string(), |name| name.into_owned());
                    self.modal_manager.open_confirmation(
                        format!(
                            "Delete {} \"{name}\"?",
                            resource.singular.to_lowercase()
                        ),
                        id.into_owned(),
                    );
                }
                None => self.status_line.set_error(ApiError::MissingId.to_string()),
            },
        }
    }

    pub fn open_new_form(&mut self) {
        let Some(page) = self.pages.get(self.active) else {
            return;
        };
        let resource = &page.resource;
        if resource.can_create() {
            self.modal_manager.open_new(resource.singular, resource.fields);
        } else {
            self.status_line.set_info(format!(
                "New {} cannot be created here",
                resource.title.to_lowercase()
            ));
        }
    }

    pub fn on_modal_action(&mut self, action: ModalAction) {
        let Some(target) = self.active_page().map(|page| page.target(self.active))
        else {
            return;
        };
        match action {
            ModalAction::None | ModalAction::Cancel => {}
            ModalAction::ConfirmDelete { id } => {
                self.status_line.set_info(format!("Deleting {id}…"));
                self.service.delete(target, id);
            }
            ModalAction::Save { mode, id, record } => {
                self.status_line.set_info("Saving…");
                self.service.save(target, mode, id, record);
            }
        }
    }

    /// Ask the page on screen to load again
    pub fn reload(&mut self) {
        if let Some(page) = self.pages.get_mut(self.active) {
            page.request_fetch();
            self.status_line.clear();
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use deskboard_api::SortOrder;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path},
    };

    use super::*;

    /// Demo data without the artificial latency
    pub(crate) fn demo_app() -> App {
        let config = ResolvedConfig {
            demo: true,
            ..ResolvedConfig::default()
        };
        let resources = catalogue().unwrap();
        let collections = resources
            .iter()
            .map(|r| Arc::new(MemoryCollection::new(demo_records(r))) as Arc<dyn Collection>)
            .collect();
        App::with_collections(&config, resources, collections)
    }

    /// Dispatch the pending fetch and apply whatever comes back
    pub(crate) async fn settle(app: &mut App) {
        app.dispatch_fetches();
        while app.active_page().is_some_and(|p| p.is_loading)
            || app.active_page().is_some_and(ListingPage::needs_fetch)
        {
            if let Some(event) = app.service_events.recv().await {
                app.on_service_event(event);
            }
            app.dispatch_fetches();
        }
    }

    fn position(app: &App, title: &str) -> usize {
        app.pages
            .iter()
            .position(|p| p.resource.title == title)
            .unwrap()
    }

    pub(crate) fn press(app: &mut App, code: KeyCode) {
        app.on_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[tokio::test]
    async fn test_first_page_loads() {
        let mut app = demo_app();
        settle(&mut app).await;
        let page = app.active_page().unwrap();
        assert_eq!(page.resource.title, "Users");
        assert_eq!(page.records.len(), 5);
        assert_eq!(page.query.total(), 23);
    }

    #[tokio::test]
    async fn test_delete_flow() {
        let mut app = demo_app();
        settle(&mut app).await;

        press(&mut app, KeyCode::Char('d'));
        assert!(app.modal_manager.is_open());
        press(&mut app, KeyCode::Char('y'));
        assert!(!app.modal_manager.is_open());

        if let Some(event) = app.service_events.recv().await {
            app.on_service_event(event);
        }
        assert!(app.status_line.message().ends_with("deleted"));
        settle(&mut app).await;
        assert_eq!(app.active_page().unwrap().query.total(), 22);
    }

    #[tokio::test]
    async fn test_new_record_flow() {
        let mut app = demo_app();
        settle(&mut app).await;

        press(&mut app, KeyCode::Char('n'));
        for ch in "Linus".chars() {
            press(&mut app, KeyCode::Char(ch));
        }
        press(&mut app, KeyCode::Tab);
        for ch in "linus@example.com".chars() {
            press(&mut app, KeyCode::Char(ch));
        }
        press(&mut app, KeyCode::Tab);
        for ch in "penguin".chars() {
            press(&mut app, KeyCode::Char(ch));
        }
        press(&mut app, KeyCode::Enter);
        assert!(!app.modal_manager.is_open());

        if let Some(event) = app.service_events.recv().await {
            app.on_service_event(event);
        }
        assert_eq!(app.status_line.message(), "User created");
        settle(&mut app).await;
        assert_eq!(app.active_page().unwrap().query.total(), 24);
    }

    #[tokio::test]
    async fn test_user_sign_up_posts_password_to_signup_route() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/users/signup"))
            .and(body_json(json!({
                "name": "Linus",
                "email": "linus@example.com",
                "password": "penguin"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": { "_id": "u99", "name": "Linus" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = ResolvedConfig {
            base_url: format!("{}/api", server.uri()),
            ..ResolvedConfig::default()
        };
        let mut app = App::new(&config).unwrap();
        press(&mut app, KeyCode::Char('n'));
        for (i, text) in ["Linus", "linus@example.com", "penguin"].iter().enumerate() {
            if i > 0 {
                press(&mut app, KeyCode::Tab);
            }
            for ch in text.chars() {
                press(&mut app, KeyCode::Char(ch));
            }
        }
        press(&mut app, KeyCode::Enter);

        let event = app.service_events.recv().await.unwrap();
        app.on_service_event(event);
        assert_eq!(app.status_line.message(), "User created");
    }

    #[tokio::test]
    async fn test_delete_prompt_names_record_by_display_field() {
        let mut app = demo_app();
        let pricing = position(&app, "Pricing");
        app.switch_page(pricing);
        settle(&mut app).await;

        let title = app
            .active_page()
            .and_then(ListingPage::selected_record)
            .and_then(|r| r.field("priceTitle"))
            .unwrap()
            .into_owned();
        press(&mut app, KeyCode::Char('d'));
        let message = &app.modal_manager.confirmation().unwrap().message;
        assert_eq!(message, &format!("Delete price \"{title}\"?"));
    }

    #[tokio::test]
    async fn test_search_and_sort_refetch() {
        let mut app = demo_app();
        settle(&mut app).await;

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.focus, Focus::Search);
        for ch in "ada".chars() {
            press(&mut app, KeyCode::Char(ch));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focus, Focus::Grid);
        settle(&mut app).await;
        let page = app.active_page().unwrap();
        assert_eq!(page.query.search(), "ada");
        assert!(page.query.total() < 23);

        press(&mut app, KeyCode::Char('s'));
        settle(&mut app).await;
        let sort = app.active_page().unwrap().query.sort().clone();
        assert_eq!(sort.field, "name");
        assert_eq!(sort.order, SortOrder::Desc);
    }

    #[tokio::test]
    async fn test_messages_cannot_be_edited() {
        let mut app = demo_app();
        let messages = position(&app, "Messages");
        app.switch_page(messages);
        settle(&mut app).await;
        assert_eq!(app.active_page().unwrap().resource.title, "Messages");

        press(&mut app, KeyCode::Char('e'));
        assert!(!app.modal_manager.is_open());
        assert!(app.status_line.message().contains("not available"));

        press(&mut app, KeyCode::Char('n'));
        assert!(!app.modal_manager.is_open());
    }

    #[test]
    fn test_switching_pages_wraps() {
        let mut app = demo_app();
        app.previous_page();
        assert_eq!(app.active, app.pages.len() - 1);
        assert_eq!(app.pages.last().unwrap().resource.title, "Orders");
        app.next_page();
        assert_eq!(app.active, 0);
    }
}
