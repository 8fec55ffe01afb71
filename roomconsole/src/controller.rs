//! Paginated collection controller: owns the query state of one list view,
//! runs fetches through a [`CollectionFetcher`], reconciles the result and
//! keeps what the view shows.
//!
//! Requests are numbered. Only the response to the most recently issued
//! request is applied; anything older is dropped on arrival, so a slow
//! response can never overwrite a view that has moved on.

use tracing::{debug, info};

use crate::error::ConsoleError;
use crate::fetch::{CollectionFetcher, FetchOutcome};
use crate::policy::{Directive, Failure, FailureSite};
use crate::query::QueryState;
use crate::reconcile::{reconcile, settle, EmptyState, Reconciliation};
use crate::types::PageMeta;

/// An issued request: the sequence number and the query it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    seq: u64,
    query: QueryState,
    corrective: bool,
}

impl RequestTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    /// Whether this is the single follow-up after a page correction.
    pub fn is_corrective(&self) -> bool {
        self.corrective
    }
}

#[derive(Debug)]
pub enum Completion {
    /// The response now backs the view.
    Applied,
    /// A newer request was issued; the response was dropped.
    Superseded,
    /// The requested page is gone; run this corrective request next.
    Refetch(RequestTicket),
    Failed(Failure),
}

/// Retry affordance shown after a server error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    pub message: String,
    pub status: Option<u16>,
}

/// Presentation model for pagination controls. Several widgets may render
/// the same model; none of them hold state of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub last_page: u32,
    /// Zero-based index of the active page control.
    pub active_index: usize,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub total: u64,
}

impl Pagination {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }
}

pub struct CollectionController<T, F> {
    fetcher: F,
    default_sort: Option<String>,
    query: QueryState,
    return_path: String,
    seq: u64,
    in_flight: Option<u64>,
    entered: bool,
    items: Vec<T>,
    meta: Option<PageMeta>,
    empty: Option<EmptyState>,
    error: Option<LoadError>,
}

impl<T, F: CollectionFetcher<T>> CollectionController<T, F> {
    pub fn new(fetcher: F, default_sort: Option<&str>) -> Self {
        Self {
            fetcher,
            default_sort: default_sort.map(str::to_string),
            query: QueryState::new(default_sort),
            return_path: "/".to_string(),
            seq: 0,
            in_flight: None,
            entered: false,
            items: Vec::new(),
            meta: None,
            empty: None,
            error: None,
        }
    }

    /// Start from a given query, e.g. one restored from the view's URL.
    pub fn with_query(mut self, query: QueryState) -> Self {
        self.query = query;
        self
    }

    /// Route of the view, used as the return target after a login redirect.
    pub fn with_return_path(mut self, path: &str) -> Self {
        self.return_path = path.to_string();
        self
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn meta(&self) -> Option<&PageMeta> {
        self.meta.as_ref()
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        self.empty
    }

    pub fn error(&self) -> Option<&LoadError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Search box, sort headers and pagination are disabled while loading.
    pub fn controls_disabled(&self) -> bool {
        self.is_loading()
    }

    pub fn pagination(&self) -> Option<Pagination> {
        let meta = self.meta.as_ref().filter(|m| m.total > 0)?;
        Some(Pagination {
            current_page: meta.current_page,
            last_page: meta.last_page,
            active_index: meta.current_page.saturating_sub(1) as usize,
            from: meta.from,
            to: meta.to,
            total: meta.total,
        })
    }

    /// Start a request for the current query. Any request still in flight
    /// is superseded by this one.
    pub fn issue(&mut self) -> RequestTicket {
        self.next_ticket(false)
    }

    fn next_ticket(&mut self, corrective: bool) -> RequestTicket {
        self.seq += 1;
        self.in_flight = Some(self.seq);
        RequestTicket {
            seq: self.seq,
            query: self.query.clone(),
            corrective,
        }
    }

    /// Apply the response to `ticket`.
    pub fn complete(&mut self, ticket: RequestTicket, outcome: FetchOutcome<T>) -> Completion {
        if ticket.seq != self.seq {
            debug!(seq = ticket.seq, latest = self.seq, "dropping superseded response");
            return Completion::Superseded;
        }
        self.in_flight = None;

        let page = match outcome {
            Ok(page) => page,
            Err(error) => return Completion::Failed(self.fail(error)),
        };

        let empty = if ticket.corrective {
            settle(&ticket.query, &page)
        } else {
            match reconcile(&ticket.query, &page) {
                Reconciliation::Refetch { page: corrected } => {
                    info!(
                        requested = ticket.query.page(),
                        corrected,
                        last_page = page.meta.last_page,
                        "page out of range, refetching"
                    );
                    self.query.set_page(corrected);
                    return Completion::Refetch(self.next_ticket(true));
                }
                Reconciliation::Empty(state) => Some(state),
                Reconciliation::Accept => None,
            }
        };

        self.items = page.data;
        self.meta = Some(page.meta);
        self.empty = empty;
        self.error = None;
        self.entered = true;
        Completion::Applied
    }

    fn fail(&mut self, error: ConsoleError) -> Failure {
        let site = if self.entered {
            FailureSite::ListRefresh
        } else {
            FailureSite::ViewEntry
        };
        let failure = Failure::new(error, site, &self.return_path);
        if failure.directive.retry {
            // Rows already shown stay; the query is untouched so a retry
            // repeats the identical request.
            self.error = Some(LoadError {
                message: failure
                    .directive
                    .toast
                    .as_ref()
                    .map(|t| t.message.clone())
                    .unwrap_or_else(|| failure.error.to_string()),
                status: failure.error.status(),
            });
        }
        failure
    }

    /// Change the free-text filter and issue a request for page 1 without
    /// waiting for it.
    pub fn issue_search(&mut self, text: &str) -> RequestTicket {
        self.query.set_filter(text);
        self.issue()
    }

    pub fn issue_sort(&mut self, column: &str) -> RequestTicket {
        self.query.set_sort(column);
        self.issue()
    }

    pub fn issue_param(&mut self, key: &str, value: Option<&str>) -> RequestTicket {
        self.query.set_param(key, value);
        self.issue()
    }

    /// Move to `page` within the last known page range and issue a request.
    pub fn issue_page(&mut self, page: u32) -> Result<RequestTicket, Failure> {
        let last = self.meta.as_ref().map_or(1, |m| m.last_page.max(1));
        if page < 1 || page > last {
            return Err(Failure {
                error: ConsoleError::PageOutOfRange {
                    requested: page,
                    last,
                },
                directive: Directive::none(),
            });
        }
        self.query.set_page(page);
        Ok(self.issue())
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch `ticket` and follow at most one page correction.
    pub async fn run(&mut self, mut ticket: RequestTicket) -> Result<(), Failure> {
        loop {
            let outcome = self.fetcher.fetch(&ticket.query).await;
            match self.complete(ticket, outcome) {
                Completion::Refetch(next) => ticket = next,
                Completion::Applied | Completion::Superseded => return Ok(()),
                Completion::Failed(failure) => return Err(failure),
            }
        }
    }

    /// Fetch the current query.
    pub async fn load(&mut self) -> Result<(), Failure> {
        let ticket = self.issue();
        self.run(ticket).await
    }

    /// Re-run the last query after a failure.
    pub async fn retry(&mut self) -> Result<(), Failure> {
        self.load().await
    }

    /// Submit the search box.
    pub async fn search(&mut self, text: &str) -> Result<(), Failure> {
        let ticket = self.issue_search(text);
        self.run(ticket).await
    }

    /// Click on a sortable column header.
    pub async fn sort_by(&mut self, column: &str) -> Result<(), Failure> {
        let ticket = self.issue_sort(column);
        self.run(ticket).await
    }

    /// Change an additional filter, e.g. a dropdown next to the search box.
    pub async fn set_param(&mut self, key: &str, value: Option<&str>) -> Result<(), Failure> {
        let ticket = self.issue_param(key, value);
        self.run(ticket).await
    }

    /// Jump to a page within the last known page range.
    pub async fn go_to_page(&mut self, page: u32) -> Result<(), Failure> {
        let ticket = self.issue_page(page)?;
        self.run(ticket).await
    }

    pub async fn next_page(&mut self) -> Result<(), Failure> {
        self.go_to_page(self.query.page().saturating_add(1)).await
    }

    pub async fn previous_page(&mut self) -> Result<(), Failure> {
        self.go_to_page(self.query.page().saturating_sub(1)).await
    }

    /// Drop the view's state and load from the defaults, as when arriving
    /// at the index after the edited entity vanished.
    pub async fn reset(&mut self) -> Result<(), Failure> {
        self.query = QueryState::new(self.default_sort.as_deref());
        self.items.clear();
        self.meta = None;
        self.empty = None;
        self.error = None;
        self.load().await
    }

    /// React to a failed action on one of the listed items.
    ///
    /// Returns the directive for the failure; the list is reloaded when the
    /// directive asks for it.
    pub async fn sub_action_failed(&mut self, error: ConsoleError) -> Failure {
        let failure = Failure::new(error, FailureSite::SubAction, &self.return_path);
        if failure.directive.reload_list {
            if let Err(reload) = self.load().await {
                debug!(error = %reload, "reload after failed action also failed");
            }
        }
        failure
    }
}
