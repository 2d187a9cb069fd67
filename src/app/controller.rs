use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::transfers::{
    DerivedGraph, FetchError, FilterMode, Pagination, TransferPage, TransferRow, TransferSource,
    derive_graph,
};

pub(crate) const FETCH_FAILED_MESSAGE: &str = "Failed to fetch wallet data";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    BubbleChart,
    Grid,
}

impl ViewMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::BubbleChart => "Bubble Chart",
            Self::Grid => "Grid",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FetchPhase {
    Idle,
    Loading,
    Success,
    Error(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ActiveItem {
    Node(String),
    Edge(usize),
}

pub(crate) struct TransferSnapshot {
    pub(crate) revision: u64,
    pub(crate) address: String,
    pub(crate) mode: FilterMode,
    pub(crate) rows: Vec<TransferRow>,
    pub(crate) pagination: Pagination,
    pub(crate) graph: DerivedGraph,
}

struct FetchOutcome {
    request_id: u64,
    result: Result<TransferPage, FetchError>,
}

struct PendingFetch {
    request_id: u64,
    address: String,
    mode: FilterMode,
    rx: Receiver<FetchOutcome>,
}

pub(crate) type Waker = Arc<dyn Fn() + Send + Sync>;

pub(crate) struct ViewController {
    source: Arc<dyn TransferSource>,
    waker: Option<Waker>,
    pub(crate) address_input: String,
    submitted_address: Option<String>,
    filter_mode: FilterMode,
    view_mode: ViewMode,
    phase: FetchPhase,
    snapshot: Option<TransferSnapshot>,
    active: Option<ActiveItem>,
    pending: Option<PendingFetch>,
    next_request_id: u64,
    next_revision: u64,
}

impl ViewController {
    pub(crate) fn new(source: Arc<dyn TransferSource>) -> Self {
        Self {
            source,
            waker: None,
            address_input: String::new(),
            submitted_address: None,
            filter_mode: FilterMode::default(),
            view_mode: ViewMode::default(),
            phase: FetchPhase::Idle,
            snapshot: None,
            active: None,
            pending: None,
            next_request_id: 0,
            next_revision: 0,
        }
    }

    pub(crate) fn with_waker(mut self, waker: Waker) -> Self {
        self.waker = Some(waker);
        self
    }

    pub(crate) fn phase(&self) -> &FetchPhase {
        &self.phase
    }

    pub(crate) fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }

    pub(crate) fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub(crate) fn submitted_address(&self) -> Option<&str> {
        self.submitted_address.as_deref()
    }

    pub(crate) fn snapshot(&self) -> Option<&TransferSnapshot> {
        self.snapshot.as_ref()
    }

    pub(crate) fn renderable(&self) -> Option<&TransferSnapshot> {
        if self.is_loading() {
            None
        } else {
            self.snapshot.as_ref()
        }
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    pub(crate) fn error_message(&self) -> Option<&str> {
        match &self.phase {
            FetchPhase::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub(crate) fn active(&self) -> Option<&ActiveItem> {
        self.active.as_ref()
    }

    pub(crate) fn set_active(&mut self, active: Option<ActiveItem>) {
        self.active = active;
    }

    pub(crate) fn submit_search(&mut self) -> bool {
        let address = self.address_input.trim();
        if address.is_empty() {
            return false;
        }

        let address = address.to_owned();
        self.submitted_address = Some(address.clone());
        self.start_fetch(address, self.filter_mode);
        true
    }

    pub(crate) fn set_filter_mode(&mut self, mode: FilterMode) -> bool {
        if self.filter_mode == mode {
            return false;
        }

        self.filter_mode = mode;
        match self.submitted_address.clone() {
            Some(address) => {
                self.start_fetch(address, mode);
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_view_mode(&mut self, mode: ViewMode) {
        if self.view_mode != mode {
            debug!(from = ?self.view_mode, to = ?mode, "switching view mode");
            self.view_mode = mode;
        }
    }

    fn start_fetch(&mut self, address: String, mode: FilterMode) {
        self.next_request_id = self.next_request_id.wrapping_add(1);
        let request_id = self.next_request_id;

        if let Some(previous) = self.pending.take() {
            debug!(
                superseded = previous.request_id,
                address = %previous.address,
                mode = ?previous.mode,
                "dropping in-flight transfer request"
            );
        }

        info!(request_id, %address, mode = mode.query_value(), "fetching transfer network");
        let (tx, rx) = mpsc::channel();
        let source = Arc::clone(&self.source);
        let waker = self.waker.clone();
        let worker_address = address.clone();

        thread::spawn(move || {
            let result = source.fetch(&worker_address, mode);
            if tx.send(FetchOutcome { request_id, result }).is_ok()
                && let Some(waker) = waker
            {
                waker();
            }
        });

        self.pending = Some(PendingFetch {
            request_id,
            address,
            mode,
            rx,
        });
        self.phase = FetchPhase::Loading;
    }

    pub(crate) fn poll(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };

        match pending.rx.try_recv() {
            Ok(outcome) => {
                self.apply(pending, outcome);
                true
            }
            Err(TryRecvError::Empty) => {
                self.pending = Some(pending);
                false
            }
            Err(TryRecvError::Disconnected) => {
                warn!(request_id = pending.request_id, "transfer worker exited without a result");
                self.phase = FetchPhase::Error(FETCH_FAILED_MESSAGE.to_owned());
                true
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn wait_for_fetch(&mut self, timeout: std::time::Duration) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };

        match pending.rx.recv_timeout(timeout) {
            Ok(outcome) => {
                self.apply(pending, outcome);
                true
            }
            Err(_) => {
                self.pending = Some(pending);
                false
            }
        }
    }

    fn apply(&mut self, pending: PendingFetch, outcome: FetchOutcome) {
        if outcome.request_id != pending.request_id {
            debug!(
                request_id = outcome.request_id,
                current = pending.request_id,
                "ignoring stale transfer response"
            );
            self.pending = Some(pending);
            return;
        }

        match outcome.result {
            Ok(page) => {
                let graph = derive_graph(&page.rows, Utc::now());
                if graph.is_empty() {
                    info!(address = %pending.address, "no transfers returned for address");
                }
                self.next_revision += 1;
                info!(
                    request_id = pending.request_id,
                    rows = page.rows.len(),
                    nodes = graph.nodes.len(),
                    edges = graph.edges.len(),
                    "transfer network loaded"
                );
                self.snapshot = Some(TransferSnapshot {
                    revision: self.next_revision,
                    address: pending.address,
                    mode: pending.mode,
                    rows: page.rows,
                    pagination: page.pagination,
                    graph,
                });
                self.active = None;
                self.phase = FetchPhase::Success;
            }
            Err(error) => {
                warn!(
                    request_id = pending.request_id,
                    address = %pending.address,
                    error = %error,
                    "transfer fetch failed"
                );
                self.phase = FetchPhase::Error(FETCH_FAILED_MESSAGE.to_owned());
            }
        }
    }
}
