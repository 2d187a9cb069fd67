use std::sync::Arc;

use eframe::egui::Context;
use tracing::debug;

use crate::config::Config;
use crate::transfers::TransferSource;

mod controller;
mod graph;
mod physics;
mod render_utils;
mod tooltip;
mod ui;

pub use controller::ViewMode;

use controller::ViewController;
use graph::GraphView;
use ui::TableState;

pub struct WalletNetworkApp {
    controller: ViewController,
    graph_view: Option<GraphView>,
    table: TableState,
    table_revision: Option<u64>,
    find_query: String,
    live_physics: bool,
}

impl WalletNetworkApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        source: Arc<dyn TransferSource>,
        config: &Config,
    ) -> Self {
        let ctx = cc.egui_ctx.clone();
        let mut controller =
            ViewController::new(source).with_waker(Arc::new(move || ctx.request_repaint()));
        controller.set_filter_mode(config.filter_mode);
        controller.set_view_mode(config.view_mode);

        if let Some(address) = &config.initial_address {
            controller.address_input = address.clone();
            controller.submit_search();
        }

        Self {
            controller,
            graph_view: None,
            table: TableState::default(),
            table_revision: None,
            find_query: String::new(),
            live_physics: config.live_physics,
        }
    }

    fn sync_views(&mut self) {
        let revision = self.controller.snapshot().map(|snapshot| snapshot.revision);
        if revision != self.table_revision {
            self.table.rewind();
            self.table_revision = revision;
        }

        if self.controller.view_mode() == ViewMode::Grid && self.graph_view.take().is_some() {
            debug!("bubble chart hidden; layout engine released");
        }
    }
}

impl eframe::App for WalletNetworkApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.controller.poll();
        self.sync_views();
        self.show(ctx);
    }
}
