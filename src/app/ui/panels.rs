use eframe::egui::{self, Align, Color32, Context, Id, Layout, RichText, Ui};

use super::super::controller::{ActiveItem, FetchPhase, ViewMode};
use super::super::graph::GraphView;
use super::super::WalletNetworkApp;
use super::details::draw_details;
use super::table::draw_table;

const ERROR_COLOR: Color32 = Color32::from_rgb(239, 68, 68);

impl WalletNetworkApp {
    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Wallet Network");
                    ui.separator();
                    self.draw_status(ui);
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                let graph = self.controller.renderable().map(|snapshot| &snapshot.graph);
                let selection = draw_details(ui, graph, self.controller.active());
                if selection.is_some() {
                    self.controller.set_active(selection);
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| self.draw_central(ui));
    }

    fn draw_status(&self, ui: &mut Ui) {
        match self.controller.phase() {
            FetchPhase::Idle => {
                ui.label("Enter a wallet address to begin.");
            }
            FetchPhase::Loading => {
                ui.spinner();
                if let Some(address) = self.controller.submitted_address() {
                    ui.label(format!("Loading {address}..."));
                }
            }
            FetchPhase::Success | FetchPhase::Error(_) => {}
        }

        let Some(snapshot) = self.controller.snapshot() else {
            return;
        };
        if self.controller.is_loading() {
            return;
        }

        ui.label(RichText::new(snapshot.address.as_str()).monospace());
        ui.label(format!("filter: {}", snapshot.mode.label()));
        ui.label(format!(
            "nodes: {}  edges: {}",
            snapshot.graph.nodes.len(),
            snapshot.graph.edges.len()
        ));
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            ui.label(snapshot.pagination.summary());
        });
    }

    fn draw_central(&mut self, ui: &mut Ui) {
        if let Some(message) = self.controller.error_message() {
            egui::Frame::new()
                .fill(ERROR_COLOR.gamma_multiply(0.15))
                .stroke(egui::Stroke::new(1.0, ERROR_COLOR))
                .corner_radius(4.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.colored_label(ERROR_COLOR, message);
                });
            ui.add_space(6.0);
        }

        if self.controller.is_loading() {
            ui.vertical_centered(|ui| {
                ui.add_space(120.0);
                ui.heading("Loading wallet network...");
                ui.add_space(8.0);
                ui.spinner();
            });
            return;
        }

        let Self {
            controller,
            graph_view,
            table,
            find_query,
            live_physics,
            ..
        } = self;

        let Some(snapshot) = controller.renderable() else {
            if controller.phase() == &FetchPhase::Idle {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.label("Search for a wallet address to see who it transacts with.");
                });
            }
            return;
        };

        let selection: Option<Option<ActiveItem>> = match controller.view_mode() {
            ViewMode::BubbleChart => {
                let view = graph_view
                    .get_or_insert_with(|| GraphView::new(Id::new("wallet_graph"), *live_physics));
                view.draw(ui, snapshot, controller.active(), find_query).selection
            }
            ViewMode::Grid => {
                draw_table(ui, table, &snapshot.rows, find_query);
                None
            }
        };

        if let Some(active) = selection {
            controller.set_active(active);
        }
    }
}
