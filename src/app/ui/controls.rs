use eframe::egui::{self, Key, Ui};

use crate::transfers::FilterMode;

use super::super::{ViewMode, WalletNetworkApp};

impl WalletNetworkApp {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Wallet Search");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Wallet address");
        let mut submit = false;
        ui.horizontal(|ui| {
            let input = ui.add(
                egui::TextEdit::singleline(&mut self.controller.address_input)
                    .hint_text("0x...")
                    .desired_width(ui.available_width() - 70.0),
            );
            if input.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter)) {
                submit = true;
            }
            if ui.button("Search").clicked() {
                submit = true;
            }
        });
        if submit {
            self.controller.submit_search();
        }

        ui.add_space(6.0);
        ui.label("Direction");
        let mut filter_mode = self.controller.filter_mode();
        ui.horizontal_wrapped(|ui| {
            for mode in FilterMode::ALL_MODES {
                ui.selectable_value(&mut filter_mode, mode, mode.label())
                    .on_hover_text(filter_hint(mode));
            }
        });
        if filter_mode != self.controller.filter_mode() {
            self.controller.set_filter_mode(filter_mode);
        }

        ui.separator();
        ui.label("View");
        let mut view_mode = self.controller.view_mode();
        ui.horizontal(|ui| {
            for mode in [ViewMode::BubbleChart, ViewMode::Grid] {
                ui.radio_value(&mut view_mode, mode, mode.label());
            }
        });
        self.controller.set_view_mode(view_mode);

        ui.separator();
        ui.label("Find address")
            .on_hover_text("Highlights matching addresses in the chart and filters the grid.");
        let find = ui.add(
            egui::TextEdit::singleline(&mut self.find_query)
                .hint_text("part of an address")
                .desired_width(f32::INFINITY),
        );
        if find.changed() {
            self.table.rewind();
        }

        if view_mode != ViewMode::BubbleChart {
            return;
        }

        ui.separator();
        ui.label("Layout");
        if ui
            .checkbox(&mut self.live_physics, "Live physics")
            .on_hover_text("Animate the force layout. Off lays the graph out once.")
            .changed()
            && let Some(view) = self.graph_view.as_mut()
        {
            view.set_live_physics(self.live_physics);
        }

        if ui.button("Reset view").clicked()
            && let Some(view) = self.graph_view.as_mut()
        {
            view.reset_camera();
        }

        if let Some(view) = &self.graph_view {
            ui.add_space(4.0);
            ui.small(format!("{} nodes, {} edges", view.node_count(), view.edge_count()));
            if let Some(ticks) = view.simulation_ticks() {
                ui.small(format!("layout ticks: {ticks}"));
            }
        }
    }
}

fn filter_hint(mode: FilterMode) -> &'static str {
    match mode {
        FilterMode::All => "Transfers in either direction.",
        FilterMode::Incoming => "Only transfers received by the address.",
        FilterMode::Outgoing => "Only transfers sent by the address.",
    }
}
