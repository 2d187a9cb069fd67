use eframe::egui::{self, Color32, Context, Id, Order, Pos2, RichText, vec2};

use crate::util::{format_count, format_local_time};

const FADE_IN_SECS: f32 = 0.2;
const FADE_OUT_SECS: f32 = 0.5;
const MAX_OPACITY: f32 = 0.9;
const TITLE_COLOR: Color32 = Color32::from_rgb(34, 211, 238);

#[derive(Clone, Debug, PartialEq)]
pub(super) enum TooltipContent {
    Node {
        address: String,
        transaction_count: u64,
    },
    Edge {
        kind: &'static str,
        from: String,
        to: String,
        amount: Option<f64>,
        timestamp: String,
    },
}

impl TooltipContent {
    pub(super) fn title(&self) -> String {
        match self {
            Self::Node { address, .. } => address.clone(),
            Self::Edge { kind, .. } => kind.to_ascii_uppercase(),
        }
    }

    pub(super) fn rows(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Node {
                transaction_count, ..
            } => vec![("Transactions:", format_count(*transaction_count))],
            Self::Edge {
                from,
                to,
                amount,
                timestamp,
                ..
            } => {
                let mut rows = vec![("From:", from.clone()), ("To:", to.clone())];
                if let Some(amount) = amount.filter(|amount| *amount != 0.0) {
                    rows.push(("Amount:", format!("{amount} ETH")));
                }
                rows.push(("Time:", format_local_time(timestamp)));
                rows
            }
        }
    }
}

pub(super) struct Tooltip {
    id: Id,
    content: Option<TooltipContent>,
    anchor: Pos2,
    visible: bool,
}

impl Tooltip {
    pub(super) fn new(id: Id) -> Self {
        Self {
            id,
            content: None,
            anchor: Pos2::ZERO,
            visible: false,
        }
    }

    pub(super) fn show(&mut self, content: TooltipContent, pointer: Pos2) {
        self.content = Some(content);
        self.anchor = pointer + vec2(10.0, -28.0);
        self.visible = true;
    }

    pub(super) fn hide(&mut self) {
        self.visible = false;
    }

    #[cfg(test)]
    pub(super) fn is_visible(&self) -> bool {
        self.visible
    }

    #[cfg(test)]
    pub(super) fn content(&self) -> Option<&TooltipContent> {
        self.content.as_ref()
    }

    pub(super) fn draw(&self, ctx: &Context) {
        let fade_secs = if self.visible {
            FADE_IN_SECS
        } else {
            FADE_OUT_SECS
        };
        let opacity = ctx.animate_bool_with_time(self.id, self.visible, fade_secs);
        if opacity <= 0.0 {
            return;
        }
        let Some(content) = &self.content else {
            return;
        };

        egui::Area::new(self.id.with("area"))
            .order(Order::Tooltip)
            .fixed_pos(self.anchor)
            .interactable(false)
            .show(ctx, |ui| {
                ui.multiply_opacity(opacity * MAX_OPACITY);
                egui::Frame::popup(ui.style())
                    .fill(Color32::from_rgba_unmultiplied(0, 0, 0, 204))
                    .show(ui, |ui| {
                        ui.set_max_width(300.0);
                        ui.label(RichText::new(content.title()).color(TITLE_COLOR).strong());
                        egui::Grid::new(self.id.with("rows"))
                            .num_columns(2)
                            .spacing([12.0, 2.0])
                            .show(ui, |ui| {
                                for (label, value) in content.rows() {
                                    ui.label(RichText::new(label).color(Color32::GRAY));
                                    ui.label(RichText::new(value).color(Color32::LIGHT_GRAY));
                                    ui.end_row();
                                }
                            });
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    #[test]
    fn node_rows() {
        let content = TooltipContent::Node {
            address: "0xabc".to_owned(),
            transaction_count: 1500,
        };
        assert_eq!(content.title(), "0xabc");
        assert_eq!(content.rows(), vec![("Transactions:", "1,500".to_owned())]);
    }

    #[test]
    fn edge_rows_skip_missing_amount() {
        let content = TooltipContent::Edge {
            kind: "transfer",
            from: "0x1".to_owned(),
            to: "0x2".to_owned(),
            amount: None,
            timestamp: "not a time".to_owned(),
        };
        assert_eq!(content.title(), "TRANSFER");
        let labels = content.rows().into_iter().map(|(label, _)| label).collect::<Vec<_>>();
        assert_eq!(labels, ["From:", "To:", "Time:"]);
        assert_eq!(content.rows()[2].1, "not a time");
    }

    #[test]
    fn edge_rows_include_amount() {
        let content = TooltipContent::Edge {
            kind: "contract_call",
            from: "0x1".to_owned(),
            to: "0x2".to_owned(),
            amount: Some(5.2),
            timestamp: "2024-03-20T10:30:00Z".to_owned(),
        };
        assert_eq!(content.title(), "CONTRACT_CALL");
        assert!(content.rows().contains(&("Amount:", "5.2 ETH".to_owned())));
    }

    #[test]
    fn show_and_hide_reuse_one_overlay() {
        let mut tooltip = Tooltip::new(Id::new("tooltip-test"));
        assert!(!tooltip.is_visible());

        tooltip.show(
            TooltipContent::Node {
                address: "a".to_owned(),
                transaction_count: 1,
            },
            pos2(100.0, 100.0),
        );
        tooltip.show(
            TooltipContent::Node {
                address: "b".to_owned(),
                transaction_count: 2,
            },
            pos2(50.0, 60.0),
        );
        assert!(tooltip.is_visible());
        assert_eq!(tooltip.anchor, pos2(60.0, 32.0));
        assert_eq!(tooltip.content().map(TooltipContent::title), Some("b".to_owned()));

        tooltip.hide();
        assert!(!tooltip.is_visible());
        assert!(tooltip.content().is_some());
    }
}
