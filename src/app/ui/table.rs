use std::cmp::Ordering;

use eframe::egui::{self, Align, Layout, RichText, Ui};
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::transfers::TransferRow;
use crate::util::{address_matches, format_count, truncate_address};

pub(in crate::app) const PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];
const DEFAULT_PAGE_SIZE: usize = 25;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum SortColumn {
    From,
    To,
    TransactionCount,
}

impl SortColumn {
    fn header(self) -> &'static str {
        match self {
            Self::From => "From",
            Self::To => "To",
            Self::TransactionCount => "Transaction Count",
        }
    }

    fn compare(self, a: &TransferRow, b: &TransferRow) -> Ordering {
        match self {
            Self::From => a.from_address.cmp(&b.from_address),
            Self::To => a.to_address.cmp(&b.to_address),
            Self::TransactionCount => a.transaction_count.cmp(&b.transaction_count),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum SortDirection {
    Ascending,
    Descending,
}

pub(in crate::app) struct TablePage<'a> {
    pub(in crate::app) rows: Vec<&'a TransferRow>,
    /// Zero-based, already clamped to `page_count`.
    pub(in crate::app) page: usize,
    pub(in crate::app) page_count: usize,
    pub(in crate::app) total: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) struct TableState {
    page: usize,
    page_size: usize,
    sort: Option<(SortColumn, SortDirection)>,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sort: None,
        }
    }
}

impl TableState {
    pub(in crate::app) fn page_size(&self) -> usize {
        self.page_size
    }

    pub(in crate::app) fn set_page_size(&mut self, page_size: usize) {
        if PAGE_SIZES.contains(&page_size) && self.page_size != page_size {
            self.page_size = page_size;
            self.page = 0;
        }
    }

    pub(in crate::app) fn sort(&self) -> Option<(SortColumn, SortDirection)> {
        self.sort
    }

    pub(in crate::app) fn cycle_sort(&mut self, column: SortColumn) {
        self.sort = match self.sort {
            Some((current, SortDirection::Ascending)) if current == column => {
                Some((column, SortDirection::Descending))
            }
            Some((current, SortDirection::Descending)) if current == column => None,
            _ => Some((column, SortDirection::Ascending)),
        };
        self.page = 0;
    }

    pub(in crate::app) fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    pub(in crate::app) fn rewind(&mut self) {
        self.page = 0;
    }

    pub(in crate::app) fn visible_rows<'a>(&self, rows: &'a [TransferRow], filter: &str) -> TablePage<'a> {
        let filter = filter.trim();
        let matcher = SkimMatcherV2::default();
        let mut filtered = rows
            .iter()
            .filter(|row| {
                filter.is_empty()
                    || address_matches(&matcher, &row.from_address, filter)
                    || address_matches(&matcher, &row.to_address, filter)
            })
            .collect::<Vec<_>>();

        if let Some((column, direction)) = self.sort {
            filtered.sort_by(|a, b| {
                let ordering = column.compare(a, b);
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        let total = filtered.len();
        let page_count = total.div_ceil(self.page_size).max(1);
        let page = self.page.min(page_count - 1);
        let rows = filtered
            .into_iter()
            .skip(page * self.page_size)
            .take(self.page_size)
            .collect();

        TablePage {
            rows,
            page,
            page_count,
            total,
        }
    }
}

pub(in crate::app) fn draw_table(ui: &mut Ui, state: &mut TableState, rows: &[TransferRow], filter: &str) {
    let page = state.visible_rows(rows, filter);
    if page.page != state.page {
        state.set_page(page.page);
    }

    if page.total == 0 {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            if rows.is_empty() {
                ui.label("No transfers found for this address.");
            } else {
                ui.label("No rows match the current filter.");
            }
        });
        return;
    }

    let mut clicked_header = None;
    egui::ScrollArea::vertical()
        .id_salt("transfer_table_scroll")
        .auto_shrink([false, true])
        .max_height(ui.available_height() - 36.0)
        .show(ui, |ui| {
            egui::Grid::new("transfer_table")
                .num_columns(3)
                .striped(true)
                .min_col_width(120.0)
                .spacing([24.0, 6.0])
                .show(ui, |ui| {
                    for column in [SortColumn::From, SortColumn::To, SortColumn::TransactionCount] {
                        let marker = match state.sort() {
                            Some((current, SortDirection::Ascending)) if current == column => " ^",
                            Some((current, SortDirection::Descending)) if current == column => " v",
                            _ => "",
                        };
                        let header = RichText::new(format!("{}{marker}", column.header())).strong();
                        if ui
                            .add(egui::Button::new(header).frame(false))
                            .on_hover_text("Click to sort")
                            .clicked()
                        {
                            clicked_header = Some(column);
                        }
                    }
                    ui.end_row();

                    for row in &page.rows {
                        address_cell(ui, &row.from_address);
                        address_cell(ui, &row.to_address);
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            ui.monospace(format_count(row.transaction_count));
                        });
                        ui.end_row();
                    }
                });
        });

    if let Some(column) = clicked_header {
        state.cycle_sort(column);
    }

    ui.separator();
    ui.horizontal(|ui| {
        ui.label("Rows per page:");
        let mut page_size = state.page_size();
        egui::ComboBox::from_id_salt("transfer_table_page_size")
            .selected_text(page_size.to_string())
            .width(60.0)
            .show_ui(ui, |ui| {
                for size in PAGE_SIZES {
                    ui.selectable_value(&mut page_size, size, size.to_string());
                }
            });
        state.set_page_size(page_size);

        let first = page.page * state.page_size() + 1;
        let last = (first + page.rows.len()).saturating_sub(1);
        ui.label(format!("{first}-{last} of {}", format_count(page.total as u64)));

        if ui
            .add_enabled(page.page > 0, egui::Button::new("<"))
            .clicked()
        {
            state.set_page(page.page - 1);
        }
        ui.label(format!("{} / {}", page.page + 1, page.page_count));
        if ui
            .add_enabled(page.page + 1 < page.page_count, egui::Button::new(">"))
            .clicked()
        {
            state.set_page(page.page + 1);
        }
    });
}

fn address_cell(ui: &mut Ui, address: &str) {
    ui.monospace(truncate_address(address)).on_hover_text(address);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(count: u64) -> Vec<TransferRow> {
        (0..count)
            .map(|index| TransferRow {
                from_address: format!("0xfrom{index:03}"),
                to_address: format!("0xto{:03}", count - index),
                transaction_count: (index * 7) % 11,
            })
            .collect()
    }

    #[test]
    fn defaults_to_first_page_of_twenty_five() {
        let rows = rows(60);
        let page = TableState::default().visible_rows(&rows, "");
        assert_eq!(page.rows.len(), 25);
        assert_eq!(page.page, 0);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.total, 60);
        assert_eq!(page.rows[0].from_address, "0xfrom000");
    }

    #[test]
    fn last_page_is_partial_and_page_is_clamped() {
        let rows = rows(60);
        let mut state = TableState::default();
        state.set_page(2);
        assert_eq!(state.visible_rows(&rows, "").rows.len(), 10);

        state.set_page(9);
        let page = state.visible_rows(&rows, "");
        assert_eq!(page.page, 2);
        assert_eq!(page.rows.len(), 10);
    }

    #[test]
    fn page_size_is_limited_to_known_choices() {
        let mut state = TableState::default();
        state.set_page(1);
        state.set_page_size(100);
        assert_eq!(state.page_size(), 100);
        assert_eq!(state.visible_rows(&rows(60), "").page, 0);

        state.set_page_size(7);
        assert_eq!(state.page_size(), 100);
    }

    #[test]
    fn header_clicks_cycle_sort_order() {
        let rows = rows(12);
        let mut state = TableState::default();

        state.cycle_sort(SortColumn::TransactionCount);
        let ascending = state
            .visible_rows(&rows, "")
            .rows
            .iter()
            .map(|row| row.transaction_count)
            .collect::<Vec<_>>();
        assert!(ascending.windows(2).all(|pair| pair[0] <= pair[1]));

        state.cycle_sort(SortColumn::TransactionCount);
        let descending = state
            .visible_rows(&rows, "")
            .rows
            .iter()
            .map(|row| row.transaction_count)
            .collect::<Vec<_>>();
        assert!(descending.windows(2).all(|pair| pair[0] >= pair[1]));

        state.cycle_sort(SortColumn::TransactionCount);
        assert_eq!(state.sort(), None);
        assert_eq!(state.visible_rows(&rows, "").rows[0].from_address, "0xfrom000");

        state.cycle_sort(SortColumn::To);
        assert_eq!(state.sort(), Some((SortColumn::To, SortDirection::Ascending)));
        assert_eq!(state.visible_rows(&rows, "").rows[0].to_address, "0xto001");
    }

    #[test]
    fn quick_filter_matches_either_address() {
        let rows = vec![
            TransferRow {
                from_address: "0xaaa".to_owned(),
                to_address: "0xbbb".to_owned(),
                transaction_count: 1,
            },
            TransferRow {
                from_address: "0xccc".to_owned(),
                to_address: "0xaaa".to_owned(),
                transaction_count: 2,
            },
            TransferRow {
                from_address: "0xccc".to_owned(),
                to_address: "0xddd".to_owned(),
                transaction_count: 3,
            },
        ];
        let page = TableState::default().visible_rows(&rows, "aaa");
        assert_eq!(page.total, 2);
        assert_eq!(page.page_count, 1);

        let empty = TableState::default().visible_rows(&rows, "zzz");
        assert_eq!(empty.total, 0);
        assert_eq!(empty.page_count, 1);
        assert!(empty.rows.is_empty());
    }
}
