mod controls;
mod details;
mod panels;
mod table;

pub(in crate::app) use table::TableState;
