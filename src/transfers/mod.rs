mod client;
mod derive;
mod model;

pub use client::{FetchError, HttpTransferSource, TransferSource};
pub use derive::{DerivedGraph, EdgeKind, GraphEdge, derive_graph};
pub use model::{FilterMode, Pagination, TransferPage, TransferRow};
