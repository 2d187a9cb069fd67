use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
    #[default]
    All,
    Incoming,
    Outgoing,
}

impl FilterMode {
    pub const ALL_MODES: [Self; 3] = [Self::All, Self::Incoming, Self::Outgoing];

    /// Value sent as the `viewMode` query parameter.
    pub fn query_value(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Incoming => "in",
            Self::Outgoing => "out",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Incoming => "Incoming",
            Self::Outgoing => "Outgoing",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TransferRow {
    #[serde(rename = "FromAddress")]
    pub from_address: String,
    #[serde(rename = "ToAddress")]
    pub to_address: String,
    #[serde(rename = "TransactionCount")]
    pub transaction_count: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub current_page: u64,
    #[serde(default)]
    pub total_pages: u64,
    #[serde(default)]
    pub total_results: u64,
}

impl Pagination {
    pub fn summary(&self) -> String {
        format!(
            "page {} of {}, {} results",
            self.current_page.max(1),
            self.total_pages.max(1),
            self.total_results
        )
    }
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct TransferResponse {
    #[serde(default = "default_success")]
    pub(super) success: bool,
    #[serde(default)]
    pub(super) data: Vec<TransferRow>,
    #[serde(default)]
    pub(super) pagination: Pagination,
}

fn default_success() -> bool {
    true
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransferPage {
    pub rows: Vec<TransferRow>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_payload() {
        let raw = r#"{
            "success": true,
            "data": [
                {"FromAddress": "0xaaa", "ToAddress": "0xbbb", "TransactionCount": 12},
                {"FromAddress": "0xbbb", "ToAddress": "0xccc", "TransactionCount": 0}
            ],
            "pagination": {"currentPage": 1, "totalPages": 4, "totalResults": 77}
        }"#;

        let response: TransferResponse = serde_json::from_str(raw).unwrap();
        assert!(response.success);
        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].from_address, "0xaaa");
        assert_eq!(response.data[0].transaction_count, 12);
        assert_eq!(response.pagination.total_pages, 4);
        assert_eq!(response.pagination.total_results, 77);
    }

    #[test]
    fn missing_pagination_defaults() {
        let raw = r#"{"data": []}"#;
        let response: TransferResponse = serde_json::from_str(raw).unwrap();
        assert!(response.success);
        assert_eq!(response.pagination, Pagination::default());
        assert_eq!(response.pagination.summary(), "page 1 of 1, 0 results");
    }

    #[test]
    fn negative_counts_are_rejected() {
        let raw = r#"{"data": [{"FromAddress": "a", "ToAddress": "b", "TransactionCount": -3}]}"#;
        assert!(serde_json::from_str::<TransferResponse>(raw).is_err());
    }

    #[test]
    fn filter_mode_query_values() {
        assert_eq!(FilterMode::All.query_value(), "all");
        assert_eq!(FilterMode::Incoming.query_value(), "in");
        assert_eq!(FilterMode::Outgoing.query_value(), "out");
    }
}
