//! Data providers answer `data_request` messages.

use async_trait::async_trait;
use serde_json::{json, Value};

/// Source of named datasets served to peers.
#[async_trait]
pub trait DataProvider: Send + Sync + 'static {
    /// Return the dataset called `data_type`, or `None` if it is unknown.
    async fn fetch(&self, data_type: &str) -> Option<Value>;
}

/// Fixed sample datasets, useful for demos and interop testing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleDataProvider;

impl SampleDataProvider {
    fn dataset(data_type: &str) -> Option<Value> {
        let data = match data_type {
            "user_data" => json!([
                {"id": 1, "name": "Kim Chulsoo", "email": "kim@example.com"},
                {"id": 2, "name": "Lee Younghee", "email": "lee@example.com"}
            ]),
            "order_data" => json!([
                {"order_id": "ORD001", "amount": 100500, "status": "completed"},
                {"order_id": "ORD002", "amount": 250750, "status": "pending"}
            ]),
            "system_status" => json!({
                "cpu": "45%",
                "memory": "62%",
                "disk": "34%",
                "uptime": "5 days"
            }),
            _ => return None,
        };
        Some(data)
    }
}

#[async_trait]
impl DataProvider for SampleDataProvider {
    async fn fetch(&self, data_type: &str) -> Option<Value> {
        Self::dataset(data_type)
    }
}
