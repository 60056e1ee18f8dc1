// Start of file: /src/models/item.rs

use serde::Serialize;

/// The fixed record returned by the test endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct Item {
    pub id: i32,
    pub name: String,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            id: 1,
            name: "book".to_string(),
        }
    }
}

// End of file: /src/models/item.rs
