//! Response bodies shared across handlers.
//!
//! Successful calls return the domain value itself (a definition, an
//! instance, a list) as JSON. The shapes here cover the remaining cases:
//!
//! ```json
//! { "status": "added", "id": "pizza_order" }
//! { "error": "Definition already exists" }
//! ```

use serde::{Deserialize, Serialize};

/// Body returned after a definition is registered.
#[derive(Debug, Serialize, Deserialize)]
pub struct DefinitionAdded {
    pub status: String,
    pub id: String,
}

impl DefinitionAdded {
    pub fn new(id: String) -> Self {
        Self {
            status: "added".to_string(),
            id,
        }
    }
}

/// Body returned for every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
