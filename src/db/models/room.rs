use serde::{Deserialize, Serialize};

/// A room and the single beacon placed in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub beacon_id: String,
}
