/// User domain type
use serde::{Deserialize, Serialize};

/// Account returned by the register endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-side identifier
    pub id: i64,

    /// Login name
    pub username: String,

    /// Contact address, if the server returns it
    #[serde(default)]
    pub email: Option<String>,
}
