//! The acting user passed into every mutating operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docstore_core::types::UserId;

/// Who is performing an operation.
///
/// Authorization is decided by the caller before the document services are
/// invoked; the actor only supplies `created_by` / `uploaded_by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The acting user's ID.
    pub user_id: UserId,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl Actor {
    /// An actor for `user_id`, stamped with the current time.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            request_time: Utc::now(),
        }
    }
}
