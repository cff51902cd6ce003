use serde::{Deserialize, Serialize};

pub mod health;
pub mod webhook;

/// Envelope for successful `/api/v2` responses
#[derive(Clone, Deserialize, Serialize, Debug)]
pub struct DataResponse<T> {
    pub data: T,
}
