use serde::{Deserialize, Serialize};

/// Error body returned by the remote collection on non-success responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// The carried message, ignoring blank values.
    pub fn into_message(self) -> Option<String> {
        self.message.filter(|message| !message.is_empty())
    }
}
