use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::service::IntakeService;

/// Shared state for all routes.
#[derive(Clone)]
pub struct ApiContext {
    pub service: Arc<IntakeService>,
}

/// Uniform response wrapper: every endpoint, success or failure, returns
/// this shape.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    pub message: String,
    pub data: Map<String, Value>,
}

impl Envelope {
    pub fn ok(message: &str, data: Map<String, Value>) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data,
        }
    }

    pub fn fail(message: String) -> Self {
        Self {
            success: false,
            message,
            data: Map::new(),
        }
    }
}

/// Request body for the create endpoints: the scanned document text.
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_expected_shape() {
        let mut data = Map::new();
        data.insert("id".into(), Value::from(12));
        let json = serde_json::to_value(Envelope::ok("created", data)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "created");
        assert_eq!(json["data"]["id"], 12);
    }

    #[test]
    fn failure_envelope_has_empty_data() {
        let json = serde_json::to_value(Envelope::fail("nope".into())).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["data"].as_object().unwrap().is_empty());
    }
}
