//! Request payload types.
//!
//! Resource bodies are forwarded to the API as-is, so any `Serialize` value
//! works; `Fields` is the untyped form. Webhook subscriptions have a small
//! fixed shape and get a typed struct.

use serde::{Deserialize, Serialize};

/// Free-form resource fields, serialized in insertion order.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Vendor identifier of a record.
pub type RecordId = u64;

/// Record type a webhook subscription listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionResource {
    Lead,
    Person,
    Company,
    Deal,
    Project,
    Task,
}

/// Change event that triggers a webhook notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionEvent {
    New,
    Update,
    Delete,
}

/// Shared secret echoed back in every notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionSecret {
    pub secret: String,
    pub key: String,
}

/// Request payload for registering a webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubscription {
    pub target: String,
    #[serde(rename = "type")]
    pub resource: SubscriptionResource,
    pub event: SubscriptionEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<SubscriptionSecret>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn subscription_serializes_with_vendor_field_names() {
        let sub = NewSubscription {
            target: "https://hooks.example.com/pw".to_string(),
            resource: SubscriptionResource::Lead,
            event: SubscriptionEvent::Update,
            secret: Some(SubscriptionSecret {
                secret: "hook_source".to_string(),
                key: "prosperworks_notifications".to_string(),
            }),
        };
        assert_eq!(
            serde_json::to_value(&sub).unwrap(),
            json!({
                "target": "https://hooks.example.com/pw",
                "type": "lead",
                "event": "update",
                "secret": {"secret": "hook_source", "key": "prosperworks_notifications"}
            })
        );
    }

    #[test]
    fn subscription_without_secret_omits_field() {
        let sub = NewSubscription {
            target: "https://hooks.example.com/pw".to_string(),
            resource: SubscriptionResource::Deal,
            event: SubscriptionEvent::New,
            secret: None,
        };
        let value = serde_json::to_value(&sub).unwrap();
        assert_eq!(value["type"], "deal");
        assert!(value.get("secret").is_none());
    }

    #[test]
    fn fields_keep_insertion_order() {
        let mut fields = Fields::new();
        fields.insert("name".to_string(), json!("Zed"));
        fields.insert("details".to_string(), json!("first"));
        fields.insert("assignee_id".to_string(), json!(7));
        assert_eq!(
            serde_json::to_string(&fields).unwrap(),
            r#"{"name":"Zed","details":"first","assignee_id":7}"#
        );
    }
}
