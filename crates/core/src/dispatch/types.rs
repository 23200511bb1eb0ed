//! Types for the dispatch notifier.

use chrono::Utc;
use serde::Serialize;

/// The JSON document posted to the downstream automation webhook.
///
/// Field names are part of the wire contract with the consumer; do not
/// rename them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchPayload {
    /// User-supplied caption, possibly empty.
    pub caption: String,
    /// The original source URL as the user posted it.
    pub reel_url: String,
    /// The public URL the artifact was relayed to.
    pub video_url: String,
    /// Origin tag identifying this relay instance.
    pub source: String,
    /// ISO-8601 timestamp of payload construction.
    pub ts: String,
}

impl DispatchPayload {
    /// Builds the payload, stamping `ts` with the current time.
    pub fn new(caption: &str, reel_url: &str, video_url: &str, source: &str) -> Self {
        Self {
            caption: caption.to_string(),
            reel_url: reel_url.to_string(),
            video_url: video_url.to_string(),
            source: source.to_string(),
            ts: Utc::now().to_rfc3339(),
        }
    }
}

/// Positive acknowledgement from the webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchAck {
    pub status: u16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_payload_wire_field_names() {
        let payload = DispatchPayload::new(
            "hello",
            "https://www.instagram.com/reel/ABC123/",
            "https://host-a.example/xyz",
            "reelay",
        );
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["caption"], "hello");
        assert_eq!(json["reel_url"], "https://www.instagram.com/reel/ABC123/");
        assert_eq!(json["video_url"], "https://host-a.example/xyz");
        assert_eq!(json["source"], "reelay");
        assert_eq!(json.as_object().unwrap().len(), 5);
    }

    #[test]
    fn test_payload_ts_is_iso8601() {
        let payload = DispatchPayload::new("", "https://a/", "https://b/", "tag");
        assert!(DateTime::parse_from_rfc3339(&payload.ts).is_ok());
    }
}
