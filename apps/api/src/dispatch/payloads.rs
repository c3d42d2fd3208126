//! Work items read by the out-of-process workers. Keys are snake_case on the
//! queue because that is what the consumers parse.

use serde::{Deserialize, Serialize};

/// First draft for a recipient. Goes to the generation queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratePayload {
    pub recipient: String,
}

/// Follow-up prompt inside an existing generation conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinePayload {
    pub recipient: String,
    pub conversation_id: String,
    pub prompt: String,
}

/// Final letter text to e-mail. Goes to the delivery queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendPayload {
    pub recipient: String,
    pub cover_letter: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_refine_wire_keys() {
        let payload = RefinePayload {
            recipient: "a@b.com".into(),
            conversation_id: "conv-9".into(),
            prompt: String::new(),
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "recipient": "a@b.com", "conversation_id": "conv-9", "prompt": "" })
        );
    }

    #[test]
    fn test_send_wire_keys() {
        let payload = SendPayload {
            recipient: "a@b.com".into(),
            cover_letter: "Dear team".into(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["cover_letter"], "Dear team");
        assert_eq!(value.as_object().unwrap().len(), 2);
    }
}
