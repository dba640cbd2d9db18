use super::reference::Model;
use bson::{doc, oid::ObjectId, DateTime, Document};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Thought {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub thought_text: String,
    pub username: String, // copied from the author, not a reference
    pub created_at: DateTime,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

impl Model for Thought {
    const COLLECTION: &'static str = "thoughts";
}

impl Thought {
    pub fn new(thought_text: String, username: String) -> Self {
        Self {
            id: None,
            thought_text,
            username,
            created_at: DateTime::now(),
            reactions: vec![],
        }
    }

    pub fn reaction_count(&self) -> usize {
        self.reactions.len()
    }
}

// embedded in Thought.reactions, never stored on its own
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub reaction_id: ObjectId,
    pub reaction_body: String,
    pub username: String,
    pub created_at: DateTime,
}

impl Reaction {
    pub fn new(reaction_body: String, username: String) -> Self {
        Self {
            reaction_id: ObjectId::new(),
            reaction_body,
            username,
            created_at: DateTime::now(),
        }
    }
}

/// Validated partial update of a thought's scalar fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThoughtPatch {
    pub thought_text: Option<String>,
    pub username: Option<String>,
}

impl ThoughtPatch {
    pub fn is_empty(&self) -> bool {
        self.thought_text.is_none() && self.username.is_none()
    }

    pub fn to_set_document(&self) -> Document {
        let mut set = doc! {};
        if let Some(thought_text) = &self.thought_text {
            set.insert("thoughtText", thought_text);
        }
        if let Some(username) = &self.username {
            set.insert("username", username);
        }
        set
    }

    pub fn apply(&self, thought: &mut Thought) {
        if let Some(thought_text) = &self.thought_text {
            thought.thought_text = thought_text.clone();
        }
        if let Some(username) = &self.username {
            thought.username = username.clone();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_thought_stored_with_camel_case_fields() {
        let mut thought = Thought::new("hi".to_string(), "ana".to_string());
        thought
            .reactions
            .push(Reaction::new("nice".to_string(), "bo".to_string()));
        let document = bson::to_document(&thought).unwrap();
        assert!(!document.contains_key("_id"));
        assert_eq!(document.get_str("thoughtText").unwrap(), "hi");
        assert!(document.get_datetime("createdAt").is_ok());
        let reaction = document.get_array("reactions").unwrap()[0]
            .as_document()
            .unwrap();
        assert!(reaction.get_object_id("reactionId").is_ok());
        assert_eq!(reaction.get_str("reactionBody").unwrap(), "nice");
        assert_eq!(thought.reaction_count(), 1);
    }

    #[test]
    fn test_patch_uses_stored_field_names() {
        let patch = ThoughtPatch {
            thought_text: Some("edited".to_string()),
            username: None,
        };
        assert_eq!(patch.to_set_document(), doc! { "thoughtText": "edited" });
    }
}
