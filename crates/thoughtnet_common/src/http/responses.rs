use crate::models::{Reaction, Ref, Thought, User};
use crate::utils::format_timestamp;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

fn hex_id(id: &Option<ObjectId>) -> String {
    id.map(|id| id.to_hex()).unwrap_or_default()
}

fn hex_refs<M>(refs: &[Ref<M>]) -> Vec<String> {
    refs.iter().map(|r| r.id().to_hex()).collect()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub thoughts: Vec<String>,
    pub friends: Vec<String>,
    pub friend_count: usize,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: hex_id(&user.id),
            username: user.username.clone(),
            email: user.email.clone(),
            thoughts: hex_refs(&user.thoughts),
            friends: hex_refs(&user.friends),
            friend_count: user.friend_count(),
        }
    }
}

/// A user with its thought and friend references replaced by the documents themselves
///
/// References to deleted documents are not expanded, so `friend_count` counts the
/// friends actually returned
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedUserView {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub thoughts: Vec<ThoughtView>,
    pub friends: Vec<UserView>,
    pub friend_count: usize,
}

impl PopulatedUserView {
    pub fn new(user: &User, thoughts: &[Thought], friends: &[User]) -> Self {
        Self {
            id: hex_id(&user.id),
            username: user.username.clone(),
            email: user.email.clone(),
            thoughts: thoughts.iter().map(ThoughtView::from).collect(),
            friends: friends.iter().map(UserView::from).collect(),
            friend_count: friends.len(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtView {
    #[serde(rename = "_id")]
    pub id: String,
    pub thought_text: String,
    pub username: String,
    pub created_at: String,
    pub reactions: Vec<ReactionView>,
    pub reaction_count: usize,
}

impl From<&Thought> for ThoughtView {
    fn from(thought: &Thought) -> Self {
        Self {
            id: hex_id(&thought.id),
            thought_text: thought.thought_text.clone(),
            username: thought.username.clone(),
            created_at: format_timestamp(&thought.created_at),
            reactions: thought.reactions.iter().map(ReactionView::from).collect(),
            reaction_count: thought.reaction_count(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReactionView {
    pub reaction_id: String,
    pub reaction_body: String,
    pub username: String,
    pub created_at: String,
}

impl From<&Reaction> for ReactionView {
    fn from(reaction: &Reaction) -> Self {
        Self {
            reaction_id: reaction.reaction_id.to_hex(),
            reaction_body: reaction.reaction_body.clone(),
            username: reaction.username.clone(),
            created_at: format_timestamp(&reaction.created_at),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FriendResponse {
    pub message: String,
    pub user: UserView,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrphanedThoughtResponse {
    pub message: String,
    pub thought: ThoughtView,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_view_shape() {
        let mut user = User::new("ana".to_string(), "ana@x.io".to_string());
        user.id = Some(ObjectId::new());
        let friend = ObjectId::new();
        user.add_friend(friend);
        let value = serde_json::to_value(UserView::from(&user)).unwrap();
        assert_eq!(value["_id"], json!(user.id.unwrap().to_hex()));
        assert_eq!(value["friends"], json!([friend.to_hex()]));
        assert_eq!(value["friendCount"], json!(1));
        assert!(value.get("__v").is_none());
    }

    #[test]
    fn test_populated_friend_count_matches_friends() {
        let mut user = User::new("ana".to_string(), "ana@x.io".to_string());
        user.id = Some(ObjectId::new());
        let mut friend = User::new("bo".to_string(), "bo@x.io".to_string());
        friend.id = Some(ObjectId::new());
        user.add_friend(friend.id.unwrap());
        user.add_friend(ObjectId::new());
        let view = PopulatedUserView::new(&user, &[], &[friend]);
        assert_eq!(view.friends.len(), 1);
        assert_eq!(view.friend_count, 1);
    }

    #[test]
    fn test_thought_view_counts_reactions() {
        let mut thought = Thought::new("hi".to_string(), "ana".to_string());
        thought.id = Some(ObjectId::new());
        let view = ThoughtView::from(&thought);
        assert_eq!(view.reaction_count, 0);
        thought
            .reactions
            .push(Reaction::new("nice".to_string(), "bo".to_string()));
        let value = serde_json::to_value(ThoughtView::from(&thought)).unwrap();
        assert_eq!(value["reactionCount"], json!(1));
        assert_eq!(value["thoughtText"], json!("hi"));
        assert_eq!(value["reactions"][0]["reactionBody"], json!("nice"));
        assert!(value["createdAt"].as_str().unwrap().contains(" at "));
    }
}
