use super::reference::{Model, Ref};
use super::thought::Thought;
use bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub thoughts: Vec<Ref<Thought>>, // thoughts authored by this user, in creation order
    #[serde(default)]
    pub friends: Vec<Ref<User>>, // one-sided: the friend does not list this user back
}

impl Model for User {
    const COLLECTION: &'static str = "users";
}

impl User {
    pub fn new(username: String, email: String) -> Self {
        Self {
            id: None,
            username,
            email,
            thoughts: vec![],
            friends: vec![],
        }
    }

    pub fn friend_count(&self) -> usize {
        self.friends.len()
    }

    pub fn has_thought(&self, thought: &ObjectId) -> bool {
        self.thoughts.iter().any(|r| r == thought)
    }

    pub fn has_friend(&self, friend: &ObjectId) -> bool {
        self.friends.iter().any(|r| r == friend)
    }

    /// Adds a thought reference unless it is already present
    pub fn link_thought(&mut self, thought: ObjectId) {
        if !self.has_thought(&thought) {
            self.thoughts.push(Ref::new(thought));
        }
    }

    pub fn unlink_thought(&mut self, thought: &ObjectId) {
        self.thoughts.retain(|r| r != thought);
    }

    /// Adds a friend reference unless it is already present
    pub fn add_friend(&mut self, friend: ObjectId) {
        if !self.has_friend(&friend) {
            self.friends.push(Ref::new(friend));
        }
    }

    pub fn remove_friend(&mut self, friend: &ObjectId) {
        self.friends.retain(|r| r != friend);
    }
}

/// Validated partial update of a user's scalar fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none()
    }

    /**
     * Build the `$set` document for this patch
     *
     * @returns - the fields to set, empty if the patch changes nothing
     */
    pub fn to_set_document(&self) -> Document {
        let mut set = doc! {};
        if let Some(username) = &self.username {
            set.insert("username", username);
        }
        if let Some(email) = &self.email {
            set.insert("email", email);
        }
        set
    }

    pub fn apply(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
    }
}
