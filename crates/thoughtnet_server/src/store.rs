use mongodb::bson::oid::ObjectId;
use thoughtnet_common::errors::ThoughtnetError;
use thoughtnet_common::models::{Reaction, Thought, ThoughtPatch, User, UserPatch};

/**
 * Single-document primitives over the `users` and `thoughts` collections
 * @notice - no method spans both collections; sequencing writes across them is the
 *           job of the integrity service
 * @notice - a write whose filter matches nothing returns Ok(None), never an error
 */
#[rocket::async_trait]
pub trait SocialStore: Send + Sync {
    /// USER FUNCTIONS ///

    async fn list_users(&self) -> Result<Vec<User>, ThoughtnetError>;

    async fn find_user(&self, id: &ObjectId) -> Result<Option<User>, ThoughtnetError>;

    /// Fetch every user whose id is in `ids`, in no particular order
    async fn find_users(&self, ids: &[ObjectId]) -> Result<Vec<User>, ThoughtnetError>;

    /**
     * Find users that already hold a username or email
     *
     * @param username - the username to look for, if any
     * @param email - the email to look for, if any
     * @param exclude - a user to ignore (the one being updated)
     * @returns - every other user with a matching username or email
     */
    async fn find_user_conflicts(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        exclude: Option<&ObjectId>,
    ) -> Result<Vec<User>, ThoughtnetError>;

    async fn insert_user(&self, user: &User) -> Result<ObjectId, ThoughtnetError>;

    async fn update_user(
        &self,
        id: &ObjectId,
        patch: &UserPatch,
    ) -> Result<Option<User>, ThoughtnetError>;

    /// Delete a user, returning the document as it was before deletion
    async fn delete_user(&self, id: &ObjectId) -> Result<Option<User>, ThoughtnetError>;

    async fn add_friend(
        &self,
        id: &ObjectId,
        friend: &ObjectId,
    ) -> Result<Option<User>, ThoughtnetError>;

    async fn remove_friend(
        &self,
        id: &ObjectId,
        friend: &ObjectId,
    ) -> Result<Option<User>, ThoughtnetError>;

    /// Add a thought reference to the user with `username` (no duplicates)
    async fn link_thought(
        &self,
        username: &str,
        thought: &ObjectId,
    ) -> Result<Option<User>, ThoughtnetError>;

    async fn unlink_thought(
        &self,
        username: &str,
        thought: &ObjectId,
    ) -> Result<Option<User>, ThoughtnetError>;

    /// THOUGHT FUNCTIONS ///

    async fn list_thoughts(&self) -> Result<Vec<Thought>, ThoughtnetError>;

    async fn find_thought(&self, id: &ObjectId) -> Result<Option<Thought>, ThoughtnetError>;

    async fn find_thoughts(&self, ids: &[ObjectId]) -> Result<Vec<Thought>, ThoughtnetError>;

    async fn insert_thought(&self, thought: &Thought) -> Result<ObjectId, ThoughtnetError>;

    async fn update_thought(
        &self,
        id: &ObjectId,
        patch: &ThoughtPatch,
    ) -> Result<Option<Thought>, ThoughtnetError>;

    async fn delete_thought(&self, id: &ObjectId) -> Result<Option<Thought>, ThoughtnetError>;

    /// Delete every thought whose id is in `ids`, returning how many were removed
    async fn delete_thoughts(&self, ids: &[ObjectId]) -> Result<u64, ThoughtnetError>;

    async fn push_reaction(
        &self,
        id: &ObjectId,
        reaction: &Reaction,
    ) -> Result<Option<Thought>, ThoughtnetError>;

    /// Remove reactions matching `reaction_id`; matching none still returns the thought
    async fn pull_reaction(
        &self,
        id: &ObjectId,
        reaction_id: &ObjectId,
    ) -> Result<Option<Thought>, ThoughtnetError>;
}
