use crate::store::SocialStore;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use thoughtnet_common::errors::ThoughtnetError;
use thoughtnet_common::http::requests::{
    CreateThoughtRequest, CreateUserRequest, NewReactionRequest, UpdateThoughtRequest,
    UpdateUserRequest,
};
use thoughtnet_common::models::{Ref, Thought, User};
use thoughtnet_common::validation::{
    validate_new_reaction, validate_new_thought, validate_new_user, validate_thought_patch,
    validate_user_patch, Violations,
};
use tracing::{debug, warn};

/// A user with its references resolved, in the order the user lists them
#[derive(Debug, Clone)]
pub struct PopulatedUser {
    pub user: User,
    pub thoughts: Vec<Thought>,
    pub friends: Vec<User>,
}

#[derive(Debug, Clone)]
pub enum ThoughtCreation {
    /// The thought was stored and registered with its author
    Linked(Thought),
    /// The thought was stored but no user holds its username
    Orphaned(Thought),
}

impl ThoughtCreation {
    pub fn thought(&self) -> &Thought {
        match self {
            ThoughtCreation::Linked(thought) | ThoughtCreation::Orphaned(thought) => thought,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThoughtDeletion {
    pub thought: Thought,
    /// The author the reference was pruned from, None if the author no longer exists
    pub pruned_from: Option<User>,
}

#[derive(Debug, Clone)]
pub struct UserDeletion {
    pub user: User,
    pub thoughts_deleted: u64,
}

fn ids<M>(refs: &[Ref<M>]) -> Vec<ObjectId> {
    refs.iter().map(Ref::id).collect()
}

// keep the order of `refs`, dropping references whose document is gone
fn in_ref_order<M, T>(refs: &[Ref<M>], mut found: Vec<T>, id_of: fn(&T) -> Option<ObjectId>) -> Vec<T> {
    let mut ordered = Vec::with_capacity(found.len());
    for reference in refs {
        if let Some(index) = found
            .iter()
            .position(|doc| id_of(doc) == Some(reference.id()))
        {
            ordered.push(found.swap_remove(index));
        }
    }
    ordered
}

/**
 * Keeps the users and thoughts collections consistent across multi-document writes
 * @notice - every multi-step operation runs its steps in sequence with no transaction;
 *           a later step never undoes an earlier one
 */
pub struct Integrity {
    store: Arc<dyn SocialStore>,
}

impl Integrity {
    pub fn new(store: Arc<dyn SocialStore>) -> Self {
        Self { store }
    }

    async fn ensure_unique(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        exclude: Option<&ObjectId>,
    ) -> Result<(), ThoughtnetError> {
        let conflicts = self
            .store
            .find_user_conflicts(username, email, exclude)
            .await?;
        let mut violations = Violations::new("User");
        if let Some(username) = username {
            if conflicts.iter().any(|user| user.username == username) {
                violations.push(
                    "username",
                    format!("Username {} already used by another account", username),
                );
            }
        }
        if let Some(email) = email {
            if conflicts.iter().any(|user| user.email == email) {
                violations.push(
                    "email",
                    format!("Email {} already used by another account", email),
                );
            }
        }
        violations.finish()
    }

    /// USER FUNCTIONS ///

    pub async fn list_users(&self) -> Result<Vec<User>, ThoughtnetError> {
        self.store.list_users().await
    }

    /**
     * Fetch a user with its thoughts and friends expanded
     * @notice - dangling references (deleted thoughts or friends) are left out
     *
     * @param id - the id of the user
     * @returns - the populated user, or UserNotFound
     */
    pub async fn get_user(&self, id: &ObjectId) -> Result<PopulatedUser, ThoughtnetError> {
        let user = self
            .store
            .find_user(id)
            .await?
            .ok_or(ThoughtnetError::UserNotFound)?;
        let thoughts = self.store.find_thoughts(&ids(&user.thoughts)).await?;
        let friends = self.store.find_users(&ids(&user.friends)).await?;
        Ok(PopulatedUser {
            thoughts: in_ref_order(&user.thoughts, thoughts, |t: &Thought| t.id),
            friends: in_ref_order(&user.friends, friends, |u: &User| u.id),
            user,
        })
    }

    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<User, ThoughtnetError> {
        let mut user = validate_new_user(request)?;
        self.ensure_unique(Some(&user.username), Some(&user.email), None)
            .await?;
        let id = self.store.insert_user(&user).await?;
        user.id = Some(id);
        debug!("Created user {} ({})", user.username, id);
        Ok(user)
    }

    /**
     * Apply a partial update to a user
     * @notice - renaming a user does not rewrite the username copied onto their thoughts
     */
    pub async fn update_user(
        &self,
        id: &ObjectId,
        request: &UpdateUserRequest,
    ) -> Result<User, ThoughtnetError> {
        let patch = validate_user_patch(request)?;
        self.ensure_unique(patch.username.as_deref(), patch.email.as_deref(), Some(id))
            .await?;
        self.store
            .update_user(id, &patch)
            .await?
            .ok_or(ThoughtnetError::UserNotFound)
    }

    /**
     * Delete a user and every thought it lists
     * @notice - other users keep any friend reference to the deleted user
     *
     * @param id - the id of the user to delete
     * @returns - the deleted user and how many thoughts went with it
     */
    pub async fn delete_user(&self, id: &ObjectId) -> Result<UserDeletion, ThoughtnetError> {
        let user = self
            .store
            .delete_user(id)
            .await?
            .ok_or(ThoughtnetError::UserNotFound)?;
        let thoughts_deleted = self.store.delete_thoughts(&ids(&user.thoughts)).await?;
        debug!(
            "Deleted user {} and {} of their thoughts",
            user.username, thoughts_deleted
        );
        Ok(UserDeletion {
            user,
            thoughts_deleted,
        })
    }

    /// Add `friend` to the user's friends; the friend id is not checked for existence
    pub async fn add_friend(
        &self,
        id: &ObjectId,
        friend: &ObjectId,
    ) -> Result<User, ThoughtnetError> {
        self.store
            .add_friend(id, friend)
            .await?
            .ok_or(ThoughtnetError::UserNotFound)
    }

    pub async fn remove_friend(
        &self,
        id: &ObjectId,
        friend: &ObjectId,
    ) -> Result<User, ThoughtnetError> {
        self.store
            .remove_friend(id, friend)
            .await?
            .ok_or(ThoughtnetError::UserNotFound)
    }

    /// THOUGHT FUNCTIONS ///

    pub async fn list_thoughts(&self) -> Result<Vec<Thought>, ThoughtnetError> {
        self.store.list_thoughts().await
    }

    pub async fn get_thought(&self, id: &ObjectId) -> Result<Thought, ThoughtnetError> {
        self.store
            .find_thought(id)
            .await?
            .ok_or(ThoughtnetError::ThoughtNotFound)
    }

    /**
     * Store a thought, then register it with the user holding its username
     * @notice - if no such user exists the thought stays stored and is reported orphaned
     *
     * @param request - the thought text and author username
     * @returns - the stored thought, linked or orphaned
     */
    pub async fn create_thought(
        &self,
        request: &CreateThoughtRequest,
    ) -> Result<ThoughtCreation, ThoughtnetError> {
        let mut thought = validate_new_thought(request)?;
        let id = self.store.insert_thought(&thought).await?;
        thought.id = Some(id);
        match self.store.link_thought(&thought.username, &id).await? {
            Some(_) => {
                debug!("Created thought {} for {}", id, thought.username);
                Ok(ThoughtCreation::Linked(thought))
            }
            None => {
                warn!(
                    "Thought {} created but no user named {} exists",
                    id, thought.username
                );
                Ok(ThoughtCreation::Orphaned(thought))
            }
        }
    }

    /// Patch a thought; a new username does not move the thought to another user
    pub async fn update_thought(
        &self,
        id: &ObjectId,
        request: &UpdateThoughtRequest,
    ) -> Result<Thought, ThoughtnetError> {
        let patch = validate_thought_patch(request)?;
        self.store
            .update_thought(id, &patch)
            .await?
            .ok_or(ThoughtnetError::ThoughtNotFound)
    }

    /**
     * Delete a thought, then prune it from the user holding its username
     * @notice - a missing author skips the prune, the deletion still succeeds
     */
    pub async fn delete_thought(&self, id: &ObjectId) -> Result<ThoughtDeletion, ThoughtnetError> {
        let thought = self
            .store
            .delete_thought(id)
            .await?
            .ok_or(ThoughtnetError::ThoughtNotFound)?;
        let pruned_from = self.store.unlink_thought(&thought.username, id).await?;
        if pruned_from.is_none() {
            warn!(
                "Deleted thought {} but its author {} no longer exists",
                id, thought.username
            );
        }
        Ok(ThoughtDeletion {
            thought,
            pruned_from,
        })
    }

    pub async fn add_reaction(
        &self,
        id: &ObjectId,
        request: &NewReactionRequest,
    ) -> Result<Thought, ThoughtnetError> {
        let reaction = validate_new_reaction(request)?;
        self.store
            .push_reaction(id, &reaction)
            .await?
            .ok_or(ThoughtnetError::ThoughtNotFound)
    }

    /// Remove a reaction by id; an unknown reaction id still succeeds
    pub async fn remove_reaction(
        &self,
        id: &ObjectId,
        reaction_id: &ObjectId,
    ) -> Result<Thought, ThoughtnetError> {
        self.store
            .pull_reaction(id, reaction_id)
            .await?
            .ok_or(ThoughtnetError::ThoughtNotFound)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::memory::MemoryStore;
    use thoughtnet_common::http::responses::PopulatedUserView;

    fn integrity() -> Integrity {
        Integrity::new(Arc::new(MemoryStore::default()))
    }

    async fn create_user(integrity: &Integrity, username: &str) -> User {
        integrity
            .create_user(&CreateUserRequest {
                username: Some(username.to_string()),
                email: Some(format!("{}@x.io", username)),
            })
            .await
            .unwrap()
    }

    async fn create_thought(integrity: &Integrity, username: &str, text: &str) -> ThoughtCreation {
        integrity
            .create_thought(&CreateThoughtRequest {
                thought_text: Some(text.to_string()),
                username: Some(username.to_string()),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_thought_links_author_once() {
        let integrity = integrity();
        let ana = create_user(&integrity, "ana").await;
        let creation = create_thought(&integrity, "ana", "hi").await;
        assert!(matches!(creation, ThoughtCreation::Linked(_)));
        let thought_id = creation.thought().id.unwrap();

        // a client-side retry of the link step must not duplicate the reference
        integrity
            .store
            .link_thought("ana", &thought_id)
            .await
            .unwrap();

        let populated = integrity.get_user(&ana.id.unwrap()).await.unwrap();
        assert_eq!(populated.user.thoughts.len(), 1);
        assert_eq!(populated.thoughts.len(), 1);
        assert_eq!(populated.thoughts[0].id, Some(thought_id));
        assert!(populated.thoughts[0].reactions.is_empty());
    }

    #[tokio::test]
    async fn test_create_thought_for_unknown_user_is_orphaned() {
        let integrity = integrity();
        let ana = create_user(&integrity, "ana").await;
        let creation = create_thought(&integrity, "ghost", "anyone?").await;
        let thought_id = match creation {
            ThoughtCreation::Orphaned(thought) => thought.id.unwrap(),
            ThoughtCreation::Linked(_) => panic!("thought should be orphaned"),
        };
        let stored = integrity.get_thought(&thought_id).await.unwrap();
        assert_eq!(stored.username, "ghost");
        let users = integrity.list_users().await.unwrap();
        assert!(users.iter().all(|user| !user.has_thought(&thought_id)));
        assert!(integrity
            .get_user(&ana.id.unwrap())
            .await
            .unwrap()
            .thoughts
            .is_empty());
    }

    #[tokio::test]
    async fn test_delete_user_cascades_to_thoughts() {
        let integrity = integrity();
        let ana = create_user(&integrity, "ana").await;
        let first = create_thought(&integrity, "ana", "one").await;
        let second = create_thought(&integrity, "ana", "two").await;
        let other = create_thought(&integrity, "ghost", "three").await;

        let deletion = integrity.delete_user(&ana.id.unwrap()).await.unwrap();
        assert_eq!(deletion.thoughts_deleted, 2);
        for creation in [first, second] {
            let err = integrity
                .get_thought(&creation.thought().id.unwrap())
                .await
                .unwrap_err();
            assert_eq!(err, ThoughtnetError::ThoughtNotFound);
        }
        assert!(integrity
            .get_thought(&other.thought().id.unwrap())
            .await
            .is_ok());
        assert_eq!(
            integrity.delete_user(&ana.id.unwrap()).await.unwrap_err(),
            ThoughtnetError::UserNotFound
        );
    }

    #[tokio::test]
    async fn test_delete_user_leaves_dangling_friend_references() {
        let integrity = integrity();
        let ana = create_user(&integrity, "ana").await;
        let bo = create_user(&integrity, "bo").await;
        let (ana_id, bo_id) = (ana.id.unwrap(), bo.id.unwrap());
        integrity.add_friend(&ana_id, &bo_id).await.unwrap();
        integrity.delete_user(&bo_id).await.unwrap();

        let populated = integrity.get_user(&ana_id).await.unwrap();
        assert!(populated.user.has_friend(&bo_id));
        assert!(populated.friends.is_empty());
        let view =
            PopulatedUserView::new(&populated.user, &populated.thoughts, &populated.friends);
        assert_eq!(view.friend_count, 0);
    }

    #[tokio::test]
    async fn test_delete_thought_prunes_author() {
        let integrity = integrity();
        let ana = create_user(&integrity, "ana").await;
        let creation = create_thought(&integrity, "ana", "hi").await;
        let thought_id = creation.thought().id.unwrap();

        let deletion = integrity.delete_thought(&thought_id).await.unwrap();
        let pruned = deletion.pruned_from.unwrap();
        assert!(!pruned.has_thought(&thought_id));
        let populated = integrity.get_user(&ana.id.unwrap()).await.unwrap();
        assert!(populated.user.thoughts.is_empty());

        assert_eq!(
            integrity.delete_thought(&thought_id).await.unwrap_err(),
            ThoughtnetError::ThoughtNotFound
        );
    }

    #[tokio::test]
    async fn test_delete_thought_without_author_succeeds() {
        let integrity = integrity();
        let orphan = create_thought(&integrity, "ghost", "alone").await;
        let deletion = integrity
            .delete_thought(&orphan.thought().id.unwrap())
            .await
            .unwrap();
        assert!(deletion.pruned_from.is_none());
        assert!(integrity.list_thoughts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_thought_does_not_reparent() {
        let integrity = integrity();
        let ana = create_user(&integrity, "ana").await;
        let bo = create_user(&integrity, "bo").await;
        let thought_id = create_thought(&integrity, "ana", "hi")
            .await
            .thought()
            .id
            .unwrap();
        let updated = integrity
            .update_thought(
                &thought_id,
                &UpdateThoughtRequest {
                    thought_text: Some(Some("edited".to_string())),
                    username: Some(Some("bo".to_string())),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.thought_text, "edited");
        assert_eq!(updated.username, "bo");

        let ana = integrity.get_user(&ana.id.unwrap()).await.unwrap();
        assert!(ana.user.has_thought(&thought_id));
        let bo = integrity.get_user(&bo.id.unwrap()).await.unwrap();
        assert!(bo.user.thoughts.is_empty());
    }

    #[tokio::test]
    async fn test_update_revalidates_and_checks_uniqueness() {
        let integrity = integrity();
        let ana = create_user(&integrity, "ana").await;
        create_user(&integrity, "bo").await;
        let ana_id = ana.id.unwrap();

        let err = integrity
            .update_user(
                &ana_id,
                &UpdateUserRequest {
                    username: Some(Some("bo".to_string())),
                    email: None,
                },
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Username bo already used"));

        let err = integrity
            .update_user(
                &ana_id,
                &UpdateUserRequest {
                    username: None,
                    email: Some(Some("nope".to_string())),
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_client_error());

        // keeping your own username is not a conflict
        let updated = integrity
            .update_user(
                &ana_id,
                &UpdateUserRequest {
                    username: Some(Some(" ana ".to_string())),
                    email: Some(Some("ana@new.io".to_string())),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.username, "ana");
        assert_eq!(updated.email, "ana@new.io");

        assert_eq!(
            integrity
                .update_user(&ObjectId::new(), &UpdateUserRequest::default())
                .await
                .unwrap_err(),
            ThoughtnetError::UserNotFound
        );
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicates() {
        let integrity = integrity();
        create_user(&integrity, "ana").await;
        let err = integrity
            .create_user(&CreateUserRequest {
                username: Some("ana".to_string()),
                email: Some("ana@x.io".to_string()),
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ThoughtnetError::Validation(
                "User validation failed: username: Username ana already used by another account, email: Email ana@x.io already used by another account"
                    .to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_friends_are_one_sided_and_idempotent() {
        let integrity = integrity();
        let ana = create_user(&integrity, "ana").await;
        let bo = create_user(&integrity, "bo").await;
        let (ana_id, bo_id) = (ana.id.unwrap(), bo.id.unwrap());

        integrity.add_friend(&ana_id, &bo_id).await.unwrap();
        let ana = integrity.add_friend(&ana_id, &bo_id).await.unwrap();
        assert_eq!(ana.friends.len(), 1);
        assert_eq!(ana.friend_count(), 1);

        let bo = integrity.get_user(&bo_id).await.unwrap();
        assert!(bo.user.friends.is_empty());

        // nonexistent friends are accepted
        let ana = integrity.add_friend(&ana_id, &ObjectId::new()).await.unwrap();
        assert_eq!(ana.friend_count(), 2);

        let ana = integrity.remove_friend(&ana_id, &bo_id).await.unwrap();
        assert_eq!(ana.friend_count(), 1);
        let ana = integrity.remove_friend(&ana_id, &bo_id).await.unwrap();
        assert_eq!(ana.friend_count(), 1);

        assert_eq!(
            integrity
                .add_friend(&ObjectId::new(), &bo_id)
                .await
                .unwrap_err(),
            ThoughtnetError::UserNotFound
        );
    }

    #[tokio::test]
    async fn test_reactions() {
        let integrity = integrity();
        let thought_id = create_thought(&integrity, "ghost", "hi")
            .await
            .thought()
            .id
            .unwrap();
        let thought = integrity
            .add_reaction(
                &thought_id,
                &NewReactionRequest {
                    reaction_body: Some("nice".to_string()),
                    username: Some("bo".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(thought.reaction_count(), 1);
        let reaction_id = thought.reactions[0].reaction_id;

        let unchanged = integrity
            .remove_reaction(&thought_id, &ObjectId::new())
            .await
            .unwrap();
        assert_eq!(unchanged.reactions, thought.reactions);

        let removed = integrity
            .remove_reaction(&thought_id, &reaction_id)
            .await
            .unwrap();
        assert_eq!(removed.reaction_count(), 0);

        assert_eq!(
            integrity
                .remove_reaction(&ObjectId::new(), &reaction_id)
                .await
                .unwrap_err(),
            ThoughtnetError::ThoughtNotFound
        );
    }
}
