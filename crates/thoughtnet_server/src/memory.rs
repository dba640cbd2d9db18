use crate::store::SocialStore;
use mongodb::bson::oid::ObjectId;
use thoughtnet_common::errors::ThoughtnetError;
use thoughtnet_common::models::{Reaction, Thought, ThoughtPatch, User, UserPatch};
use tokio::sync::RwLock;

/**
 * Process-local document store with the same filter semantics as MongoStore,
 * including the unique username and email indexes on users
 */
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    thoughts: RwLock<Vec<Thought>>,
}

fn duplicate_key(field: &str, value: &str) -> ThoughtnetError {
    ThoughtnetError::Validation(format!(
        "Duplicate key: users.{} already holds {}",
        field, value
    ))
}

// mirrors the unique indexes MongoStore creates on users
fn check_unique(users: &[User], candidate: &User) -> Result<(), ThoughtnetError> {
    for user in users.iter().filter(|user| user.id != candidate.id) {
        if user.username == candidate.username {
            return Err(duplicate_key("username", &candidate.username));
        }
        if user.email == candidate.email {
            return Err(duplicate_key("email", &candidate.email));
        }
    }
    Ok(())
}

impl MemoryStore {
    async fn modify_user<F>(&self, id: &ObjectId, modify: F) -> Option<User>
    where
        F: FnOnce(&mut User) + Send,
    {
        let mut users = self.users.write().await;
        let user = users.iter_mut().find(|user| user.id.as_ref() == Some(id))?;
        modify(user);
        Some(user.clone())
    }

    async fn modify_user_by_name<F>(&self, username: &str, modify: F) -> Option<User>
    where
        F: FnOnce(&mut User) + Send,
    {
        let mut users = self.users.write().await;
        let user = users.iter_mut().find(|user| user.username == username)?;
        modify(user);
        Some(user.clone())
    }

    async fn modify_thought<F>(&self, id: &ObjectId, modify: F) -> Option<Thought>
    where
        F: FnOnce(&mut Thought) + Send,
    {
        let mut thoughts = self.thoughts.write().await;
        let thought = thoughts
            .iter_mut()
            .find(|thought| thought.id.as_ref() == Some(id))?;
        modify(thought);
        Some(thought.clone())
    }
}

#[rocket::async_trait]
impl SocialStore for MemoryStore {
    /// USER FUNCTIONS ///

    async fn list_users(&self) -> Result<Vec<User>, ThoughtnetError> {
        Ok(self.users.read().await.clone())
    }

    async fn find_user(&self, id: &ObjectId) -> Result<Option<User>, ThoughtnetError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.id.as_ref() == Some(id)).cloned())
    }

    async fn find_users(&self, ids: &[ObjectId]) -> Result<Vec<User>, ThoughtnetError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|user| user.id.map_or(false, |id| ids.contains(&id)))
            .cloned()
            .collect())
    }

    async fn find_user_conflicts(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        exclude: Option<&ObjectId>,
    ) -> Result<Vec<User>, ThoughtnetError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|user| exclude.is_none() || user.id.as_ref() != exclude)
            .filter(|user| {
                username == Some(user.username.as_str()) || email == Some(user.email.as_str())
            })
            .cloned()
            .collect())
    }

    async fn insert_user(&self, user: &User) -> Result<ObjectId, ThoughtnetError> {
        let mut users = self.users.write().await;
        let id = ObjectId::new();
        let mut stored = user.clone();
        stored.id = Some(id);
        check_unique(&users, &stored)?;
        users.push(stored);
        Ok(id)
    }

    async fn update_user(
        &self,
        id: &ObjectId,
        patch: &UserPatch,
    ) -> Result<Option<User>, ThoughtnetError> {
        let mut users = self.users.write().await;
        let index = match users.iter().position(|user| user.id.as_ref() == Some(id)) {
            Some(index) => index,
            None => return Ok(None),
        };
        let mut updated = users[index].clone();
        patch.apply(&mut updated);
        check_unique(&users, &updated)?;
        users[index] = updated.clone();
        Ok(Some(updated))
    }

    async fn delete_user(&self, id: &ObjectId) -> Result<Option<User>, ThoughtnetError> {
        let mut users = self.users.write().await;
        Ok(users
            .iter()
            .position(|user| user.id.as_ref() == Some(id))
            .map(|index| users.remove(index)))
    }

    async fn add_friend(
        &self,
        id: &ObjectId,
        friend: &ObjectId,
    ) -> Result<Option<User>, ThoughtnetError> {
        let friend = *friend;
        Ok(self.modify_user(id, |user| user.add_friend(friend)).await)
    }

    async fn remove_friend(
        &self,
        id: &ObjectId,
        friend: &ObjectId,
    ) -> Result<Option<User>, ThoughtnetError> {
        Ok(self.modify_user(id, |user| user.remove_friend(friend)).await)
    }

    async fn link_thought(
        &self,
        username: &str,
        thought: &ObjectId,
    ) -> Result<Option<User>, ThoughtnetError> {
        let thought = *thought;
        Ok(self
            .modify_user_by_name(username, |user| user.link_thought(thought))
            .await)
    }

    async fn unlink_thought(
        &self,
        username: &str,
        thought: &ObjectId,
    ) -> Result<Option<User>, ThoughtnetError> {
        Ok(self
            .modify_user_by_name(username, |user| user.unlink_thought(thought))
            .await)
    }

    /// THOUGHT FUNCTIONS ///

    async fn list_thoughts(&self) -> Result<Vec<Thought>, ThoughtnetError> {
        Ok(self.thoughts.read().await.clone())
    }

    async fn find_thought(&self, id: &ObjectId) -> Result<Option<Thought>, ThoughtnetError> {
        let thoughts = self.thoughts.read().await;
        Ok(thoughts
            .iter()
            .find(|thought| thought.id.as_ref() == Some(id))
            .cloned())
    }

    async fn find_thoughts(&self, ids: &[ObjectId]) -> Result<Vec<Thought>, ThoughtnetError> {
        let thoughts = self.thoughts.read().await;
        Ok(thoughts
            .iter()
            .filter(|thought| thought.id.map_or(false, |id| ids.contains(&id)))
            .cloned()
            .collect())
    }

    async fn insert_thought(&self, thought: &Thought) -> Result<ObjectId, ThoughtnetError> {
        let id = ObjectId::new();
        let mut stored = thought.clone();
        stored.id = Some(id);
        self.thoughts.write().await.push(stored);
        Ok(id)
    }

    async fn update_thought(
        &self,
        id: &ObjectId,
        patch: &ThoughtPatch,
    ) -> Result<Option<Thought>, ThoughtnetError> {
        Ok(self.modify_thought(id, |thought| patch.apply(thought)).await)
    }

    async fn delete_thought(&self, id: &ObjectId) -> Result<Option<Thought>, ThoughtnetError> {
        let mut thoughts = self.thoughts.write().await;
        Ok(thoughts
            .iter()
            .position(|thought| thought.id.as_ref() == Some(id))
            .map(|index| thoughts.remove(index)))
    }

    async fn delete_thoughts(&self, ids: &[ObjectId]) -> Result<u64, ThoughtnetError> {
        let mut thoughts = self.thoughts.write().await;
        let before = thoughts.len();
        thoughts.retain(|thought| !thought.id.map_or(false, |id| ids.contains(&id)));
        Ok((before - thoughts.len()) as u64)
    }

    async fn push_reaction(
        &self,
        id: &ObjectId,
        reaction: &Reaction,
    ) -> Result<Option<Thought>, ThoughtnetError> {
        let reaction = reaction.clone();
        Ok(self
            .modify_thought(id, |thought| thought.reactions.push(reaction))
            .await)
    }

    async fn pull_reaction(
        &self,
        id: &ObjectId,
        reaction_id: &ObjectId,
    ) -> Result<Option<Thought>, ThoughtnetError> {
        Ok(self
            .modify_thought(id, |thought| {
                thought
                    .reactions
                    .retain(|reaction| &reaction.reaction_id != reaction_id)
            })
            .await)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn user(username: &str) -> User {
        User::new(username.to_string(), format!("{}@x.io", username))
    }

    #[tokio::test]
    async fn test_insert_enforces_unique_username_and_email() {
        let store = MemoryStore::default();
        store.insert_user(&user("ana")).await.unwrap();

        let err = store.insert_user(&user("ana")).await.unwrap_err();
        assert!(err.is_client_error());

        let mut same_email = user("bo");
        same_email.email = "ana@x.io".to_string();
        assert!(store.insert_user(&same_email).await.is_err());
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_cannot_steal_username() {
        let store = MemoryStore::default();
        store.insert_user(&user("ana")).await.unwrap();
        let bo = store.insert_user(&user("bo")).await.unwrap();
        let patch = UserPatch {
            username: Some("ana".to_string()),
            email: None,
        };
        assert!(store.update_user(&bo, &patch).await.is_err());
        let unchanged = store.find_user(&bo).await.unwrap().unwrap();
        assert_eq!(unchanged.username, "bo");
    }

    #[tokio::test]
    async fn test_link_thought_by_username() {
        let store = MemoryStore::default();
        store.insert_user(&user("ana")).await.unwrap();
        let thought = ObjectId::new();
        store.link_thought("ana", &thought).await.unwrap();
        let linked = store.link_thought("ana", &thought).await.unwrap().unwrap();
        assert_eq!(linked.thoughts.len(), 1);
        assert!(store.link_thought("nobody", &thought).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_thoughts_by_id_set() {
        let store = MemoryStore::default();
        let first = store
            .insert_thought(&Thought::new("one".to_string(), "ana".to_string()))
            .await
            .unwrap();
        let second = store
            .insert_thought(&Thought::new("two".to_string(), "ana".to_string()))
            .await
            .unwrap();
        let kept = store
            .insert_thought(&Thought::new("three".to_string(), "bo".to_string()))
            .await
            .unwrap();
        let deleted = store
            .delete_thoughts(&[first, second, ObjectId::new()])
            .await
            .unwrap();
        assert_eq!(deleted, 2);
        let remaining = store.list_thoughts().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, Some(kept));
    }
}
