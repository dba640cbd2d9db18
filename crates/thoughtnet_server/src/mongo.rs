use crate::store::SocialStore;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use mongodb::error::{Error as MongoDriverError, ErrorKind, WriteFailure};
use mongodb::options::{
    ClientOptions, FindOneAndUpdateOptions, IndexOptions, ReturnDocument, ServerApi,
    ServerApiVersion,
};
use mongodb::{Client, Collection, IndexModel};
use thoughtnet_common::errors::ThoughtnetError;
use thoughtnet_common::models::{Model, Reaction, Thought, ThoughtPatch, User, UserPatch};
use tracing::{debug, error, info};

const DUPLICATE_KEY: i32 = 11000;

pub struct MongoStore {
    users: Collection<User>,
    thoughts: Collection<Thought>,
}

impl MongoStore {
    /**
     * Connect to mongodb and ensure the unique indexes on users exist
     *
     * @param uri - the mongodb connection string
     * @param database_name - the database holding the users and thoughts collections
     * @returns - the connected store, or a MongoError if the server is unreachable
     */
    pub async fn init(uri: &str, database_name: &str) -> Result<Self, ThoughtnetError> {
        let mut client_options = ClientOptions::parse(uri).await.map_err(mongo_error)?;
        let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
        client_options.server_api = Some(server_api);
        let client = Client::with_options(client_options).map_err(mongo_error)?;
        let db = client.database(database_name);
        let store = Self {
            users: db.collection(User::COLLECTION),
            thoughts: db.collection(Thought::COLLECTION),
        };
        store.create_indexes().await?;
        Ok(store)
    }

    async fn create_indexes(&self) -> Result<(), ThoughtnetError> {
        for field in ["username", "email"] {
            let mut keys = Document::new();
            keys.insert(field, 1);
            let index = IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(true).build())
                .build();
            self.users
                .create_index(index, None)
                .await
                .map_err(mongo_error)?;
            info!("Ensured unique index on users.{}", field);
        }
        Ok(())
    }

    fn return_updated() -> FindOneAndUpdateOptions {
        FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build()
    }

    async fn update_user_where(
        &self,
        filter: Document,
        update: Document,
    ) -> Result<Option<User>, ThoughtnetError> {
        self.users
            .find_one_and_update(filter, update, Self::return_updated())
            .await
            .map_err(mongo_error)
    }

    async fn update_thought_where(
        &self,
        filter: Document,
        update: Document,
    ) -> Result<Option<Thought>, ThoughtnetError> {
        self.thoughts
            .find_one_and_update(filter, update, Self::return_updated())
            .await
            .map_err(mongo_error)
    }
}

fn is_duplicate_key(err: &MongoDriverError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

/// Map a driver error, treating unique index violations as validation failures
fn mongo_error(err: MongoDriverError) -> ThoughtnetError {
    if is_duplicate_key(&err) {
        return ThoughtnetError::Validation(format!("Duplicate key: {}", err));
    }
    error!("Mongo error: {}", err);
    ThoughtnetError::MongoError(err.to_string())
}

fn inserted_id(id: bson::Bson) -> Result<ObjectId, ThoughtnetError> {
    id.as_object_id().ok_or(ThoughtnetError::InternalError)
}

#[rocket::async_trait]
impl SocialStore for MongoStore {
    /// USER FUNCTIONS ///

    async fn list_users(&self) -> Result<Vec<User>, ThoughtnetError> {
        let cursor = self.users.find(None, None).await.map_err(mongo_error)?;
        cursor.try_collect().await.map_err(mongo_error)
    }

    async fn find_user(&self, id: &ObjectId) -> Result<Option<User>, ThoughtnetError> {
        self.users
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(mongo_error)
    }

    async fn find_users(&self, ids: &[ObjectId]) -> Result<Vec<User>, ThoughtnetError> {
        let filter = doc! { "_id": { "$in": ids } };
        let cursor = self.users.find(filter, None).await.map_err(mongo_error)?;
        cursor.try_collect().await.map_err(mongo_error)
    }

    async fn find_user_conflicts(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        exclude: Option<&ObjectId>,
    ) -> Result<Vec<User>, ThoughtnetError> {
        let mut or = vec![];
        if let Some(username) = username {
            or.push(doc! { "username": username });
        }
        if let Some(email) = email {
            or.push(doc! { "email": email });
        }
        if or.is_empty() {
            return Ok(vec![]);
        }
        let mut filter = doc! { "$or": or };
        if let Some(exclude) = exclude {
            filter.insert("_id", doc! { "$ne": exclude });
        }
        let cursor = self.users.find(filter, None).await.map_err(mongo_error)?;
        cursor.try_collect().await.map_err(mongo_error)
    }

    async fn insert_user(&self, user: &User) -> Result<ObjectId, ThoughtnetError> {
        let result = self
            .users
            .insert_one(user, None)
            .await
            .map_err(mongo_error)?;
        let id = inserted_id(result.inserted_id)?;
        debug!("Inserted user {} ({})", user.username, id);
        Ok(id)
    }

    async fn update_user(
        &self,
        id: &ObjectId,
        patch: &UserPatch,
    ) -> Result<Option<User>, ThoughtnetError> {
        if patch.is_empty() {
            return self.find_user(id).await;
        }
        let update = doc! { "$set": patch.to_set_document() };
        self.update_user_where(doc! { "_id": id }, update).await
    }

    async fn delete_user(&self, id: &ObjectId) -> Result<Option<User>, ThoughtnetError> {
        self.users
            .find_one_and_delete(doc! { "_id": id }, None)
            .await
            .map_err(mongo_error)
    }

    async fn add_friend(
        &self,
        id: &ObjectId,
        friend: &ObjectId,
    ) -> Result<Option<User>, ThoughtnetError> {
        let update = doc! { "$addToSet": { "friends": friend } };
        self.update_user_where(doc! { "_id": id }, update).await
    }

    async fn remove_friend(
        &self,
        id: &ObjectId,
        friend: &ObjectId,
    ) -> Result<Option<User>, ThoughtnetError> {
        let update = doc! { "$pull": { "friends": friend } };
        self.update_user_where(doc! { "_id": id }, update).await
    }

    async fn link_thought(
        &self,
        username: &str,
        thought: &ObjectId,
    ) -> Result<Option<User>, ThoughtnetError> {
        let update = doc! { "$addToSet": { "thoughts": thought } };
        self.update_user_where(doc! { "username": username }, update)
            .await
    }

    async fn unlink_thought(
        &self,
        username: &str,
        thought: &ObjectId,
    ) -> Result<Option<User>, ThoughtnetError> {
        let update = doc! { "$pull": { "thoughts": thought } };
        self.update_user_where(doc! { "username": username }, update)
            .await
    }

    /// THOUGHT FUNCTIONS ///

    async fn list_thoughts(&self) -> Result<Vec<Thought>, ThoughtnetError> {
        let cursor = self.thoughts.find(None, None).await.map_err(mongo_error)?;
        cursor.try_collect().await.map_err(mongo_error)
    }

    async fn find_thought(&self, id: &ObjectId) -> Result<Option<Thought>, ThoughtnetError> {
        self.thoughts
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(mongo_error)
    }

    async fn find_thoughts(&self, ids: &[ObjectId]) -> Result<Vec<Thought>, ThoughtnetError> {
        let filter = doc! { "_id": { "$in": ids } };
        let cursor = self.thoughts.find(filter, None).await.map_err(mongo_error)?;
        cursor.try_collect().await.map_err(mongo_error)
    }

    async fn insert_thought(&self, thought: &Thought) -> Result<ObjectId, ThoughtnetError> {
        let result = self
            .thoughts
            .insert_one(thought, None)
            .await
            .map_err(mongo_error)?;
        let id = inserted_id(result.inserted_id)?;
        debug!("Inserted thought {} by {}", id, thought.username);
        Ok(id)
    }

    async fn update_thought(
        &self,
        id: &ObjectId,
        patch: &ThoughtPatch,
    ) -> Result<Option<Thought>, ThoughtnetError> {
        if patch.is_empty() {
            return self.find_thought(id).await;
        }
        let update = doc! { "$set": patch.to_set_document() };
        self.update_thought_where(doc! { "_id": id }, update).await
    }

    async fn delete_thought(&self, id: &ObjectId) -> Result<Option<Thought>, ThoughtnetError> {
        self.thoughts
            .find_one_and_delete(doc! { "_id": id }, None)
            .await
            .map_err(mongo_error)
    }

    async fn delete_thoughts(&self, ids: &[ObjectId]) -> Result<u64, ThoughtnetError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let filter = doc! { "_id": { "$in": ids } };
        let result = self
            .thoughts
            .delete_many(filter, None)
            .await
            .map_err(mongo_error)?;
        Ok(result.deleted_count)
    }

    async fn push_reaction(
        &self,
        id: &ObjectId,
        reaction: &Reaction,
    ) -> Result<Option<Thought>, ThoughtnetError> {
        let reaction = bson::to_bson(reaction)
            .map_err(|_| ThoughtnetError::SerdeError(String::from("Reaction")))?;
        let update = doc! { "$push": { "reactions": reaction } };
        self.update_thought_where(doc! { "_id": id }, update).await
    }

    async fn pull_reaction(
        &self,
        id: &ObjectId,
        reaction_id: &ObjectId,
    ) -> Result<Option<Thought>, ThoughtnetError> {
        let update = doc! { "$pull": { "reactions": { "reactionId": reaction_id } } };
        self.update_thought_where(doc! { "_id": id }, update).await
    }
}
