use bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// A document type stored in its own collection
pub trait Model {
    const COLLECTION: &'static str;
}

/**
 * A reference to a document of type `M` living in `M::COLLECTION`
 * @notice - stored as a bare ObjectId so the store can use set operators
 *           ($addToSet, $pull, $in) directly on arrays of references
 */
pub struct Ref<M> {
    id: ObjectId,
    model: PhantomData<fn() -> M>,
}

impl<M> Ref<M> {
    pub fn new(id: ObjectId) -> Self {
        Self {
            id,
            model: PhantomData,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }
}

impl<M: Model> Ref<M> {
    pub fn collection(&self) -> &'static str {
        M::COLLECTION
    }
}

impl<M> From<ObjectId> for Ref<M> {
    fn from(id: ObjectId) -> Self {
        Ref::new(id)
    }
}

impl<M> Clone for Ref<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for Ref<M> {}

impl<M> PartialEq for Ref<M> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<M> Eq for Ref<M> {}

impl<M> PartialEq<ObjectId> for Ref<M> {
    fn eq(&self, other: &ObjectId) -> bool {
        &self.id == other
    }
}

impl<M> Hash for Ref<M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<M: Model> fmt::Debug for Ref<M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Ref({}/{})", M::COLLECTION, self.id.to_hex())
    }
}

impl<M: Model> fmt::Display for Ref<M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", M::COLLECTION, self.id.to_hex())
    }
}

impl<M> Serialize for Ref<M> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.id.serialize(serializer)
    }
}

impl<'de, M> Deserialize<'de> for Ref<M> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ObjectId::deserialize(deserializer).map(Ref::new)
    }
}
