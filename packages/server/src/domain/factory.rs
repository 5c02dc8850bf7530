//! Domain factories for creating value objects.

use super::ObjectId;

/// Well-known object id under which the chat registry is exported.
pub const REGISTRY_OBJECT_ID: &str = "ChatRegistry";

/// Factory for generating ObjectId instances.
///
/// This factory encapsulates the logic for generating new object identifiers,
/// separating the generation concern from the validation logic in ObjectId.
pub struct ObjectIdFactory;

impl ObjectIdFactory {
    /// Generate a new ObjectId with a random UUID v4.
    pub fn generate() -> ObjectId {
        ObjectId::from_uuid(uuid::Uuid::new_v4())
    }

    /// The id the chat registry is published under.
    pub fn registry() -> ObjectId {
        ObjectId::well_known(REGISTRY_OBJECT_ID)
    }
}
