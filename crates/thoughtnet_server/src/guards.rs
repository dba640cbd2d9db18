use mongodb::bson::oid::ObjectId;
use rocket::request::FromParam;
use thoughtnet_common::errors::ThoughtnetError;
use thoughtnet_common::utils::parse_object_id;

/// A path segment holding a document id
///
/// Routes take `Result<DocumentId, ThoughtnetError>` so a malformed id reaches the
/// handler as a 400 instead of being forwarded to the 404 catcher
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentId(pub ObjectId);

impl<'a> FromParam<'a> for DocumentId {
    type Error = ThoughtnetError;

    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        parse_object_id(param).map(DocumentId)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_document_id_from_param() {
        let id = ObjectId::new();
        assert_eq!(DocumentId::from_param(&id.to_hex()).unwrap(), DocumentId(id));
        assert_eq!(
            DocumentId::from_param("123").unwrap_err(),
            ThoughtnetError::InvalidId("123".to_string())
        );
    }
}
