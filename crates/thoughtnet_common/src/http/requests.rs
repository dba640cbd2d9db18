use serde::{Deserialize, Deserializer, Serialize};

// Every field is optional so missing values surface as validation errors
// instead of body parse failures

/// Keeps an explicit `null` apart from an absent field: absent stays None, null becomes Some(None)
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub username: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateThoughtRequest {
    pub thought_text: Option<String>,
    pub username: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateThoughtRequest {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub thought_text: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub username: Option<Option<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewReactionRequest {
    pub reaction_body: Option<String>,
    pub username: Option<String>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_update_tells_null_from_absent() {
        let request: UpdateUserRequest =
            serde_json::from_str(r#"{ "username": null }"#).unwrap();
        assert_eq!(request.username, Some(None));
        assert_eq!(request.email, None);

        let request: UpdateThoughtRequest =
            serde_json::from_str(r#"{ "thoughtText": "edited" }"#).unwrap();
        assert_eq!(request.thought_text, Some(Some("edited".to_string())));
        assert_eq!(request.username, None);
    }
}
