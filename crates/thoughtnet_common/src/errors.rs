use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ThoughtnetError {
    Validation(String),
    InvalidId(String),
    UserNotFound,
    ThoughtNotFound,
    MongoError(String),
    SerdeError(String),
    ConfigError(String),
    InternalError,
}

impl ThoughtnetError {
    /// True for errors caused by the request itself rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ThoughtnetError::Validation(_) | ThoughtnetError::InvalidId(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ThoughtnetError::UserNotFound | ThoughtnetError::ThoughtNotFound
        )
    }
}

impl std::fmt::Display for ThoughtnetError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ThoughtnetError::Validation(msg) => write!(f, "{}", msg),
            ThoughtnetError::InvalidId(id) => write!(f, "Invalid id: {}", id),
            ThoughtnetError::UserNotFound => write!(f, "No user found with this id!"),
            ThoughtnetError::ThoughtNotFound => write!(f, "No thought found with this id!"),
            ThoughtnetError::MongoError(msg) => write!(f, "Mongo error: {}", msg),
            ThoughtnetError::SerdeError(msg) => write!(f, "Failed to (de)serialize {}", msg),
            ThoughtnetError::ConfigError(msg) => write!(f, "Invalid configuration: {}", msg),
            ThoughtnetError::InternalError => write!(f, "Unknown internal server error"),
        }
    }
}

impl std::error::Error for ThoughtnetError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_config_error_is_a_server_fault() {
        let err = ThoughtnetError::ConfigError("bad backend".to_string());
        assert!(!err.is_client_error());
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "Invalid configuration: bad backend");
    }
}
