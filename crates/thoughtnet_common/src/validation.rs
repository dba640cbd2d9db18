use crate::errors::ThoughtnetError;
use crate::http::requests::{
    CreateThoughtRequest, CreateUserRequest, NewReactionRequest, UpdateThoughtRequest,
    UpdateUserRequest,
};
use crate::models::{Reaction, Thought, ThoughtPatch, User, UserPatch};
use crate::{MAX_REACTION_CHARS, MAX_THOUGHT_CHARS, MIN_REACTION_CHARS, MIN_THOUGHT_CHARS};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_PATTERN: Regex = Regex::new(
        r"^[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*@[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*(\.[A-Za-z0-9_]{2,3})+$"
    )
    .expect("email pattern compiles");
}

pub const INVALID_EMAIL: &str = "Please enter a valid email address";

/// Collects every field violation of one document before failing
#[derive(Debug)]
pub struct Violations {
    model: &'static str,
    errors: Vec<(&'static str, String)>,
}

impl Violations {
    pub fn new(model: &'static str) -> Self {
        Self {
            model,
            errors: vec![],
        }
    }

    pub fn push(&mut self, field: &'static str, message: String) {
        self.errors.push((field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_error(self) -> ThoughtnetError {
        let fields = self
            .errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<String>>()
            .join(", ");
        ThoughtnetError::Validation(format!("{} validation failed: {}", self.model, fields))
    }

    pub fn finish(self) -> Result<(), ThoughtnetError> {
        match self.is_empty() {
            true => Ok(()),
            false => Err(self.into_error()),
        }
    }
}

fn required(violations: &mut Violations, field: &'static str, value: Option<&str>) -> bool {
    match value {
        Some(value) if !value.is_empty() => true,
        _ => {
            violations.push(field, format!("Path `{}` is required.", field));
            false
        }
    }
}

fn check_length(
    violations: &mut Violations,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> bool {
    let chars = value.chars().count();
    if chars < min || chars > max {
        violations.push(
            field,
            format!(
                "Path `{}` must be between {} and {} characters.",
                field, min, max
            ),
        );
        return false;
    }
    true
}

/// Usernames are trimmed before any other check
fn check_username(violations: &mut Violations, value: Option<&str>) -> Option<String> {
    let trimmed = value.map(str::trim);
    match required(violations, "username", trimmed) {
        true => trimmed.map(String::from),
        false => None,
    }
}

fn check_email(violations: &mut Violations, value: Option<&str>) -> Option<String> {
    if !required(violations, "email", value) {
        return None;
    }
    let email = value?;
    match EMAIL_PATTERN.is_match(email) {
        true => Some(email.to_string()),
        false => {
            violations.push("email", INVALID_EMAIL.to_string());
            None
        }
    }
}

fn check_text(
    violations: &mut Violations,
    field: &'static str,
    value: Option<&str>,
    min: usize,
    max: usize,
) -> Option<String> {
    if !required(violations, field, value) {
        return None;
    }
    let text = value?;
    match check_length(violations, field, text, min, max) {
        true => Some(text.to_string()),
        false => None,
    }
}

// the author of a thought or reaction is a plain string, only presence is checked
fn check_author(violations: &mut Violations, value: Option<&str>) -> Option<String> {
    match required(violations, "username", value) {
        true => value.map(String::from),
        false => None,
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/**
 * Validate a new user
 *
 * @param request - the raw request body
 * @returns - an unsaved User, or a Validation error naming every bad field
 */
pub fn validate_new_user(request: &CreateUserRequest) -> Result<User, ThoughtnetError> {
    let mut violations = Violations::new("User");
    let username = check_username(&mut violations, request.username.as_deref());
    let email = check_email(&mut violations, request.email.as_deref());
    match (username, email) {
        (Some(username), Some(email)) if violations.is_empty() => Ok(User::new(username, email)),
        _ => Err(violations.into_error()),
    }
}

/**
 * Validate a partial user update
 * @notice - fields present in the patch go through the same checks as on creation
 */
pub fn validate_user_patch(request: &UpdateUserRequest) -> Result<UserPatch, ThoughtnetError> {
    let mut violations = Violations::new("User");
    let mut patch = UserPatch::default();
    // a field sent as null is present and fails `required`
    if let Some(username) = &request.username {
        patch.username = check_username(&mut violations, username.as_deref());
    }
    if let Some(email) = &request.email {
        patch.email = check_email(&mut violations, email.as_deref());
    }
    violations.finish()?;
    Ok(patch)
}

pub fn validate_new_thought(request: &CreateThoughtRequest) -> Result<Thought, ThoughtnetError> {
    let mut violations = Violations::new("Thought");
    let thought_text = check_text(
        &mut violations,
        "thoughtText",
        request.thought_text.as_deref(),
        MIN_THOUGHT_CHARS,
        MAX_THOUGHT_CHARS,
    );
    let username = check_author(&mut violations, request.username.as_deref());
    match (thought_text, username) {
        (Some(thought_text), Some(username)) if violations.is_empty() => {
            Ok(Thought::new(thought_text, username))
        }
        _ => Err(violations.into_error()),
    }
}

pub fn validate_thought_patch(
    request: &UpdateThoughtRequest,
) -> Result<ThoughtPatch, ThoughtnetError> {
    let mut violations = Violations::new("Thought");
    let mut patch = ThoughtPatch::default();
    if let Some(thought_text) = &request.thought_text {
        patch.thought_text = check_text(
            &mut violations,
            "thoughtText",
            thought_text.as_deref(),
            MIN_THOUGHT_CHARS,
            MAX_THOUGHT_CHARS,
        );
    }
    if let Some(username) = &request.username {
        patch.username = check_author(&mut violations, username.as_deref());
    }
    violations.finish()?;
    Ok(patch)
}

pub fn validate_new_reaction(request: &NewReactionRequest) -> Result<Reaction, ThoughtnetError> {
    let mut violations = Violations::new("Reaction");
    let reaction_body = check_text(
        &mut violations,
        "reactionBody",
        request.reaction_body.as_deref(),
        MIN_REACTION_CHARS,
        MAX_REACTION_CHARS,
    );
    let username = check_author(&mut violations, request.username.as_deref());
    match (reaction_body, username) {
        (Some(reaction_body), Some(username)) if violations.is_empty() => {
            Ok(Reaction::new(reaction_body, username))
        }
        _ => Err(violations.into_error()),
    }
}
