pub mod errors;
pub mod http;
pub mod models;
pub mod utils;
pub mod validation;

pub const MIN_THOUGHT_CHARS: usize = 1;
pub const MAX_THOUGHT_CHARS: usize = 280;
pub const MIN_REACTION_CHARS: usize = 1;
pub const MAX_REACTION_CHARS: usize = 280;
