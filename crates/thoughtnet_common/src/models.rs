mod reference;
mod thought;
mod user;

pub use reference::{Model, Ref};
pub use thought::{Reaction, Thought, ThoughtPatch};
pub use user::{User, UserPatch};
