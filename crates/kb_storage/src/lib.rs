use std::time::Duration;

pub mod backends;

pub use backends::*;

/// How long an article handed between pages stays claimable.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

pub mod prelude {
    pub use super::backends::*;
    pub use kb_core::{SessionId, SessionStore};
}
