pub mod builder;
pub mod types;

pub use builder::PresenceBuilder;
pub use types::PresenceUpdate;
