pub mod analytics;
pub mod comments;
pub mod mentions;
pub mod moderation;
pub mod permissions;
pub mod positions;
pub mod resolution;
