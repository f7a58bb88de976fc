//! Activity log entities.

pub mod kind;
pub mod model;

pub use kind::ActivityType;
pub use model::{ActivityFilter, ActivityLog, NewActivityLog};
