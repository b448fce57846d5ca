//! Domain entities, one row each in the relational store.

pub mod activity;
pub mod child;
pub mod family;
pub mod milestone;
pub mod plan;
pub mod records;
pub mod user;

pub use activity::{Activity, ActivityLog};
pub use child::{age_in_months, format_age, Child};
pub use family::{Family, FamilyMember};
pub use milestone::Milestone;
pub use plan::ParentingPlan;
pub use records::{AuditLog, ChildAssessment, ContentItem, Notification};
pub use user::User;
