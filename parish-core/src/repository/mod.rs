//! Database repositories.
//!
//! Each repository wraps a `PgPool` and exposes the SQL for one aggregate.
//! Multi-statement writes (counter maintenance, template replacement) go
//! through [`crate::transaction::with_transaction`].

pub mod event;
pub mod group;
pub mod member;
pub mod permission;
pub mod registration;

pub use event::GroupEventRepository;
pub use group::GroupRepository;
pub use member::{GroupMemberRepository, MemberRepository};
pub use permission::{PermissionRepository, RolePermissionRepository};
pub use registration::EventRegistrationRepository;
