//! Domain services.
//!
//! Services compose repositories (and the role-permission cache) into the
//! operations the HTTP layer exposes. Repositories own SQL; services own
//! ordering, precedence, and cross-aggregate rules.

pub mod event;
pub mod group;
pub mod member;
pub mod permission;
pub mod registration;

pub use event::{EventService, EventSummary};
pub use group::GroupService;
pub use member::MemberService;
pub use permission::PermissionService;
pub use registration::RegistrationService;
