pub mod event;
pub mod group;
pub mod id;
pub mod member;
pub mod permission;
pub mod registration;

pub use event::{CreateEventRequest, GroupEvent, RegistrationState};
pub use group::{CreateGroupRequest, Group};
pub use id::{generate_id, EventId, GroupId, MemberId, PermissionId, RegistrationId};
pub use member::{AddGroupMemberRequest, GroupMember, Member, PermissionSource};
pub use permission::{slugs, GroupRole, Permission};
pub use registration::{
    CreateRegistrationRequest, EventRegistration, GuestContact, Registrant, RegistrationStatus,
};
