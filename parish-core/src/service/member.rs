use crate::{
    models::{AddGroupMemberRequest, GroupId, GroupMember, GroupRole, Member, MemberId},
    repository::{GroupMemberRepository, GroupRepository, MemberRepository},
    Error, Result,
};

/// Directory members and group memberships.
#[derive(Clone)]
pub struct MemberService {
    member_repo: MemberRepository,
    group_repo: GroupRepository,
    group_member_repo: GroupMemberRepository,
}

impl MemberService {
    pub fn new(
        member_repo: MemberRepository,
        group_repo: GroupRepository,
        group_member_repo: GroupMemberRepository,
    ) -> Self {
        Self {
            member_repo,
            group_repo,
            group_member_repo,
        }
    }

    pub async fn create_member(
        &self,
        full_name: String,
        email: Option<String>,
        phone: Option<String>,
    ) -> Result<Member> {
        if full_name.trim().is_empty() {
            return Err(Error::InvalidInput("Member name is required".to_string()));
        }

        let member = Member {
            id: MemberId::new(),
            full_name,
            email,
            phone,
            created_at: chrono::Utc::now(),
        };
        self.member_repo.create(&member).await
    }

    pub async fn get_member(&self, member_id: &MemberId) -> Result<Member> {
        self.member_repo
            .get_by_id(member_id)
            .await?
            .ok_or_else(|| Error::NotFound("Member not found".to_string()))
    }

    /// Add a member to a group with a role. The member must already exist
    /// in the directory; re-adding an ended membership reactivates it.
    pub async fn add_group_member(
        &self,
        group_id: &GroupId,
        request: AddGroupMemberRequest,
    ) -> Result<GroupMember> {
        if !self.group_repo.exists(group_id).await? {
            return Err(Error::NotFound("Group not found".to_string()));
        }
        self.get_member(&request.member_id).await?;

        let mut membership =
            GroupMember::new(group_id.clone(), request.member_id, request.role);
        membership.custom_role_title = request.custom_role_title;
        membership.permissions = request.permissions;

        let added = self.group_member_repo.add(&membership).await?;

        tracing::info!(
            group_id = %added.group_id,
            member_id = %added.member_id,
            role = %added.role,
            "Group membership added"
        );
        Ok(added)
    }

    pub async fn list_group_members(&self, group_id: &GroupId) -> Result<Vec<GroupMember>> {
        self.group_member_repo.list_by_group(group_id).await
    }

    pub async fn list_member_roles(
        &self,
        group_id: &GroupId,
        member_id: &MemberId,
    ) -> Result<Vec<GroupMember>> {
        self.group_member_repo
            .list_current_for_member(group_id, member_id)
            .await
    }

    /// End a membership (soft delete). The row survives for history.
    pub async fn end_membership(
        &self,
        group_id: &GroupId,
        member_id: &MemberId,
        role: GroupRole,
    ) -> Result<()> {
        let ended = self
            .group_member_repo
            .end_membership(group_id, member_id, role)
            .await?;
        if !ended {
            return Err(Error::NotFound("Membership not found".to_string()));
        }

        tracing::info!(
            group_id = %group_id,
            member_id = %member_id,
            role = %role,
            "Group membership ended"
        );
        Ok(())
    }
}
