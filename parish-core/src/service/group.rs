use crate::{
    models::{CreateGroupRequest, Group, GroupId},
    repository::GroupRepository,
    service::PermissionService,
    Error, Result,
};

/// Group lifecycle. Creating a group also seeds its default role
/// permission templates so new groups are usable without manual
/// configuration.
#[derive(Clone)]
pub struct GroupService {
    group_repo: GroupRepository,
    permission_service: PermissionService,
}

impl GroupService {
    pub fn new(group_repo: GroupRepository, permission_service: PermissionService) -> Self {
        Self {
            group_repo,
            permission_service,
        }
    }

    pub async fn create_group(&self, request: CreateGroupRequest) -> Result<Group> {
        if request.name.trim().is_empty() {
            return Err(Error::InvalidInput("Group name is required".to_string()));
        }

        let mut group = Group::new(request.name, request.group_type);
        group.parent_id = request.parent_id;
        group.leader_id = request.leader_id;

        let created = self.group_repo.create(&group).await?;
        self.permission_service
            .initialize_default_role_permissions(&created.id)
            .await?;

        tracing::info!(group_id = %created.id, name = %created.name, "Group created");
        Ok(created)
    }

    pub async fn get_group(&self, group_id: &GroupId) -> Result<Group> {
        self.group_repo
            .get_by_id(group_id)
            .await?
            .ok_or_else(|| Error::NotFound("Group not found".to_string()))
    }
}
