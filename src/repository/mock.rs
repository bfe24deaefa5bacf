//! Mock repository implementations for isolating services in tests.

use std::collections::HashMap;

use mockall::mock;

use crate::domain::campaign::{Campaign, NewCampaign, UpdateCampaign};
use crate::domain::campaign_type::{CampaignType, NewCampaignType, UpdateCampaignType};
use crate::domain::inquiry::{Inquiry, InquiryAnswer, NewInquiry, UpdateInquiry};
use crate::domain::interaction::{Interaction, NewInteraction};
use crate::domain::role::{NewRole, Permission, Role, UpdateRole};
use crate::domain::task::{
    BoardTask, FollowUpTask, NewFollowUpTask, NewRegularTask, RegularTask, TaskRef,
    UpdateFollowUpTask, UpdateRegularTask,
};
use crate::domain::types::{
    CampaignId, CampaignTypeId, HubId, InquiryId, RoleId, Stage, TaskId, TaskStatus, UserEmail,
    UserId,
};
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    CampaignListQuery, CampaignReader, CampaignTypeReader, CampaignTypeWriter, CampaignWriter,
    FollowUpTaskListQuery, InquiryListQuery, InquiryReader, InquiryWriter, RegularTaskListQuery,
    RoleReader, RoleWriter, TaskReader, TaskWriter, UserListQuery, UserReader, UserWriter,
};

mock! {
    pub Repository {}

    impl CampaignTypeReader for Repository {
        fn list_campaign_types(&self, hub_id: HubId) -> RepositoryResult<Vec<CampaignType>>;
        fn get_campaign_type_by_id(
            &self,
            id: CampaignTypeId,
            hub_id: HubId,
        ) -> RepositoryResult<Option<CampaignType>>;
    }

    impl CampaignTypeWriter for Repository {
        fn create_campaign_type(&self, new: &NewCampaignType) -> RepositoryResult<CampaignType>;
        fn update_campaign_type(
            &self,
            id: CampaignTypeId,
            hub_id: HubId,
            updates: &UpdateCampaignType,
        ) -> RepositoryResult<CampaignType>;
        fn delete_campaign_type(&self, id: CampaignTypeId, hub_id: HubId) -> RepositoryResult<()>;
    }

    impl CampaignReader for Repository {
        fn list_campaigns(
            &self,
            query: CampaignListQuery,
        ) -> RepositoryResult<(usize, Vec<Campaign>)>;
        fn get_campaign_by_id(
            &self,
            id: CampaignId,
            hub_id: HubId,
        ) -> RepositoryResult<Option<Campaign>>;
        fn count_inquiries_by_campaign(
            &self,
            hub_id: HubId,
            campaign_ids: &[CampaignId],
        ) -> RepositoryResult<HashMap<CampaignId, usize>>;
    }

    impl CampaignWriter for Repository {
        fn create_campaign(&self, new: &NewCampaign) -> RepositoryResult<Campaign>;
        fn update_campaign(
            &self,
            id: CampaignId,
            hub_id: HubId,
            updates: &UpdateCampaign,
        ) -> RepositoryResult<Campaign>;
        fn delete_campaign(&self, id: CampaignId, hub_id: HubId) -> RepositoryResult<()>;
    }

    impl InquiryReader for Repository {
        fn list_inquiries(
            &self,
            query: InquiryListQuery,
        ) -> RepositoryResult<(usize, Vec<Inquiry>)>;
        fn get_inquiry_by_id(
            &self,
            id: InquiryId,
            hub_id: HubId,
        ) -> RepositoryResult<Option<Inquiry>>;
        fn list_inquiry_answers(
            &self,
            inquiry_id: InquiryId,
        ) -> RepositoryResult<Vec<InquiryAnswer>>;
        fn list_interactions(&self, inquiry_id: InquiryId) -> RepositoryResult<Vec<Interaction>>;
    }

    impl InquiryWriter for Repository {
        fn create_inquiry(&self, new: &NewInquiry) -> RepositoryResult<Inquiry>;
        fn update_inquiry(
            &self,
            id: InquiryId,
            hub_id: HubId,
            updates: &UpdateInquiry,
        ) -> RepositoryResult<Inquiry>;
        fn set_inquiry_stage(
            &self,
            id: InquiryId,
            hub_id: HubId,
            stage: Stage,
            history: &NewInteraction,
        ) -> RepositoryResult<Inquiry>;
        fn create_interaction(&self, new: &NewInteraction) -> RepositoryResult<Interaction>;
        fn trash_inquiry(&self, id: InquiryId, hub_id: HubId) -> RepositoryResult<Inquiry>;
        fn restore_inquiry(&self, id: InquiryId, hub_id: HubId) -> RepositoryResult<Inquiry>;
        fn purge_inquiry(&self, id: InquiryId, hub_id: HubId) -> RepositoryResult<()>;
    }

    impl TaskReader for Repository {
        fn list_follow_up_tasks(
            &self,
            query: FollowUpTaskListQuery,
        ) -> RepositoryResult<Vec<FollowUpTask>>;
        fn list_regular_tasks(
            &self,
            query: RegularTaskListQuery,
        ) -> RepositoryResult<Vec<RegularTask>>;
        fn get_follow_up_task_by_id(
            &self,
            id: TaskId,
            hub_id: HubId,
        ) -> RepositoryResult<Option<FollowUpTask>>;
        fn get_regular_task_by_id(
            &self,
            id: TaskId,
            hub_id: HubId,
        ) -> RepositoryResult<Option<RegularTask>>;
    }

    impl TaskWriter for Repository {
        fn create_follow_up_task(&self, new: &NewFollowUpTask) -> RepositoryResult<FollowUpTask>;
        fn update_follow_up_task(
            &self,
            id: TaskId,
            hub_id: HubId,
            updates: &UpdateFollowUpTask,
        ) -> RepositoryResult<FollowUpTask>;
        fn create_regular_task(&self, new: &NewRegularTask) -> RepositoryResult<RegularTask>;
        fn update_regular_task(
            &self,
            id: TaskId,
            hub_id: HubId,
            updates: &UpdateRegularTask,
        ) -> RepositoryResult<RegularTask>;
        fn set_task_status(
            &self,
            task: TaskRef,
            hub_id: HubId,
            status: TaskStatus,
        ) -> RepositoryResult<BoardTask>;
        fn delete_task(&self, task: TaskRef, hub_id: HubId) -> RepositoryResult<()>;
    }

    impl UserReader for Repository {
        fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
        fn get_user_by_id(&self, id: UserId, hub_id: HubId) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(
            &self,
            email: &UserEmail,
            hub_id: HubId,
        ) -> RepositoryResult<Option<User>>;
    }

    impl UserWriter for Repository {
        fn create_user(&self, new: &NewUser) -> RepositoryResult<User>;
        fn update_user(
            &self,
            id: UserId,
            hub_id: HubId,
            updates: &UpdateUser,
        ) -> RepositoryResult<User>;
        fn delete_user(&self, id: UserId, hub_id: HubId) -> RepositoryResult<()>;
    }

    impl RoleReader for Repository {
        fn list_roles(&self, hub_id: HubId) -> RepositoryResult<Vec<Role>>;
        fn get_role_by_id(&self, id: RoleId, hub_id: HubId) -> RepositoryResult<Option<Role>>;
        fn list_permissions(&self) -> RepositoryResult<Vec<Permission>>;
        fn count_users_with_role(&self, id: RoleId) -> RepositoryResult<usize>;
    }

    impl RoleWriter for Repository {
        fn create_role(&self, new: &NewRole) -> RepositoryResult<Role>;
        fn update_role(
            &self,
            id: RoleId,
            hub_id: HubId,
            updates: &UpdateRole,
        ) -> RepositoryResult<Role>;
        fn delete_role(&self, id: RoleId, hub_id: HubId) -> RepositoryResult<()>;
    }
}
