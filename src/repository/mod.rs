use std::collections::HashMap;

use crate::db::{DbConnection, DbPool, get_connection};
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
    CampaignId, CampaignStatus, CampaignTypeId, HubId, InquiryId, RoleId, Stage, TaskId,
    TaskPriority, TaskStatus, UserEmail, UserId,
};
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::repository::errors::RepositoryResult;

pub mod campaign;
pub mod campaign_type;
pub mod errors;
pub mod inquiry;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod role;
pub mod task;
pub mod user;

/// Diesel-backed implementation of every reader and writer trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    /// Pages past the representable range clamp to `i64::MAX`, which
    /// yields an empty page.
    pub fn offset(&self) -> i64 {
        let rows = (self.page.max(1) - 1).saturating_mul(self.per_page);
        i64::try_from(rows).unwrap_or(i64::MAX)
    }
}

/// Escape character used by every `LIKE` pattern.
pub(crate) const LIKE_ESCAPE: char = '\\';

/// Wraps a free-text term into a case-insensitive `LIKE` pattern, with the
/// wildcards of the term itself escaped.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::from("%");
    for c in term.trim().chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(Debug, Clone, PartialEq)]
pub struct CampaignListQuery {
    pub hub_id: HubId,
    pub search: Option<String>,
    pub status: Option<CampaignStatus>,
    pub campaign_type_id: Option<CampaignTypeId>,
    pub pagination: Option<Pagination>,
}

impl CampaignListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            search: None,
            status: None,
            campaign_type_id: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn status(mut self, status: CampaignStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn campaign_type(mut self, campaign_type_id: CampaignTypeId) -> Self {
        self.campaign_type_id = Some(campaign_type_id);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Filters over live inquiries, or over the trash when `trashed` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct InquiryListQuery {
    pub hub_id: HubId,
    pub search: Option<String>,
    pub stage: Option<Stage>,
    pub campaign_id: Option<CampaignId>,
    pub assigned_to: Option<UserId>,
    pub trashed: bool,
    pub pagination: Option<Pagination>,
}

impl InquiryListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            search: None,
            stage: None,
            campaign_id: None,
            assigned_to: None,
            trashed: false,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn campaign(mut self, campaign_id: CampaignId) -> Self {
        self.campaign_id = Some(campaign_id);
        self
    }

    pub fn assigned_to(mut self, user_id: UserId) -> Self {
        self.assigned_to = Some(user_id);
        self
    }

    pub fn trashed(mut self) -> Self {
        self.trashed = true;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FollowUpTaskListQuery {
    pub hub_id: HubId,
    pub inquiry_id: Option<InquiryId>,
    pub assigned_to: Option<UserId>,
    pub status: Option<TaskStatus>,
}

impl FollowUpTaskListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            inquiry_id: None,
            assigned_to: None,
            status: None,
        }
    }

    pub fn inquiry(mut self, inquiry_id: InquiryId) -> Self {
        self.inquiry_id = Some(inquiry_id);
        self
    }

    pub fn assigned_to(mut self, user_id: UserId) -> Self {
        self.assigned_to = Some(user_id);
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegularTaskListQuery {
    pub hub_id: HubId,
    pub assigned_to: Option<UserId>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl RegularTaskListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            assigned_to: None,
            status: None,
            priority: None,
        }
    }

    pub fn assigned_to(mut self, user_id: UserId) -> Self {
        self.assigned_to = Some(user_id);
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserListQuery {
    pub hub_id: HubId,
    pub search: Option<String>,
    pub role_id: Option<RoleId>,
    pub active: Option<bool>,
    pub pagination: Option<Pagination>,
}

impl UserListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            search: None,
            role_id: None,
            active: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn role(mut self, role_id: RoleId) -> Self {
        self.role_id = Some(role_id);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait CampaignTypeReader {
    fn list_campaign_types(&self, hub_id: HubId) -> RepositoryResult<Vec<CampaignType>>;
    fn get_campaign_type_by_id(
        &self,
        id: CampaignTypeId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<CampaignType>>;
}

pub trait CampaignTypeWriter {
    fn create_campaign_type(&self, new: &NewCampaignType) -> RepositoryResult<CampaignType>;
    fn update_campaign_type(
        &self,
        id: CampaignTypeId,
        hub_id: HubId,
        updates: &UpdateCampaignType,
    ) -> RepositoryResult<CampaignType>;
    fn delete_campaign_type(&self, id: CampaignTypeId, hub_id: HubId) -> RepositoryResult<()>;
}

pub trait CampaignReader {
    fn list_campaigns(&self, query: CampaignListQuery) -> RepositoryResult<(usize, Vec<Campaign>)>;
    fn get_campaign_by_id(
        &self,
        id: CampaignId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<Campaign>>;
    /// Live (not trashed) inquiries per campaign; campaigns without any are absent.
    fn count_inquiries_by_campaign(
        &self,
        hub_id: HubId,
        campaign_ids: &[CampaignId],
    ) -> RepositoryResult<HashMap<CampaignId, usize>>;
}

pub trait CampaignWriter {
    fn create_campaign(&self, new: &NewCampaign) -> RepositoryResult<Campaign>;
    fn update_campaign(
        &self,
        id: CampaignId,
        hub_id: HubId,
        updates: &UpdateCampaign,
    ) -> RepositoryResult<Campaign>;
    fn delete_campaign(&self, id: CampaignId, hub_id: HubId) -> RepositoryResult<()>;
}

pub trait InquiryReader {
    fn list_inquiries(&self, query: InquiryListQuery) -> RepositoryResult<(usize, Vec<Inquiry>)>;
    /// Finds an inquiry whether or not it is in the trash.
    fn get_inquiry_by_id(&self, id: InquiryId, hub_id: HubId)
    -> RepositoryResult<Option<Inquiry>>;
    fn list_inquiry_answers(&self, inquiry_id: InquiryId) -> RepositoryResult<Vec<InquiryAnswer>>;
    fn list_interactions(&self, inquiry_id: InquiryId) -> RepositoryResult<Vec<Interaction>>;
}

pub trait InquiryWriter {
    fn create_inquiry(&self, new: &NewInquiry) -> RepositoryResult<Inquiry>;
    fn update_inquiry(
        &self,
        id: InquiryId,
        hub_id: HubId,
        updates: &UpdateInquiry,
    ) -> RepositoryResult<Inquiry>;
    /// Sets the stage and records `history` in the same transaction.
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
    /// Deletes a trashed inquiry; live inquiries are reported as not found.
    fn purge_inquiry(&self, id: InquiryId, hub_id: HubId) -> RepositoryResult<()>;
}

pub trait TaskReader {
    fn list_follow_up_tasks(
        &self,
        query: FollowUpTaskListQuery,
    ) -> RepositoryResult<Vec<FollowUpTask>>;
    fn list_regular_tasks(&self, query: RegularTaskListQuery)
    -> RepositoryResult<Vec<RegularTask>>;
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

pub trait TaskWriter {
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

pub trait UserReader {
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
    fn get_user_by_id(&self, id: UserId, hub_id: HubId) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &UserEmail, hub_id: HubId)
    -> RepositoryResult<Option<User>>;
}

pub trait UserWriter {
    fn create_user(&self, new: &NewUser) -> RepositoryResult<User>;
    fn update_user(&self, id: UserId, hub_id: HubId, updates: &UpdateUser)
    -> RepositoryResult<User>;
    fn delete_user(&self, id: UserId, hub_id: HubId) -> RepositoryResult<()>;
}

pub trait RoleReader {
    fn list_roles(&self, hub_id: HubId) -> RepositoryResult<Vec<Role>>;
    fn get_role_by_id(&self, id: RoleId, hub_id: HubId) -> RepositoryResult<Option<Role>>;
    fn list_permissions(&self) -> RepositoryResult<Vec<Permission>>;
    fn count_users_with_role(&self, id: RoleId) -> RepositoryResult<usize>;
}

pub trait RoleWriter {
    fn create_role(&self, new: &NewRole) -> RepositoryResult<Role>;
    fn update_role(&self, id: RoleId, hub_id: HubId, updates: &UpdateRole)
    -> RepositoryResult<Role>;
    fn delete_role(&self, id: RoleId, hub_id: HubId) -> RepositoryResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_offsets() {
        let first = Pagination {
            page: 1,
            per_page: 20,
        };
        let third = Pagination {
            page: 3,
            per_page: 20,
        };

        assert_eq!(first.offset(), 0);
        assert_eq!(third.offset(), 40);
        assert_eq!(third.limit(), 20);
    }

    #[test]
    fn like_pattern_trims_term() {
        assert_eq!(like_pattern(" ann "), "%ann%");
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\x"), "%c:\\\\x%");
    }

    #[test]
    fn huge_page_offset_does_not_wrap() {
        let pagination = Pagination {
            page: usize::MAX,
            per_page: 100,
        };

        assert_eq!(pagination.offset(), i64::MAX);
    }

    #[test]
    fn inquiry_query_builder() {
        let hub = HubId::new(1).unwrap();
        let query = InquiryListQuery::new(hub)
            .search("ann")
            .stage(Stage::Qualified)
            .trashed()
            .paginate(2, 10);

        assert_eq!(query.search.as_deref(), Some("ann"));
        assert_eq!(query.stage, Some(Stage::Qualified));
        assert!(query.trashed);
        assert_eq!(
            query.pagination,
            Some(Pagination {
                page: 2,
                per_page: 10
            })
        );
    }
}
