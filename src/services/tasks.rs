use crate::domain::auth::AuthenticatedUser;
use crate::domain::board::{Board, BoardError, MovePlan};
use crate::domain::task::{BoardTask, FollowUpTask, RegularTask, TaskKind, TaskRef};
use crate::domain::types::{HubId, InquiryId, TaskId, TaskPriority, TaskStatus, UserId};
use crate::dto::tasks::{BoardPageData, BoardQuery, MoveOutcome, TaskQuery};
use crate::forms::task::{FollowUpTaskForm, MoveTaskForm, RegularTaskForm};
use crate::repository::{
    FollowUpTaskListQuery, InquiryReader, RegularTaskListQuery, RoleReader, TaskReader,
    TaskWriter, UserListQuery, UserReader,
};
use crate::services::access::{TASKS_MANAGE, TASKS_VIEW, authorize};
use crate::services::{ServiceError, ServiceResult, ensure_assignee, parse_filter, path_id};

pub fn list_follow_up_tasks<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: &TaskQuery,
) -> ServiceResult<Vec<FollowUpTask>>
where
    R: TaskReader + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, TASKS_VIEW)?;
    let mut list = FollowUpTaskListQuery::new(actor.hub_id);
    if let Some(inquiry_id) = query.inquiry_id {
        list = list.inquiry(path_id(inquiry_id)?);
    }
    if let Some(user_id) = query.assigned_to {
        list = list.assigned_to(path_id(user_id)?);
    }
    if let Some(status) = parse_filter::<TaskStatus>(query.status.as_deref(), "status")? {
        list = list.status(status);
    }
    Ok(repo.list_follow_up_tasks(list)?)
}

pub fn list_regular_tasks<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: &TaskQuery,
) -> ServiceResult<Vec<RegularTask>>
where
    R: TaskReader + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, TASKS_VIEW)?;
    let mut list = RegularTaskListQuery::new(actor.hub_id);
    if let Some(user_id) = query.assigned_to {
        list = list.assigned_to(path_id(user_id)?);
    }
    if let Some(status) = parse_filter::<TaskStatus>(query.status.as_deref(), "status")? {
        list = list.status(status);
    }
    if let Some(priority) = parse_filter::<TaskPriority>(query.priority.as_deref(), "priority")? {
        list = list.priority(priority);
    }
    Ok(repo.list_regular_tasks(list)?)
}

/// Follow-ups can only be attached to a live seeker of the same hub.
fn ensure_seeker<R>(repo: &R, hub_id: HubId, inquiry_id: InquiryId) -> ServiceResult<()>
where
    R: InquiryReader + ?Sized,
{
    match repo.get_inquiry_by_id(inquiry_id, hub_id)? {
        Some(inquiry) if !inquiry.is_trashed() => Ok(()),
        _ => Err(ServiceError::Form("Seeker not found".to_string())),
    }
}

pub fn create_follow_up_task<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: FollowUpTaskForm,
) -> ServiceResult<FollowUpTask>
where
    R: TaskWriter + InquiryReader + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, TASKS_MANAGE)?;
    let new = form.into_new(actor.hub_id)?;
    ensure_seeker(repo, actor.hub_id, new.inquiry_id)?;
    ensure_assignee(repo, actor.hub_id, new.assigned_to)?;

    Ok(repo.create_follow_up_task(&new)?)
}

pub fn update_follow_up_task<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: FollowUpTaskForm,
) -> ServiceResult<FollowUpTask>
where
    R: TaskWriter + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, TASKS_MANAGE)?;
    let id: TaskId = path_id(id)?;
    let updates = form.into_update()?;
    ensure_assignee(repo, actor.hub_id, updates.assigned_to)?;

    Ok(repo.update_follow_up_task(id, actor.hub_id, &updates)?)
}

pub fn create_regular_task<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: RegularTaskForm,
) -> ServiceResult<RegularTask>
where
    R: TaskWriter + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, TASKS_MANAGE)?;
    let new = form.into_new(actor.hub_id)?;
    ensure_assignee(repo, actor.hub_id, new.assigned_to)?;

    Ok(repo.create_regular_task(&new)?)
}

pub fn update_regular_task<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: RegularTaskForm,
) -> ServiceResult<RegularTask>
where
    R: TaskWriter + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, TASKS_MANAGE)?;
    let id: TaskId = path_id(id)?;
    let updates = form.into_update()?;
    ensure_assignee(repo, actor.hub_id, updates.assigned_to)?;

    Ok(repo.update_regular_task(id, actor.hub_id, &updates)?)
}

pub fn delete_task<R>(
    repo: &R,
    user: &AuthenticatedUser,
    kind: TaskKind,
    id: i32,
) -> ServiceResult<()>
where
    R: TaskWriter + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, TASKS_MANAGE)?;
    repo.delete_task(TaskRef::new(kind, path_id(id)?), actor.hub_id)?;
    Ok(())
}

fn board_for<R>(repo: &R, hub_id: HubId, assignee: Option<UserId>) -> ServiceResult<Board>
where
    R: TaskReader + ?Sized,
{
    let mut follow_ups = FollowUpTaskListQuery::new(hub_id);
    let mut regular = RegularTaskListQuery::new(hub_id);
    if let Some(user_id) = assignee {
        follow_ups = follow_ups.assigned_to(user_id);
        regular = regular.assigned_to(user_id);
    }

    let follow_ups = repo.list_follow_up_tasks(follow_ups)?;
    let regular = repo.list_regular_tasks(regular)?;

    Ok(Board::new(
        follow_ups
            .into_iter()
            .map(BoardTask::from)
            .chain(regular.into_iter().map(BoardTask::from)),
    ))
}

/// Both task kinds distributed into the status columns.
pub fn load_board<R>(repo: &R, user: &AuthenticatedUser, query: &BoardQuery) -> ServiceResult<Board>
where
    R: TaskReader + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, TASKS_VIEW)?;
    let assignee = query.assigned_to.map(path_id::<UserId>).transpose()?;
    board_for(repo, actor.hub_id, assignee)
}

pub fn load_board_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: BoardQuery,
) -> ServiceResult<BoardPageData>
where
    R: TaskReader + UserReader + RoleReader + ?Sized,
{
    let board = load_board(repo, user, &query)?;
    let hub_id = user.hub().map_err(|_| ServiceError::Unauthorized)?;
    let (_, users) = repo.list_users(UserListQuery::new(hub_id).active(true))?;

    Ok(BoardPageData {
        board,
        users,
        filters: query,
    })
}

/// Applies a drag-and-drop move.
///
/// The drop target is resolved against the whole hub board, so a card
/// dropped on another card lands in that card's column. Dropping a card into
/// its own column performs no write. Users without `tasks.manage` may only
/// move cards assigned to them.
pub fn move_task<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: MoveTaskForm,
) -> ServiceResult<MoveOutcome>
where
    R: TaskReader + TaskWriter + UserReader + RoleReader + ?Sized,
{
    let actor = authorize(repo, user, TASKS_VIEW)?;
    let (task, target) = form.parse()?;
    let board = board_for(repo, actor.hub_id, None)?;

    let card = board.find(task).ok_or(ServiceError::NotFound)?;
    let own_card = actor.user_id.is_some() && card.assigned_to() == actor.user_id;
    if !actor.can(TASKS_MANAGE) && !own_card {
        return Err(ServiceError::Unauthorized);
    }

    match board.plan_move(task, target) {
        Ok(MovePlan::Unchanged) => Ok(MoveOutcome {
            task: card.clone(),
            moved: false,
        }),
        Ok(MovePlan::Move { to, .. }) => {
            let stored = repo.set_task_status(task, actor.hub_id, to)?;
            log::info!("Moved task {task} to {to} in hub {}", actor.hub_id);
            Ok(MoveOutcome {
                task: stored,
                moved: true,
            })
        }
        Err(BoardError::UnknownTask(_)) => Err(ServiceError::NotFound),
        Err(err @ BoardError::UnknownTarget(_)) => Err(ServiceError::Form(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::types::TaskTitle;
    use crate::repository::mock::MockRepository;
    use crate::services::access::test_support::*;
    use crate::services::inquiries::fixtures::inquiry;

    fn due(day: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn follow_up(id: i32, status: TaskStatus, assignee: Option<i32>) -> FollowUpTask {
        FollowUpTask {
            id: TaskId::new(id).unwrap(),
            hub_id: hub(),
            inquiry_id: InquiryId::new(1).unwrap(),
            seeker_name: "Seeker".into(),
            assigned_to: assignee.map(|id| UserId::new(id).unwrap()),
            title: TaskTitle::new("Call back").unwrap(),
            notes: None,
            due_at: due(id as u32),
            status,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn regular(id: i32, status: TaskStatus) -> RegularTask {
        RegularTask {
            id: TaskId::new(id).unwrap(),
            hub_id: hub(),
            assigned_to: None,
            title: TaskTitle::new("Print flyers").unwrap(),
            description: None,
            priority: TaskPriority::Low,
            due_at: None,
            status,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn expect_board(repo: &mut MockRepository) {
        repo.expect_list_follow_up_tasks().returning(|_| {
            Ok(vec![
                follow_up(3, TaskStatus::Pending, Some(1)),
                follow_up(2, TaskStatus::InProgress, None),
            ])
        });
        repo.expect_list_regular_tasks()
            .returning(|_| Ok(vec![regular(7, TaskStatus::Pending)]));
    }

    fn move_form(kind: &str, id: i32, target: &str) -> MoveTaskForm {
        MoveTaskForm {
            kind: kind.into(),
            id,
            target: target.into(),
        }
    }

    #[test]
    fn board_merges_both_kinds() {
        let mut repo = repo_for_member(&[TASKS_VIEW]);
        expect_board(&mut repo);

        let board = load_board(&repo, &member(), &BoardQuery::default()).unwrap();

        let pending: Vec<String> = board
            .column(TaskStatus::Pending)
            .unwrap()
            .tasks
            .iter()
            .map(|t| t.reference().to_string())
            .collect();
        assert_eq!(pending, vec!["follow_up:3", "regular:7"]);
        assert_eq!(board.task_count(), 3);
    }

    #[test]
    fn board_filter_narrows_both_queries() {
        let mut repo = repo_for_member(&[TASKS_VIEW]);
        repo.expect_list_follow_up_tasks()
            .withf(|q| q.assigned_to.map(|id| id.get()) == Some(1))
            .returning(|_| Ok(vec![]));
        repo.expect_list_regular_tasks()
            .withf(|q| q.assigned_to.map(|id| id.get()) == Some(1))
            .returning(|_| Ok(vec![]));

        let query = BoardQuery {
            assigned_to: Some(1),
        };
        let board = load_board(&repo, &member(), &query).unwrap();

        assert_eq!(board.task_count(), 0);
    }

    #[test]
    fn drop_on_card_moves_to_its_column() {
        let mut repo = repo_for_member(&[TASKS_MANAGE, TASKS_VIEW]);
        expect_board(&mut repo);
        repo.expect_set_task_status()
            .withf(|task, _, status| {
                task.to_string() == "regular:7" && *status == TaskStatus::InProgress
            })
            .times(1)
            .returning(|_, _, status| Ok(BoardTask::Regular(regular(7, status))));

        let outcome = move_task(&repo, &member(), move_form("regular", 7, "follow_up:2")).unwrap();

        assert!(outcome.moved);
        assert_eq!(outcome.task.status(), TaskStatus::InProgress);
    }

    #[test]
    fn drop_on_own_column_writes_nothing() {
        let mut repo = repo_for_member(&[TASKS_MANAGE, TASKS_VIEW]);
        expect_board(&mut repo);
        repo.expect_set_task_status().never();

        let outcome = move_task(&repo, &member(), move_form("regular", 7, "PENDING")).unwrap();

        assert!(!outcome.moved);
        assert_eq!(outcome.task.reference().to_string(), "regular:7");
    }

    #[test]
    fn unknown_target_is_rejected() {
        let mut repo = repo_for_member(&[TASKS_MANAGE, TASKS_VIEW]);
        expect_board(&mut repo);
        repo.expect_set_task_status().never();

        let unknown_card = move_task(&repo, &member(), move_form("regular", 7, "regular:99"));
        let garbage = move_task(&repo, &member(), move_form("regular", 7, "backlog"));

        assert!(matches!(unknown_card, Err(ServiceError::Form(_))));
        assert!(matches!(garbage, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn viewers_move_only_their_own_cards() {
        let mut repo = repo_for_member(&[TASKS_VIEW]);
        expect_board(&mut repo);
        repo.expect_set_task_status()
            .times(1)
            .returning(|task, _, status| {
                Ok(BoardTask::FollowUp(follow_up(task.id.get(), status, Some(1))))
            });

        let own = move_task(&repo, &member(), move_form("follow_up", 3, "COMPLETED"));
        let foreign = move_task(&repo, &member(), move_form("regular", 7, "COMPLETED"));

        assert!(own.unwrap().moved);
        assert!(matches!(foreign, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn follow_up_needs_live_seeker() {
        let mut repo = repo_for_member(&[TASKS_MANAGE]);
        repo.expect_get_inquiry_by_id().returning(|_, _| {
            let mut seeker = inquiry(1, crate::domain::types::Stage::New);
            seeker.deleted_at = Some(now());
            Ok(Some(seeker))
        });
        repo.expect_create_follow_up_task().never();

        let form: FollowUpTaskForm = serde_json::from_str(
            r#"{"inquiry_id": 1, "title": "Call back", "due_at": "2025-06-02T10:00"}"#,
        )
        .unwrap();
        let result = create_follow_up_task(&repo, &member(), form);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn list_filters_are_parsed() {
        let mut repo = repo_for_member(&[TASKS_VIEW]);
        repo.expect_list_regular_tasks()
            .withf(|q| q.priority == Some(TaskPriority::High) && q.status.is_none())
            .returning(|_| Ok(vec![]));

        let query = TaskQuery {
            priority: Some("high".into()),
            ..Default::default()
        };

        assert!(list_regular_tasks(&repo, &member(), &query).unwrap().is_empty());
    }
}
