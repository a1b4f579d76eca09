//! Service orchestration tests for the board operation surface.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]
#![expect(
    clippy::indexing_slicing,
    reason = "Test code uses indexing after length checks"
)]

use std::sync::Arc;

use crate::board::{
    adapters::memory::InMemoryBoardRepository,
    domain::{
        ActivityAction, Actor, Assignee, ColumnCode, DeveloperId, DeveloperRef, ProjectId,
        ProjectRef, ResponsibleRef, Role, TaskId, UserId,
    },
    services::{BoardError, BoardService, CreateTaskRequest, PositionUpdate, TaskPatch},
};
use chrono::NaiveDate;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = BoardService<InMemoryBoardRepository, DefaultClock>;

struct BoardFixture {
    service: TestService,
    project: ProjectRef,
    admin: Actor,
    manager: Actor,
    contributor: Actor,
}

#[fixture]
fn board() -> BoardFixture {
    let responsible = UserId::new();
    let developer = DeveloperId::new();
    let project = ProjectRef::new(
        ProjectId::new(),
        Some(ResponsibleRef::new(responsible, "Анна Петрова")),
        vec![DeveloperRef::new(developer, "Иван Сидоров")],
    );

    BoardFixture {
        service: BoardService::new(
            Arc::new(InMemoryBoardRepository::new()),
            Arc::new(DefaultClock),
        ),
        project,
        admin: Actor::new(UserId::new(), Role::Admin),
        manager: Actor::new(responsible, Role::Manager),
        contributor: Actor::new(UserId::new(), Role::Contributor).with_developer(developer),
    }
}

fn queue_task_request(title: &str) -> CreateTaskRequest {
    CreateTaskRequest::new(title, "queue")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn get_board_backfills_exactly_five_columns_idempotently(board: BoardFixture) {
    let first = board
        .service
        .get_board(&board.admin, &board.project)
        .await
        .expect("board loads");
    let second = board
        .service
        .get_board(&board.admin, &board.project)
        .await
        .expect("board loads again");

    for state in [&first, &second] {
        let codes: Vec<ColumnCode> = state.columns.iter().map(|column| column.code()).collect();
        assert_eq!(
            codes,
            vec![
                ColumnCode::Queue,
                ColumnCode::InProgress,
                ColumnCode::Help,
                ColumnCode::Blocked,
                ColumnCode::Done,
            ]
        );
    }
    assert!(second.tasks.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_persists_and_logs_creation(board: BoardFixture) {
    let task = board
        .service
        .create_task(
            &board.manager,
            &board.project,
            queue_task_request("Рефакторинг авторизации").with_description("выделить общий модуль"),
        )
        .await
        .expect("task creation succeeds");

    let state = board
        .service
        .get_board(&board.manager, &board.project)
        .await
        .expect("board loads");
    assert_eq!(state.tasks, vec![task.clone()]);

    let activity = board
        .service
        .project_activity(&board.manager, &board.project)
        .await
        .expect("activity loads");
    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0].action, ActivityAction::Create);
    assert_eq!(activity[0].task, Some(task.id()));
    assert_eq!(activity[0].actor, Some(board.manager.id()));
    let new_data = activity[0].new_data.as_ref().expect("create snapshot");
    assert_eq!(
        new_data.get("title"),
        Some(&serde_json::json!("Рефакторинг авторизации"))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_rejects_unknown_column_code(board: BoardFixture) {
    let result = board
        .service
        .create_task(
            &board.admin,
            &board.project,
            CreateTaskRequest::new("Misfiled", "archive"),
        )
        .await;

    assert!(matches!(result, Err(BoardError::Validation(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_rejects_blank_title(board: BoardFixture) {
    let result = board
        .service
        .create_task(&board.admin, &board.project, queue_task_request("   "))
        .await;

    assert!(matches!(result, Err(BoardError::Validation(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_resolves_developer_assignee(board: BoardFixture) {
    let dev_id = board.project.developers()[0].id();
    let token = format!("dev:{dev_id}");

    let task = board
        .service
        .create_task(
            &board.contributor,
            &board.project,
            queue_task_request("Подключить платёжный шлюз").with_assignee(&token),
        )
        .await
        .expect("task creation succeeds");

    assert_eq!(task.assignee(), Assignee::Developer { id: dev_id });

    let options = board
        .service
        .list_assignable(&board.contributor, &board.project)
        .expect("options load");
    assert!(
        options
            .iter()
            .any(|o| o.token == token && o.label == "Разработчик: Иван Сидоров")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_rejects_unlinked_developer(board: BoardFixture) {
    let result = board
        .service
        .create_task(
            &board.admin,
            &board.project,
            queue_task_request("Unassignable").with_assignee(format!("dev:{}", DeveloperId::new())),
        )
        .await;

    assert!(matches!(result, Err(BoardError::Validation(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_with_move_and_edit_logs_both_records(board: BoardFixture) {
    let task = board
        .service
        .create_task(&board.admin, &board.project, queue_task_request("Старое имя"))
        .await
        .expect("task creation succeeds");

    let updated = board
        .service
        .update_task(
            &board.admin,
            &board.project,
            task.id(),
            TaskPatch::new()
                .with_title("Новое имя")
                .with_status("inprogress"),
        )
        .await
        .expect("update succeeds");

    assert_eq!(updated.title(), "Новое имя");
    assert_eq!(updated.column(), ColumnCode::InProgress);

    let history = board
        .service
        .task_history(&board.admin, &board.project, task.id())
        .await
        .expect("history loads");
    assert_eq!(history.len(), 3);

    let moves: Vec<_> = history
        .iter()
        .filter(|record| record.action == ActivityAction::Move)
        .collect();
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].from_column, Some(ColumnCode::Queue));
    assert_eq!(moves[0].to_column, Some(ColumnCode::InProgress));

    let updates: Vec<_> = history
        .iter()
        .filter(|record| record.action == ActivityAction::Update)
        .collect();
    assert_eq!(updates.len(), 1);
    let old_data = updates[0].old_data.as_ref().expect("old snapshot");
    let new_data = updates[0].new_data.as_ref().expect("new snapshot");
    assert_eq!(old_data.get("title"), Some(&serde_json::json!("Старое имя")));
    assert_eq!(new_data.get("title"), Some(&serde_json::json!("Новое имя")));
    assert_eq!(old_data.get("description"), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_without_changes_logs_nothing(board: BoardFixture) {
    let task = board
        .service
        .create_task(&board.admin, &board.project, queue_task_request("Стабильная"))
        .await
        .expect("task creation succeeds");

    board
        .service
        .update_task(
            &board.admin,
            &board.project,
            task.id(),
            TaskPatch::new()
                .with_title("Стабильная")
                .with_status("queue"),
        )
        .await
        .expect("update succeeds");

    let history = board
        .service
        .task_history(&board.admin, &board.project, task.id())
        .await
        .expect("history loads");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, ActivityAction::Create);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_sets_and_clears_deadline(board: BoardFixture) {
    let task = board
        .service
        .create_task(&board.admin, &board.project, queue_task_request("Со сроком"))
        .await
        .expect("task creation succeeds");
    let deadline = NaiveDate::from_ymd_opt(2026, 9, 1).expect("valid date");

    let with_deadline = board
        .service
        .update_task(
            &board.admin,
            &board.project,
            task.id(),
            TaskPatch::new().with_deadline(Some(deadline)),
        )
        .await
        .expect("update succeeds");
    assert_eq!(with_deadline.deadline(), Some(deadline));

    let cleared = board
        .service
        .update_task(
            &board.admin,
            &board.project,
            task.id(),
            TaskPatch::new().with_deadline(None),
        )
        .await
        .expect("update succeeds");
    assert!(cleared.deadline().is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_of_missing_task_is_not_found(board: BoardFixture) {
    let result = board
        .service
        .update_task(
            &board.admin,
            &board.project,
            TaskId::new(),
            TaskPatch::new().with_title("Ghost"),
        )
        .await;

    assert!(matches!(result, Err(BoardError::NotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_of_foreign_project_task_is_not_found(board: BoardFixture) {
    let task = board
        .service
        .create_task(&board.admin, &board.project, queue_task_request("Домашняя"))
        .await
        .expect("task creation succeeds");

    let other_project = ProjectRef::new(ProjectId::new(), None, vec![]);
    let result = board
        .service
        .update_task(
            &board.admin,
            &other_project,
            task.id(),
            TaskPatch::new().with_title("Чужая"),
        )
        .await;

    assert!(matches!(result, Err(BoardError::NotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reorder_into_another_column_logs_one_move(board: BoardFixture) {
    let task = board
        .service
        .create_task(&board.admin, &board.project, queue_task_request("Перенос"))
        .await
        .expect("task creation succeeds");

    board
        .service
        .apply_reorder(
            &board.admin,
            &board.project,
            vec![PositionUpdate {
                task_id: task.id(),
                status: "done".to_owned(),
                order: 0,
            }],
        )
        .await
        .expect("reorder succeeds");

    let state = board
        .service
        .get_board(&board.admin, &board.project)
        .await
        .expect("board loads");
    assert_eq!(state.tasks[0].column(), ColumnCode::Done);

    let history = board
        .service
        .task_history(&board.admin, &board.project, task.id())
        .await
        .expect("history loads");
    let moves: Vec<_> = history
        .iter()
        .filter(|record| record.action == ActivityAction::Move)
        .collect();
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].from_column, Some(ColumnCode::Queue));
    assert_eq!(moves[0].to_column, Some(ColumnCode::Done));
    assert!(
        !history
            .iter()
            .any(|record| record.action == ActivityAction::Reorder)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reorder_within_column_logs_one_reorder(board: BoardFixture) {
    let task = board
        .service
        .create_task(&board.admin, &board.project, queue_task_request("Сдвиг"))
        .await
        .expect("task creation succeeds");

    board
        .service
        .apply_reorder(
            &board.admin,
            &board.project,
            vec![PositionUpdate {
                task_id: task.id(),
                status: "queue".to_owned(),
                order: 3,
            }],
        )
        .await
        .expect("reorder succeeds");

    let history = board
        .service
        .task_history(&board.admin, &board.project, task.id())
        .await
        .expect("history loads");
    let reorders: Vec<_> = history
        .iter()
        .filter(|record| record.action == ActivityAction::Reorder)
        .collect();
    assert_eq!(reorders.len(), 1);
    let old_data = reorders[0].old_data.as_ref().expect("old snapshot");
    let new_data = reorders[0].new_data.as_ref().expect("new snapshot");
    assert_eq!(old_data.get("order"), Some(&serde_json::json!(0)));
    assert_eq!(new_data.get("order"), Some(&serde_json::json!(3)));
    assert!(
        !history
            .iter()
            .any(|record| record.action == ActivityAction::Move)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reorder_skips_stale_items_and_applies_the_rest(board: BoardFixture) {
    let task = board
        .service
        .create_task(&board.admin, &board.project, queue_task_request("Живая"))
        .await
        .expect("task creation succeeds");

    board
        .service
        .apply_reorder(
            &board.admin,
            &board.project,
            vec![
                PositionUpdate {
                    task_id: TaskId::new(),
                    status: "done".to_owned(),
                    order: 0,
                },
                PositionUpdate {
                    task_id: task.id(),
                    status: "nonsense".to_owned(),
                    order: 1,
                },
                PositionUpdate {
                    task_id: task.id(),
                    status: "inprogress".to_owned(),
                    order: 2,
                },
            ],
        )
        .await
        .expect("partial application still succeeds");

    let state = board
        .service
        .get_board(&board.admin, &board.project)
        .await
        .expect("board loads");
    assert_eq!(state.tasks.len(), 1);
    assert_eq!(state.tasks[0].column(), ColumnCode::InProgress);
    assert_eq!(state.tasks[0].order(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reorder_noop_items_log_nothing(board: BoardFixture) {
    let task = board
        .service
        .create_task(&board.admin, &board.project, queue_task_request("На месте"))
        .await
        .expect("task creation succeeds");

    board
        .service
        .apply_reorder(
            &board.admin,
            &board.project,
            vec![PositionUpdate {
                task_id: task.id(),
                status: "queue".to_owned(),
                order: 0,
            }],
        )
        .await
        .expect("reorder succeeds");

    let history = board
        .service
        .task_history(&board.admin, &board.project, task.id())
        .await
        .expect("history loads");
    assert_eq!(history.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn contributors_may_not_delete(board: BoardFixture) {
    let task = board
        .service
        .create_task(&board.admin, &board.project, queue_task_request("Защищена"))
        .await
        .expect("task creation succeeds");

    let result = board
        .service
        .delete_task(&board.contributor, &board.project, task.id())
        .await;
    assert!(matches!(result, Err(BoardError::Forbidden)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_keeps_history_with_nulled_task_reference(board: BoardFixture) {
    let task = board
        .service
        .create_task(&board.manager, &board.project, queue_task_request("Обречённая"))
        .await
        .expect("task creation succeeds");
    board
        .service
        .apply_reorder(
            &board.manager,
            &board.project,
            vec![PositionUpdate {
                task_id: task.id(),
                status: "done".to_owned(),
                order: 0,
            }],
        )
        .await
        .expect("reorder succeeds");

    board
        .service
        .delete_task(&board.manager, &board.project, task.id())
        .await
        .expect("delete succeeds");

    let state = board
        .service
        .get_board(&board.manager, &board.project)
        .await
        .expect("board loads");
    assert!(state.tasks.is_empty());

    let activity = board
        .service
        .project_activity(&board.manager, &board.project)
        .await
        .expect("activity loads");
    assert_eq!(activity.len(), 3);
    assert!(activity.iter().all(|record| record.task.is_none()));
    assert_eq!(activity[0].action, ActivityAction::Delete);
    let old_data = activity[0].old_data.as_ref().expect("delete snapshot");
    assert_eq!(
        old_data.get("title"),
        Some(&serde_json::json!("Обречённая"))
    );
    assert_eq!(old_data.get("column"), Some(&serde_json::json!("done")));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn foreign_manager_is_forbidden(board: BoardFixture) {
    let outsider = Actor::new(UserId::new(), Role::Manager);
    let result = board.service.get_board(&outsider, &board.project).await;
    assert!(matches!(result, Err(BoardError::Forbidden)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn history_is_scoped_to_the_requested_task(board: BoardFixture) {
    let first = board
        .service
        .create_task(&board.admin, &board.project, queue_task_request("Первая"))
        .await
        .expect("task creation succeeds");
    let second = board
        .service
        .create_task(&board.admin, &board.project, queue_task_request("Вторая"))
        .await
        .expect("task creation succeeds");

    board
        .service
        .update_task(
            &board.admin,
            &board.project,
            second.id(),
            TaskPatch::new().with_description("только вторая"),
        )
        .await
        .expect("update succeeds");

    let first_history = board
        .service
        .task_history(&board.admin, &board.project, first.id())
        .await
        .expect("history loads");
    assert_eq!(first_history.len(), 1);
    assert!(first_history.iter().all(|r| r.task == Some(first.id())));

    let second_history = board
        .service
        .task_history(&board.admin, &board.project, second.id())
        .await
        .expect("history loads");
    assert_eq!(second_history.len(), 2);
    assert_eq!(second_history[0].action, ActivityAction::Update);
}
