//! Unit tests for board domain types: column codes, roles, actions, and the
//! task aggregate.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

use crate::board::domain::{
    ActivityAction, BoardDomainError, BoardTask, Column, ColumnCode, PersistedBoardTaskData,
    ProjectId, Role,
};
use eyre::ensure;
use mockable::{Clock, DefaultClock};
use rstest::rstest;

#[rstest]
#[case(ColumnCode::Queue, "queue")]
#[case(ColumnCode::InProgress, "inprogress")]
#[case(ColumnCode::Help, "help")]
#[case(ColumnCode::Blocked, "blocked")]
#[case(ColumnCode::Done, "done")]
fn column_codes_round_trip(#[case] code: ColumnCode, #[case] wire: &str) {
    assert_eq!(code.as_str(), wire);
    assert_eq!(ColumnCode::try_from(wire).expect("code parses"), code);
}

#[rstest]
#[case("  QUEUE  ", ColumnCode::Queue)]
#[case("Done", ColumnCode::Done)]
fn column_code_parsing_is_lenient(#[case] raw: &str, #[case] expected: ColumnCode) {
    assert_eq!(ColumnCode::try_from(raw).expect("code parses"), expected);
}

#[rstest]
#[case("archive")]
#[case("")]
#[case("in progress")]
fn unknown_column_codes_fail(#[case] raw: &str) {
    assert!(ColumnCode::try_from(raw).is_err());
}

#[test]
fn column_template_contains_five_stages_in_order() {
    let project = ProjectId::new();
    let template = Column::template_for(project);

    let codes: Vec<ColumnCode> = template.iter().map(Column::code).collect();
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

    let positions: Vec<i32> = template.iter().map(Column::position).collect();
    assert_eq!(positions, vec![0, 1, 2, 3, 4]);

    for column in &template {
        assert_eq!(column.project(), project);
        assert_eq!(column.title(), column.code().title());
    }
}

#[test]
fn column_titles_match_stage_labels() {
    assert_eq!(ColumnCode::Queue.title(), "на очереди");
    assert_eq!(ColumnCode::Done.title(), "выполнено");
}

#[rstest]
#[case(Role::Admin, "admin")]
#[case(Role::Manager, "manager")]
#[case(Role::Contributor, "contributor")]
fn roles_round_trip(#[case] role: Role, #[case] wire: &str) {
    assert_eq!(role.as_str(), wire);
    assert_eq!(Role::try_from(wire).expect("role parses"), role);
}

#[test]
fn unknown_role_fails() {
    assert!(Role::try_from("owner").is_err());
}

#[rstest]
#[case(ActivityAction::Create, "create")]
#[case(ActivityAction::Update, "update")]
#[case(ActivityAction::Move, "move")]
#[case(ActivityAction::Reorder, "reorder")]
#[case(ActivityAction::Delete, "delete")]
fn activity_actions_round_trip(#[case] action: ActivityAction, #[case] wire: &str) {
    assert_eq!(action.as_str(), wire);
    assert_eq!(
        ActivityAction::try_from(wire).expect("action parses"),
        action
    );
}

#[test]
fn new_task_trims_title_and_starts_unassigned() {
    let clock = DefaultClock;
    let task = BoardTask::new(
        ProjectId::new(),
        ColumnCode::Queue,
        "  Set up CI  ",
        "pipeline for the main branch",
        0,
        &clock,
    )
    .expect("valid task");

    assert_eq!(task.title(), "Set up CI");
    assert_eq!(task.column(), ColumnCode::Queue);
    assert_eq!(task.order(), 0);
    assert!(task.deadline().is_none());
    assert_eq!(task.created_at(), task.updated_at());
}

#[rstest]
#[case("")]
#[case("   ")]
fn blank_titles_are_rejected(#[case] title: &str) {
    let result = BoardTask::new(
        ProjectId::new(),
        ColumnCode::Queue,
        title,
        "",
        0,
        &DefaultClock,
    );
    assert!(matches!(result, Err(BoardDomainError::EmptyTitle)));
}

#[test]
fn set_title_rejects_blank_and_keeps_previous_value() {
    let clock = DefaultClock;
    let mut task = BoardTask::new(ProjectId::new(), ColumnCode::Queue, "Initial", "", 0, &clock)
        .expect("valid task");

    let result = task.set_title("   ", &clock);
    assert!(matches!(result, Err(BoardDomainError::EmptyTitle)));
    assert_eq!(task.title(), "Initial");
}

#[test]
fn mutators_change_fields() {
    let clock = DefaultClock;
    let mut task = BoardTask::new(ProjectId::new(), ColumnCode::Queue, "Initial", "", 0, &clock)
        .expect("valid task");

    task.move_to(ColumnCode::Done, &clock);
    task.set_order(7, &clock);
    let deadline = clock.utc().date_naive();
    task.set_deadline(Some(deadline), &clock);

    assert_eq!(task.column(), ColumnCode::Done);
    assert_eq!(task.order(), 7);
    assert_eq!(task.deadline(), Some(deadline));

    task.set_deadline(None, &clock);
    assert!(task.deadline().is_none());
}

#[test]
fn persisted_task_round_trips() {
    let clock = DefaultClock;
    let task = BoardTask::new(
        ProjectId::new(),
        ColumnCode::Help,
        "Investigate flaky deploy",
        "fails every other run",
        3,
        &clock,
    )
    .expect("valid task");

    let restored = BoardTask::from_persisted(PersistedBoardTaskData {
        id: task.id(),
        project: task.project(),
        column: task.column(),
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        order: task.order(),
        deadline: task.deadline(),
        assignee: task.assignee(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    });

    assert_eq!(restored, task);
}

#[test]
fn timestamps_never_go_backwards_across_mutations() -> eyre::Result<()> {
    let clock = DefaultClock;
    let mut task = BoardTask::new(ProjectId::new(), ColumnCode::Queue, "Хронология", "", 0, &clock)?;
    let created = task.updated_at();

    task.set_order(2, &clock);
    ensure!(
        task.updated_at() >= created,
        "updated_at must not precede created_at"
    );
    ensure!(task.created_at() == created, "created_at must stay fixed");
    Ok(())
}

#[test]
fn order_ties_are_permitted() {
    let clock = DefaultClock;
    let project = ProjectId::new();
    let first = BoardTask::new(project, ColumnCode::Queue, "First", "", 5, &clock)
        .expect("valid task");
    let second = BoardTask::new(project, ColumnCode::Queue, "Second", "", 5, &clock)
        .expect("valid task");

    assert_eq!(first.order(), second.order());
}
