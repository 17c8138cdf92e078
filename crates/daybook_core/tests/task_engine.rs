use daybook_core::db::open_db_in_memory;
use daybook_core::{
    DayService, ErrorKind, SqliteDayRepository, SqliteTaskRepository, TaskId, TaskRule,
    TaskService, TaskServiceError, TaskStatus, TaskType,
};
use rusqlite::Connection;

type Days<'c> = DayService<SqliteDayRepository<'c>, SqliteTaskRepository<'c>>;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn day_service(conn: &Connection) -> Days<'_> {
    DayService::new(
        SqliteDayRepository::try_new(conn).unwrap(),
        SqliteTaskRepository::try_new(conn).unwrap(),
    )
}

fn task_service<'d, 'c>(
    conn: &'c Connection,
    days: &'d Days<'c>,
) -> TaskService<'d, SqliteDayRepository<'c>, SqliteTaskRepository<'c>> {
    TaskService::new(days, SqliteTaskRepository::try_new(conn).unwrap())
}

fn assert_rule(result: Result<daybook_core::Task, TaskServiceError>, expected: TaskRule) {
    match result {
        Err(TaskServiceError::InvalidState { rule, .. }) => assert_eq!(rule, expected),
        other => panic!("expected {expected:?}, got {other:?}"),
    }
}

#[test]
fn create_task_attaches_trimmed_one_time_task_to_active_day() {
    let conn = setup();
    let days = day_service(&conn);
    let tasks = task_service(&conn, &days);
    let today = days.get_active().unwrap();

    let task = tasks.create_task("  water crops ").unwrap();

    assert_eq!(task.name, "water crops");
    assert_eq!(task.day_id, today.id);
    assert_eq!(task.kind, TaskType::OneTime);
    assert_eq!(task.status, TaskStatus::Active);
}

#[test]
fn create_task_rejects_blank_name() {
    let conn = setup();
    let days = day_service(&conn);
    let tasks = task_service(&conn, &days);

    let err = tasks.create_task(" \n ").unwrap_err();
    assert!(matches!(err, TaskServiceError::InvalidName));
    assert_eq!(err.kind(), ErrorKind::InvalidTaskName);
}

#[test]
fn duplicate_name_leaves_original_and_day_untouched() {
    let conn = setup();
    let days = day_service(&conn);
    let tasks = task_service(&conn, &days);
    let today = days.get_active().unwrap();
    let original = tasks.create_task("feed pets").unwrap();

    let err = tasks.create_task("feed pets  ").unwrap_err();

    assert!(matches!(err, TaskServiceError::DuplicateName(ref name) if name == "feed pets"));
    assert_eq!(err.kind(), ErrorKind::DuplicateName);
    assert_eq!(tasks.get_by_id(original.id).unwrap(), original);
    assert_eq!(tasks.get_all_by_day_id(today.id).unwrap().len(), 1);
}

#[test]
fn get_by_id_reports_missing_task() {
    let conn = setup();
    let days = day_service(&conn);
    let tasks = task_service(&conn, &days);

    let err = tasks.get_by_id(TaskId(12)).unwrap_err();
    assert!(matches!(err, TaskServiceError::TaskNotFound(TaskId(12))));
    assert_eq!(err.kind().code(), "task_not_found");
    assert!(tasks.make_completed(TaskId(12)).is_err());
}

#[test]
fn completing_one_time_task_returns_refreshed_task() {
    let conn = setup();
    let days = day_service(&conn);
    let tasks = task_service(&conn, &days);
    let task = tasks.create_task("gather wood").unwrap();

    let completed = tasks.make_completed(task.id).unwrap();

    assert_eq!(completed.status, TaskStatus::Completed);
    assert_eq!(completed.day_id, task.day_id);
}

#[test]
fn completing_daily_task_is_invalid_state() {
    let conn = setup();
    let days = day_service(&conn);
    let tasks = task_service(&conn, &days);
    let task = tasks.create_task("stretch").unwrap();
    tasks.make_daily(task.id).unwrap();

    assert_rule(
        tasks.make_completed(task.id),
        TaskRule::OnlyOneTimeCanBeCompleted,
    );
}

#[test]
fn completing_twice_is_invalid_state() {
    let conn = setup();
    let days = day_service(&conn);
    let tasks = task_service(&conn, &days);
    let task = tasks.create_task("sell eggs").unwrap();
    tasks.make_completed(task.id).unwrap();

    let result = tasks.make_completed(task.id);
    assert_rule(result, TaskRule::AlreadyCompleted);
}

#[test]
fn completed_task_cannot_become_daily_or_one_time_or_be_renamed() {
    let conn = setup();
    let days = day_service(&conn);
    let tasks = task_service(&conn, &days);
    let task = tasks.create_task("clean barn").unwrap();
    tasks.make_completed(task.id).unwrap();

    assert_rule(tasks.make_daily(task.id), TaskRule::CompletedCannotBecomeDaily);
    assert_rule(
        tasks.make_one_time(task.id),
        TaskRule::CompletedCannotBecomeOneTime,
    );
    assert_rule(
        tasks.edit_name(task.id, "clean barn again"),
        TaskRule::CompletedCannotBeRenamed,
    );
}

#[test]
fn type_toggles_reject_no_op_changes() {
    let conn = setup();
    let days = day_service(&conn);
    let tasks = task_service(&conn, &days);
    let task = tasks.create_task("brush horse").unwrap();

    assert_rule(tasks.make_one_time(task.id), TaskRule::AlreadyOneTime);
    let daily = tasks.make_daily(task.id).unwrap();
    assert_eq!(daily.kind, TaskType::Daily);
    assert_rule(tasks.make_daily(task.id), TaskRule::AlreadyDaily);
    let one_time = tasks.make_one_time(task.id).unwrap();
    assert_eq!(one_time.kind, TaskType::OneTime);
}

#[test]
fn make_active_on_open_task_of_today_is_invalid_state() {
    let conn = setup();
    let days = day_service(&conn);
    let tasks = task_service(&conn, &days);
    let task = tasks.create_task("plant trees").unwrap();

    assert_rule(tasks.make_active(task.id), TaskRule::AlreadyActive);
}

#[test]
fn make_active_recalls_archived_task_into_today() {
    let conn = setup();
    let days = day_service(&conn);
    let tasks = task_service(&conn, &days);
    let first_day = days.get_active().unwrap();
    let task = tasks.create_task("fix roof").unwrap();
    days.set_next_day().unwrap();
    days.set_next_day().unwrap();
    days.set_current_day(3, "winter", 10).unwrap();
    let today = days.get_active().unwrap();

    let archived = tasks.get_by_id(task.id).unwrap();
    assert_eq!(archived.status, TaskStatus::Completed);
    assert_eq!(archived.day_id, first_day.id);

    let recalled = tasks.make_active(task.id).unwrap();
    assert_eq!(recalled.status, TaskStatus::Active);
    assert_eq!(recalled.day_id, today.id);
    assert_eq!(recalled.kind, TaskType::OneTime);
}

#[test]
fn operations_on_tasks_from_other_days_are_rejected() {
    let conn = setup();
    let days = day_service(&conn);
    let tasks = task_service(&conn, &days);
    let first_day = days.get_active().unwrap();
    let task = tasks.create_task("old errand").unwrap();
    days.set_next_day().unwrap();

    for result in [
        tasks.make_completed(task.id),
        tasks.make_daily(task.id),
        tasks.make_one_time(task.id),
        tasks.edit_name(task.id, "renamed errand"),
    ] {
        match result {
            Err(TaskServiceError::TaskNotInActiveDay { task_id, day_id }) => {
                assert_eq!(task_id, task.id);
                assert_eq!(day_id, first_day.id);
            }
            other => panic!("expected TaskNotInActiveDay, got {other:?}"),
        }
    }
}

#[test]
fn daily_task_follows_active_day_and_stays_editable() {
    let conn = setup();
    let days = day_service(&conn);
    let tasks = task_service(&conn, &days);
    let task = tasks.create_task("check mail").unwrap();
    tasks.make_daily(task.id).unwrap();

    days.set_next_day().unwrap();
    days.set_current_day(9, "summer", 20).unwrap();
    let today = days.get_active().unwrap();

    let renamed = tasks.edit_name(task.id, " check mailbox ").unwrap();
    assert_eq!(renamed.day_id, today.id);
    assert_eq!(renamed.name, "check mailbox");
    assert_eq!(renamed.status, TaskStatus::Active);
}

#[test]
fn edit_name_rejects_duplicates_and_blank_names() {
    let conn = setup();
    let days = day_service(&conn);
    let tasks = task_service(&conn, &days);
    tasks.create_task("mine").unwrap();
    let other = tasks.create_task("fish").unwrap();

    assert!(matches!(
        tasks.edit_name(other.id, "mine"),
        Err(TaskServiceError::DuplicateName(_))
    ));
    assert!(matches!(
        tasks.edit_name(other.id, "   "),
        Err(TaskServiceError::InvalidName)
    ));
    let same = tasks.edit_name(other.id, "fish").unwrap();
    assert_eq!(same.name, "fish");
}

#[test]
fn invalid_state_message_names_the_rule() {
    let conn = setup();
    let days = day_service(&conn);
    let tasks = task_service(&conn, &days);
    let task = tasks.create_task("dance").unwrap();
    tasks.make_daily(task.id).unwrap();

    let err = tasks.make_completed(task.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTaskState);
    assert!(err
        .public_message()
        .contains("only one-time tasks can be completed"));
}

#[test]
fn task_writes_surface_broken_day_invariant_as_internal() {
    let conn = setup();
    let days = day_service(&conn);
    let tasks = task_service(&conn, &days);
    conn.execute("UPDATE days SET active = 0;", []).unwrap();

    let err = tasks.create_task("anything").unwrap_err();
    assert!(matches!(err, TaskServiceError::Day(_)));
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert_eq!(err.public_message(), "internal error");
}
