use daybook_core::db::open_db_in_memory;
use daybook_core::{
    DayService, SqliteDayRepository, SqliteTaskRepository, TaskService,
};
use serde_json::json;

#[test]
fn task_and_day_change_use_external_wire_names() {
    let conn = open_db_in_memory().unwrap();
    let days = DayService::new(
        SqliteDayRepository::try_new(&conn).unwrap(),
        SqliteTaskRepository::try_new(&conn).unwrap(),
    );
    let tasks = TaskService::new(&days, SqliteTaskRepository::try_new(&conn).unwrap());
    let task = tasks.create_task("sweep porch").unwrap();

    let task_json = serde_json::to_value(&task).unwrap();
    assert_eq!(
        task_json,
        json!({
            "id": task.id.0,
            "name": "sweep porch",
            "day_id": task.day_id.0,
            "type": "one-time",
            "status": "active",
        })
    );

    let change_json = serde_json::to_value(days.set_next_day().unwrap()).unwrap();
    assert_eq!(change_json["outcome"], "switched");
    assert_eq!(change_json["current"]["season"], "spring");
    assert_eq!(change_json["current"]["number"], 2);
    assert_eq!(change_json["current"]["active"], true);
    assert_eq!(change_json["rollover"]["archived"], 1);
}
