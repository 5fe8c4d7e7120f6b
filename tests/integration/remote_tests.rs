/// Integration tests for the remote adapter and mode transitions
use islamic_tracker::*;
use tempfile::TempDir;

use crate::support::StubServer;

const LOGIN_OK: (&str, u16, &str) = (
    "POST /auth/login",
    200,
    r#"{"user":{"id":"user-1","email":"amina@example.com","name":"Amina"}}"#,
);
const NO_TASKS: (&str, u16, &str) = ("GET /tasks", 200, "[]");
const NO_REMINDERS: (&str, u16, &str) = ("GET /quran-reminders", 200, "[]");

const SERVER_TASK: &str = r#"{
    "id": "srv-1",
    "title": "Pray Fajr",
    "description": null,
    "completed": false,
    "category": "general",
    "priority": "medium",
    "dueDate": null,
    "createdAt": "2026-08-27T05:00:00Z",
    "updatedAt": "2026-08-27T05:00:00Z"
}"#;

fn session_against(server: &StubServer, dir: &TempDir) -> Session {
    let local = LocalStore::open(dir.path()).expect("open local store");
    let remote = RemoteStore::new(server.base_url()).expect("build remote store");
    Session::new(local, remote, Locale::English)
}

#[tokio::test]
async fn test_login_switches_to_remote_data() {
    let server = StubServer::start(vec![LOGIN_OK, NO_TASKS, NO_REMINDERS]).await;
    let dir = TempDir::new().expect("temp dir");
    let mut session = session_against(&server, &dir);

    // Guest data exists before the transition.
    session
        .add_task(TaskDraft::new("guest only"))
        .await
        .expect("guest add");
    assert_eq!(session.tasks().len(), 1);

    session
        .login("amina@example.com", "secret123")
        .await
        .expect("login");
    assert!(!session.is_guest());

    // Guest entities are not visible in authenticated mode.
    assert!(session.tasks().is_empty());
    assert!(session.reminders().is_empty());

    // And the guest data is back, untouched, after logout.
    session.logout();
    session.refresh().await.expect("refresh");
    assert_eq!(session.tasks().len(), 1);
    assert_eq!(session.tasks()[0].title, "guest only");
}

#[tokio::test]
async fn test_failed_reload_after_login_keeps_session_guest() {
    // Credentials check out but the user's data cannot be loaded. The
    // transition must not half-happen: an authenticated session displaying
    // guest entities would break mode isolation.
    let server = StubServer::start(vec![
        LOGIN_OK,
        ("GET /tasks", 500, r#"{"error":"Failed to fetch tasks"}"#),
        NO_REMINDERS,
    ])
    .await;
    let dir = TempDir::new().expect("temp dir");
    let mut session = session_against(&server, &dir);

    session
        .add_task(TaskDraft::new("guest only"))
        .await
        .expect("guest add");

    let err = session
        .login("amina@example.com", "secret123")
        .await
        .expect_err("login must fail when the reload fails");
    match err {
        StoreError::Remote { status, .. } => assert_eq!(status, Some(500)),
        other => panic!("expected remote error, got {:?}", other),
    }

    // Still a guest session, still showing the guest data.
    assert!(session.is_guest());
    assert_eq!(session.tasks().len(), 1);
    assert_eq!(session.tasks()[0].title, "guest only");

    // And the next guest operation keeps working against the local adapter.
    session.refresh().await.expect("refresh");
    assert_eq!(session.tasks().len(), 1);
}

#[tokio::test]
async fn test_invalid_credentials_leave_session_guest() {
    let server = StubServer::start(vec![(
        "POST /auth/login",
        401,
        r#"{"error":"Invalid credentials"}"#,
    )])
    .await;
    let dir = TempDir::new().expect("temp dir");
    let mut session = session_against(&server, &dir);

    let err = session
        .login("amina@example.com", "wrong")
        .await
        .expect_err("login must fail");
    match err {
        StoreError::Remote { status, message } => {
            assert_eq!(status, Some(401));
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("expected remote error, got {:?}", other),
    }
    assert!(session.is_guest());
}

#[tokio::test]
async fn test_remote_create_uses_server_assigned_id() {
    let server = StubServer::start(vec![
        LOGIN_OK,
        NO_TASKS,
        NO_REMINDERS,
        ("POST /tasks", 200, SERVER_TASK),
    ])
    .await;
    let dir = TempDir::new().expect("temp dir");
    let mut session = session_against(&server, &dir);

    session.login("amina@example.com", "secret123").await.expect("login");
    let id = session
        .add_task(TaskDraft::new("Pray Fajr"))
        .await
        .expect("add")
        .id
        .clone();

    assert_eq!(id, "srv-1");
    assert_eq!(session.tasks().len(), 1);

    // Nothing leaked into the guest blob.
    assert!(!dir.path().join(format!("{}.json", TASKS_KEY)).exists());
}

#[tokio::test]
async fn test_server_error_on_create_leaves_collection_unchanged() {
    let server = StubServer::start(vec![
        LOGIN_OK,
        NO_TASKS,
        NO_REMINDERS,
        ("POST /tasks", 500, r#"{"error":"Failed to create task"}"#),
    ])
    .await;
    let dir = TempDir::new().expect("temp dir");
    let mut session = session_against(&server, &dir);

    session.login("amina@example.com", "secret123").await.expect("login");

    let err = session
        .add_task(TaskDraft::new("doomed"))
        .await
        .expect_err("create must fail");
    match err {
        StoreError::Remote { status, message } => {
            assert_eq!(status, Some(500));
            assert_eq!(message, "Failed to create task");
        }
        other => panic!("expected remote error, got {:?}", other),
    }
    assert!(session.tasks().is_empty());
}

#[tokio::test]
async fn test_remote_toggle_and_delete() {
    let task_list = format!("[{}]", SERVER_TASK);
    let toggled = SERVER_TASK.replace("\"completed\": false", "\"completed\": true");
    let server = StubServer::start(vec![
        LOGIN_OK,
        ("GET /tasks", 200, task_list.as_str()),
        NO_REMINDERS,
        ("PATCH /tasks/srv-1", 200, toggled.as_str()),
        ("DELETE /tasks/srv-1", 200, r#"{"success":true}"#),
    ])
    .await;
    let dir = TempDir::new().expect("temp dir");
    let mut session = session_against(&server, &dir);

    session.login("amina@example.com", "secret123").await.expect("login");
    assert_eq!(session.tasks().len(), 1);
    assert!(!session.tasks()[0].completed);

    let task = session.toggle_task("srv-1").await.expect("toggle");
    assert!(task.completed);

    session.remove_task("srv-1").await.expect("delete");
    assert!(session.tasks().is_empty());
}

#[tokio::test]
async fn test_remote_reminder_missing_fields_is_bad_request() {
    // The gate catches this input in the session path; going straight at the
    // adapter shows the server's own 400 surfacing as a remote error.
    let server = StubServer::start(vec![(
        "POST /quran-reminders",
        400,
        r#"{"error":"Surah number and ayahs are required"}"#,
    )])
    .await;
    let store = RemoteStore::new(server.base_url()).expect("build remote store");

    let err = store
        .create_reminder(
            &Identity::User(UserId("user-1".to_string())),
            &ReminderDraft::new(2, 1, 5),
            "Al-Baqarah",
        )
        .await
        .expect_err("must surface 400");
    match err {
        StoreError::Remote { status, message } => {
            assert_eq!(status, Some(400));
            assert_eq!(message, "Surah number and ayahs are required");
        }
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_a_remote_error_without_status() {
    // Port 9 (discard) is never listening.
    let store = RemoteStore::new("http://127.0.0.1:9").expect("build remote store");
    let err = store
        .list_tasks(&Identity::User(UserId("user-1".to_string())))
        .await
        .expect_err("must fail");
    match err {
        StoreError::Remote { status, .. } => assert_eq!(status, None),
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_remote_reminder_round_trip() {
    let reminder_json = r#"{
        "id": "srv-r1",
        "surahNumber": 2,
        "surahName": "Al-Baqarah",
        "startAyah": 1,
        "endAyah": 5,
        "notes": null,
        "completed": false,
        "reminderTime": null,
        "createdAt": "2026-08-27T05:00:00Z",
        "updatedAt": "2026-08-27T05:00:00Z"
    }"#;
    let server = StubServer::start(vec![
        LOGIN_OK,
        NO_TASKS,
        NO_REMINDERS,
        ("POST /quran-reminders", 200, reminder_json),
    ])
    .await;
    let dir = TempDir::new().expect("temp dir");
    let mut session = session_against(&server, &dir);

    session.login("amina@example.com", "secret123").await.expect("login");
    let reminder = session
        .add_reminder(ReminderDraft::new(2, 1, 5))
        .await
        .expect("add");

    assert_eq!(reminder.id, "srv-r1");
    assert_eq!(reminder.surah_name, "Al-Baqarah");
    assert_eq!(reminder.surah_number, 2);
}
