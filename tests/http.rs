use once_cell::sync::Lazy;
use reqwest::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct Habit {
    id: String,
    name: String,
    goal: u32,
    current: u32,
    streak: u32,
    completed_today: bool,
}

#[derive(Debug, Deserialize)]
struct UpdateResponse {
    habit: Habit,
    moved_to_completed: Vec<Habit>,
}

#[derive(Debug, Deserialize)]
struct HabitsResponse {
    active: Vec<Habit>,
    completed: Vec<Habit>,
}

#[derive(Debug, Deserialize)]
struct CompletionEvent {
    habit_id: String,
}

#[derive(Debug, Deserialize)]
struct CalendarDay {
    date: String,
    all_habits_completed: bool,
}

#[derive(Debug, Deserialize)]
struct DailyPoint {
    values: HashMap<String, u32>,
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    last_7_days: Vec<DailyPoint>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/habits")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_habit_tracker"))
        .env("PORT", port.to_string())
        .env("HABITS_SEED_DEMO", "false")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn create_habit(client: &Client, base_url: &str, name: &str, goal: u32) -> Habit {
    let response = client
        .post(format!("{base_url}/api/habits"))
        .json(&serde_json::json!({ "name": name, "unit": "glasses", "goal": goal }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

async fn update(client: &Client, base_url: &str, id: &str, value: i64) -> reqwest::Response {
    client
        .post(format!("{base_url}/api/habits/{id}/update"))
        .json(&serde_json::json!({ "value": value }))
        .send()
        .await
        .unwrap()
}

async fn habits(client: &Client, base_url: &str) -> HabitsResponse {
    client
        .get(format!("{base_url}/api/habits"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_update_completes_habit_and_notifies_once() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let habit = create_habit(&client, &server.base_url, "Water Intake", 2).await;

    let partial: UpdateResponse = update(&client, &server.base_url, &habit.id, 1)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(partial.habit.current, 1);
    assert!(!partial.habit.completed_today);
    assert!(partial.moved_to_completed.is_empty());

    let done: UpdateResponse = update(&client, &server.base_url, &habit.id, 9)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(done.habit.current, 2);
    assert_eq!(done.habit.streak, 1);
    assert!(done.habit.completed_today);
    assert!(done.moved_to_completed.iter().any(|h| h.id == habit.id));

    let again: UpdateResponse = update(&client, &server.base_url, &habit.id, 2)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(again.habit.streak, 2);
    assert!(again.moved_to_completed.is_empty());

    let listed = habits(&client, &server.base_url).await;
    assert!(listed.completed.iter().any(|h| h.id == habit.id));
    assert!(!listed.active.iter().any(|h| h.id == habit.id));

    let events: Vec<CompletionEvent> = client
        .get(format!("{}/api/notifications", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(events.iter().filter(|e| e.habit_id == habit.id).count(), 1);
}

#[tokio::test]
async fn http_rejects_habit_without_name() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let before = habits(&client, &server.base_url).await;

    let response = client
        .post(format!("{}/api/habits", server.base_url))
        .json(&serde_json::json!({ "name": "", "unit": "min" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let after = habits(&client, &server.base_url).await;
    assert_eq!(
        after.active.len() + after.completed.len(),
        before.active.len() + before.completed.len()
    );
}

#[tokio::test]
async fn http_delete_habit_prunes_log() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let habit = create_habit(&client, &server.base_url, "Sleep", 8).await;
    assert_eq!(habit.name, "Sleep");
    assert_eq!(habit.goal, 8);
    update(&client, &server.base_url, &habit.id, 3).await;

    for _ in 0..2 {
        let response = client
            .delete(format!("{}/api/habits/{}", server.base_url, habit.id))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let listed = habits(&client, &server.base_url).await;
    assert!(!listed.active.iter().chain(&listed.completed).any(|h| h.id == habit.id));

    let stats: StatsResponse = client
        .get(format!("{}/api/stats", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats.last_7_days.len(), 7);
    assert!(stats.last_7_days.iter().all(|day| !day.values.contains_key(&habit.id)));

    let response = update(&client, &server.base_url, &habit.id, 1).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_template_and_calendar() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/templates/template-1/use", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let habit: Habit = response.json().await.unwrap();
    assert_eq!(habit.name, "Meditation");
    assert_eq!(habit.goal, 15);
    assert_eq!(habit.current, 0);

    let week: Vec<CalendarDay> = client
        .get(format!("{}/api/calendar?date=2026-01-07", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(week.len(), 7);
    assert_eq!(week[0].date, "2026-01-04");
    assert_eq!(week[6].date, "2026-01-10");
    assert!(week.iter().all(|day| !day.all_habits_completed));
}
