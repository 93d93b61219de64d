use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct Entry {
    date: String,
    workout_done: bool,
    meals: std::collections::BTreeMap<String, bool>,
    daily_xp: u32,
}

#[derive(Debug, Deserialize)]
struct Today {
    entry: Entry,
}

#[derive(Debug, Deserialize)]
struct Summary {
    total_xp: u64,
    streak: u32,
    insight: String,
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

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("obsidian_log_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/today")).send().await {
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
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_obsidian_log"))
        .env("PORT", port.to_string())
        .env("OBSIDIAN_DATA_PATH", data_path)
        .env_remove("GEMINI_API_KEY")
        .env_remove("API_KEY")
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

async fn reset(client: &Client, base_url: &str) {
    let response = client
        .post(format!("{base_url}/api/reset"))
        .json(&json!({ "confirm": true }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

async fn summary(client: &Client, base_url: &str) -> Summary {
    client
        .get(format!("{base_url}/api/summary"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_toggles_update_today() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset(&client, &server.base_url).await;

    let before: Today = client
        .get(format!("{}/api/today", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(before.entry.date, today().to_string());
    assert_eq!(before.entry.daily_xp, 0);

    let response = client
        .post(format!("{}/api/toggle", server.base_url))
        .json(&json!({ "target": "meal", "id": "bf" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let entry: Entry = client
        .post(format!("{}/api/toggle", server.base_url))
        .json(&json!({ "target": "workout" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(entry.workout_done);
    assert_eq!(entry.meals.get("bf"), Some(&true));
    assert_eq!(entry.daily_xp, 5);

    let stats = summary(&client, &server.base_url).await;
    assert_eq!(stats.total_xp, 5);
    assert_eq!(stats.streak, 1);
    assert!(!stats.insight.is_empty());

    let rejected = client
        .post(format!("{}/api/toggle", server.base_url))
        .json(&json!({ "target": "meal", "id": "brunch" }))
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_partial_update_recomputes_score() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset(&client, &server.base_url).await;

    let entry: Entry = client
        .post(format!("{}/api/entry", server.base_url))
        .json(&json!({
            "workout_done": true,
            "meals": { "bf": true, "sn": true, "ln": true, "pr": true, "po": true, "dn": true, "sl": true },
            "posture": { "h": true, "w": true, "c": true }
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(entry.daily_xp, 10);

    let entry: Entry = client
        .post(format!("{}/api/entry", server.base_url))
        .json(&json!({ "workout_done": false }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(entry.daily_xp, 5);
    assert_eq!(entry.meals.len(), 7);
}

#[tokio::test]
async fn http_import_drops_invalid_records() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset(&client, &server.base_url).await;

    let yesterday = (today() - chrono::Duration::days(1)).to_string();
    let earlier = (today() - chrono::Duration::days(2)).to_string();
    let payload = json!([
        { "date": yesterday, "workout_done": true, "daily_xp": 5 },
        { "date": "not-a-date", "daily_xp": 10 },
        { "date": earlier, "daily_xp": 10 }
    ]);

    let response = client
        .post(format!("{}/api/import", server.base_url))
        .body(payload.to_string())
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["imported"], 2);

    let stats = summary(&client, &server.base_url).await;
    assert_eq!(stats.total_xp, 15);
    assert_eq!(stats.streak, 2);

    let export = client
        .get(format!("{}/api/export", server.base_url))
        .send()
        .await
        .unwrap();
    let disposition = export
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains(&format!("obsidian_backup_{}.json", today())));
    let exported: Vec<Value> = export.json().await.unwrap();
    assert_eq!(exported.len(), 2);
    assert_eq!(exported[0]["date"], json!(earlier));
}

#[tokio::test]
async fn http_malformed_import_leaves_state() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset(&client, &server.base_url).await;

    client
        .post(format!("{}/api/toggle", server.base_url))
        .json(&json!({ "target": "workout" }))
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("{}/api/import", server.base_url))
        .body("{ definitely not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.unwrap(), "Invalid data format.");

    assert_eq!(summary(&client, &server.base_url).await.total_xp, 5);
}

#[tokio::test]
async fn http_reset_requires_confirmation() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset(&client, &server.base_url).await;

    client
        .post(format!("{}/api/toggle", server.base_url))
        .json(&json!({ "target": "workout" }))
        .send()
        .await
        .unwrap();

    let refused = client
        .post(format!("{}/api/reset", server.base_url))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(refused.status(), StatusCode::BAD_REQUEST);
    assert_eq!(summary(&client, &server.base_url).await.total_xp, 5);

    reset(&client, &server.base_url).await;
    assert_eq!(summary(&client, &server.base_url).await.total_xp, 0);
}

async fn insight(client: &Client, base_url: &str) -> String {
    let body: Value = client
        .get(format!("{base_url}/api/insight"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["insight"].as_str().unwrap().to_string()
}

async fn toggle(client: &Client, base_url: &str, target: &str) {
    let response = client
        .post(format!("{base_url}/api/toggle"))
        .json(&json!({ "target": target }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
async fn http_insight_refreshes_on_score_change() {
    const PENDING: &str = "Loading strategic review...";
    const FALLBACK: &str = "External reinforcement offline. Rely on internal discipline.";

    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset(&client, &server.base_url).await;
    assert_eq!(insight(&client, &server.base_url).await, PENDING);

    toggle(&client, &server.base_url, "workout").await;
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        let text = insight(&client, &server.base_url).await;
        if text == FALLBACK {
            break;
        }
        assert_eq!(text, PENDING);
        if Instant::now() > deadline {
            panic!("insight was not refreshed after the score changed");
        }
        sleep(Duration::from_millis(100)).await;
    }

    // Sleep intent does not move the score, so no new request goes out.
    toggle(&client, &server.base_url, "sleep").await;
    sleep(Duration::from_millis(200)).await;
    assert_eq!(insight(&client, &server.base_url).await, FALLBACK);
    assert_eq!(summary(&client, &server.base_url).await.insight, FALLBACK);

    reset(&client, &server.base_url).await;
    assert_eq!(insight(&client, &server.base_url).await, PENDING);
}

#[tokio::test]
async fn http_timer_start_and_cancel() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let started: Value = client
        .post(format!("{}/api/timer", server.base_url))
        .json(&json!({ "seconds": 60 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(started["active"], json!(true));

    let cancelled: Value = client
        .delete(format!("{}/api/timer", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cancelled, json!({ "remaining": 0, "active": false }));
}

#[tokio::test]
async fn http_index_renders_page() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let html = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Obsidian"));
    assert!(html.contains("Training Focus"));
}
