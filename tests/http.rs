use chrono::{Datelike, Local};
use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct DayFlagResponse {
    date: String,
    on_site: bool,
}

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
struct Cursor {
    year: i32,
    month0: u32,
}

#[derive(Debug, Deserialize)]
struct TrendPoint {
    count: usize,
}

#[derive(Debug, Deserialize)]
struct MonthView {
    cursor: Cursor,
    days: Vec<serde_json::Value>,
    on_site_count: usize,
    quota: Option<u32>,
    trend: Vec<TrendPoint>,
}

struct TestServer {
    base_url: String,
    data_path: PathBuf,
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

fn unique_data_path(tag: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("onsite_http_{tag}_{}_{}.json", std::process::id(), nanos));
    path
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/month")).send().await {
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

async fn spawn_server(data_path: PathBuf) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_onsite_calendar"))
        .env("PORT", port.to_string())
        .env("ONSITE_DATA_PATH", &data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        data_path,
        child,
    }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = spawn_server(unique_data_path("shared")).await;
    #[cfg(unix)]
    cleanup::register(server.child.id());
    let server = Arc::new(server);
    *guard = Some(Arc::clone(&server));
    server
}

async fn month(client: &Client, base_url: &str) -> MonthView {
    client
        .get(format!("{base_url}/api/month"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn toggle(client: &Client, base_url: &str, date: &str) -> DayFlagResponse {
    client
        .post(format!("{base_url}/api/toggle"))
        .json(&serde_json::json!({ "date": date }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

fn read_record(path: &Path) -> serde_json::Map<String, serde_json::Value> {
    let bytes = std::fs::read(path).expect("record file");
    serde_json::from_slice(&bytes).expect("record is valid json")
}

#[tokio::test]
async fn http_toggle_updates_day_and_counter() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    client
        .post(format!("{}/open", server.base_url))
        .send()
        .await
        .unwrap();

    let date = Local::now().date_naive().with_day(1).unwrap().to_string();
    let before = month(&client, &server.base_url).await;
    assert_eq!(before.quota, Some(8));
    assert_eq!(before.trend.len(), 6);
    assert!(before.days.len() >= 28);

    let toggled = toggle(&client, &server.base_url, &date).await;
    assert_eq!(toggled.date, date);
    assert!(toggled.on_site);

    let day: DayFlagResponse = client
        .get(format!("{}/api/day/{date}", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(day.on_site);

    let after = month(&client, &server.base_url).await;
    assert_eq!(after.on_site_count, before.on_site_count + 1);
    assert_eq!(
        after.trend.last().unwrap().count,
        before.trend.last().unwrap().count + 1
    );
    assert_eq!(read_record(&server.data_path).get(&date), Some(&serde_json::json!(true)));

    let untoggled = toggle(&client, &server.base_url, &date).await;
    assert!(!untoggled.on_site);
    let restored = month(&client, &server.base_url).await;
    assert_eq!(restored.on_site_count, before.on_site_count);
}

#[tokio::test]
async fn http_navigation_moves_cursor_and_open_resets() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    client
        .post(format!("{}/open", server.base_url))
        .send()
        .await
        .unwrap();
    let start = month(&client, &server.base_url).await.cursor;

    let next: Cursor = client
        .post(format!("{}/api/navigate", server.base_url))
        .json(&serde_json::json!({ "direction": "next" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let expected = if start.month0 == 11 {
        Cursor { year: start.year + 1, month0: 0 }
    } else {
        Cursor { year: start.year, month0: start.month0 + 1 }
    };
    assert_eq!(next, expected);

    let response = client
        .post(format!("{}/api/navigate", server.base_url))
        .json(&serde_json::json!({ "direction": "sideways" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    client
        .post(format!("{}/open", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(month(&client, &server.base_url).await.cursor, start);
}

#[tokio::test]
async fn http_index_renders_grid() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let body = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("calendar-grid"));
    assert!(body.contains("/toggle/"));
    assert!(body.contains("<svg class=\"trend\""));
}

#[tokio::test]
async fn http_malformed_record_is_replaced_on_toggle() {
    let data_path = unique_data_path("corrupt");
    std::fs::write(&data_path, "{not json").unwrap();
    let server = spawn_server(data_path.clone()).await;
    let client = Client::new();

    let view = month(&client, &server.base_url).await;
    assert_eq!(view.on_site_count, 0);
    assert_eq!(std::fs::read_to_string(&data_path).unwrap(), "{not json");

    let toggled = toggle(&client, &server.base_url, "2024-02-10").await;
    assert!(toggled.on_site);

    let record = read_record(&data_path);
    assert_eq!(record.len(), 1);
    assert_eq!(record.get("2024-02-10"), Some(&serde_json::json!(true)));

    drop(server);
    let _ = std::fs::remove_file(data_path);
}

#[tokio::test]
async fn http_missing_record_is_created() {
    let data_path = unique_data_path("fresh");
    let server = spawn_server(data_path.clone()).await;

    assert!(read_record(&data_path).is_empty());

    drop(server);
    let _ = std::fs::remove_file(data_path);
}

#[cfg(unix)]
#[tokio::test]
async fn http_sigterm_shuts_down_gracefully() {
    let data_path = unique_data_path("sigterm");
    let mut server = spawn_server(data_path.clone()).await;
    let client = Client::new();

    let toggled = toggle(&client, &server.base_url, "2024-02-12").await;
    assert!(toggled.on_site);

    unsafe {
        libc::kill(server.child.id() as i32, libc::SIGTERM);
    }

    let deadline = Instant::now() + Duration::from_secs(3);
    let status = loop {
        if let Some(status) = server.child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() > deadline {
            panic!("server did not exit after SIGTERM");
        }
        sleep(Duration::from_millis(50)).await;
    };
    assert!(status.success(), "unexpected exit status: {status:?}");
    assert_eq!(read_record(&data_path).get("2024-02-12"), Some(&serde_json::json!(true)));

    drop(server);
    let _ = std::fs::remove_file(data_path);
}
