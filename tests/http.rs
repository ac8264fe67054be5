use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct Medication {
    id: u64,
    name: String,
    time: String,
    streak: u32,
    color: String,
}

#[derive(Debug, Deserialize)]
struct AddResponse {
    medication: Medication,
    notice: String,
}

#[derive(Debug, Deserialize)]
struct ListedMedication {
    id: u64,
    name: String,
    adherence: u8,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    medications: Vec<ListedMedication>,
}

#[derive(Debug, Deserialize)]
struct FieldError {
    field: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    errors: Vec<FieldError>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Cell {
    Blank,
    Day {
        day: u32,
        date: String,
        is_today: bool,
        is_taken: bool,
    },
}

#[derive(Debug, Deserialize)]
struct CalendarResponse {
    medication: Option<Medication>,
    year: i32,
    month: u32,
    cells: Vec<Cell>,
    adherence: u8,
}

#[derive(Debug, Deserialize)]
struct ToggleResponse {
    toggled: bool,
    taken: Option<bool>,
    notice: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReminderResponse {
    visible: bool,
    medication: Option<Medication>,
    queued: usize,
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    current_streak: u32,
    monthly_adherence: u8,
    total_medications: usize,
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
    path.push(format!("medtracker_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/medications")).send().await {
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
    let child = Command::new(env!("CARGO_BIN_EXE_medtracker"))
        .env("PORT", port.to_string())
        .env("MEDTRACKER_DATA_PATH", data_path)
        // Keep the reminder task from firing while tests run.
        .env("MEDTRACKER_REMINDER_INTERVAL_SECS", "86400")
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

async fn add(client: &Client, base_url: &str, name: &str, time: &str) -> AddResponse {
    let response = client
        .post(format!("{base_url}/api/medications"))
        .json(&json!({
            "name": name,
            "dosage": "200mg",
            "frequency": "Daily",
            "time": time,
            "reminders": true
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    response.json().await.unwrap()
}

async fn select(client: &Client, base_url: &str, id: Option<u64>) -> CalendarResponse {
    let response = client
        .put(format!("{base_url}/api/selection"))
        .json(&json!({ "medication_id": id }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    response.json().await.unwrap()
}

async fn toggle(client: &Client, base_url: &str, date: &str) -> ToggleResponse {
    client
        .post(format!("{base_url}/api/calendar/toggle"))
        .json(&json!({ "date": date }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

fn today_cell(calendar: &CalendarResponse) -> Option<(String, bool)> {
    calendar.cells.iter().find_map(|cell| match cell {
        Cell::Day {
            date,
            is_today: true,
            is_taken,
            ..
        } => Some((date.clone(), *is_taken)),
        _ => None,
    })
}

#[tokio::test]
async fn http_add_medication_appears_in_list() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let added = add(&client, &server.base_url, "Ibuprofen", "08:00").await;
    assert_eq!(added.medication.name, "Ibuprofen");
    assert_eq!(added.medication.time, "08:00");
    assert_eq!(added.medication.streak, 0);
    assert!(added.medication.color.starts_with("hsl("));
    assert_eq!(added.notice, "Ibuprofen added successfully!");

    let list: ListResponse = client
        .get(format!("{}/api/medications", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let listed = list
        .medications
        .iter()
        .find(|med| med.id == added.medication.id)
        .expect("added medication listed");
    assert_eq!(listed.name, "Ibuprofen");
    assert_eq!(listed.adherence, 0);
}

#[tokio::test]
async fn http_invalid_medication_reports_fields() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before: StatsResponse = client
        .get(format!("{}/api/stats", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let response = client
        .post(format!("{}/api/medications", server.base_url))
        .json(&json!({ "name": "X", "dosage": "5mg", "frequency": "Daily", "time": "25:00" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json().await.unwrap();
    let fields: Vec<&str> = body.errors.iter().map(|err| err.field.as_str()).collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"time"));
    assert!(!fields.contains(&"dosage"));

    let after: StatsResponse = client
        .get(format!("{}/api/stats", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(after.total_medications, before.total_medications);
}

#[tokio::test]
async fn http_toggle_today_updates_calendar_and_stats() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let added = add(&client, &server.base_url, "Metformin", "21:15").await;
    let id = added.medication.id;
    let calendar = select(&client, &server.base_url, Some(id)).await;
    assert_eq!(calendar.medication.as_ref().map(|med| med.id), Some(id));

    let (today, taken) = today_cell(&calendar).expect("current month contains today");
    assert!(!taken);

    let toggled = toggle(&client, &server.base_url, &today).await;
    assert!(toggled.toggled);
    assert_eq!(toggled.taken, Some(true));
    assert_eq!(toggled.notice.as_deref(), Some("Metformin marked as taken"));

    let calendar: CalendarResponse = client
        .get(format!("{}/api/calendar", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(today_cell(&calendar).map(|(_, taken)| taken), Some(true));
    assert!(calendar.adherence > 0);

    let stats: StatsResponse = client
        .get(format!("{}/api/stats", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats.current_streak, 1);
    assert_eq!(stats.monthly_adherence, calendar.adherence);

    let toggled = toggle(&client, &server.base_url, &today).await;
    assert_eq!(toggled.taken, Some(false));
    assert_eq!(toggled.notice.as_deref(), Some("Metformin marked as not taken"));
}

#[tokio::test]
async fn http_toggle_without_selection_is_a_no_op() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let calendar = select(&client, &server.base_url, None).await;
    assert!(calendar.medication.is_none());
    let (today, _) = today_cell(&calendar).expect("current month contains today");

    let toggled = toggle(&client, &server.base_url, &today).await;
    assert!(!toggled.toggled);
    assert!(toggled.taken.is_none());

    let response = client
        .put(format!("{}/api/selection", server.base_url))
        .json(&json!({ "medication_id": 999_999 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_navigate_round_trips_month() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let start: CalendarResponse = client
        .get(format!("{}/api/calendar", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let next: CalendarResponse = client
        .post(format!("{}/api/calendar/navigate", server.base_url))
        .json(&json!({ "direction": "next" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    if start.month == 11 {
        assert_eq!((next.year, next.month), (start.year + 1, 0));
    } else {
        assert_eq!((next.year, next.month), (start.year, start.month + 1));
    }
    assert!(next.cells.iter().any(|cell| matches!(cell, Cell::Day { day: 28, .. })));

    let back: CalendarResponse = client
        .post(format!("{}/api/calendar/navigate", server.base_url))
        .json(&json!({ "direction": "prev" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!((back.year, back.month), (start.year, start.month));

    let response = client
        .post(format!("{}/api/calendar/navigate", server.base_url))
        .json(&json!({ "direction": "sideways" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_reminder_slot_starts_hidden() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let reminder: ReminderResponse = client
        .get(format!("{}/api/reminder", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!reminder.visible);
    assert!(reminder.medication.is_none());
    assert_eq!(reminder.queued, 0);

    let confirmed: ReminderResponse = client
        .post(format!("{}/api/reminder/confirm", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!confirmed.visible);

    let page = client
        .get(&server.base_url)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Medication Tracker"));
}
