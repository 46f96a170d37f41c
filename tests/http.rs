use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct CountersResponse {
    co2: String,
    temperature: String,
    trees: String,
    trees_lost: u64,
}

#[derive(Debug, Deserialize)]
struct CartItem {
    name: String,
    price: f64,
    quantity: u32,
}

#[derive(Debug, Deserialize)]
struct CartResponse {
    items: Vec<CartItem>,
    item_count: u64,
    total: String,
    items_html: String,
    notice: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct DonationLedger {
    reforestation: f64,
    methane: f64,
    renewables: f64,
    education: f64,
    operations: f64,
    total_donated: f64,
}

#[derive(Debug, Deserialize)]
struct ChartSpec {
    labels: Vec<String>,
    values: Vec<f64>,
    title: String,
}

#[derive(Debug, Deserialize)]
struct DonationResponse {
    ledger: DonationLedger,
    chart_generation: u64,
    chart: Option<ChartSpec>,
    notice: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    logged_in: bool,
    redirect: Option<String>,
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
    path.push(format!("ecoguard_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/counters")).send().await {
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

async fn spawn_server(data_path: &str) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_ecoguard"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("ECOGUARD_CO2_URL", "http://127.0.0.1:9/co2")
        .env("ECOGUARD_TEMPERATURE_URL", "http://127.0.0.1:9/temperature")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = spawn_server(&unique_data_path()).await;
    #[cfg(unix)]
    cleanup::register(server.child.id());
    let server = Arc::new(server);
    *guard = Some(Arc::clone(&server));
    server
}

async fn add_item(client: &Client, base_url: &str, name: &str, price: &str) -> CartResponse {
    client
        .post(format!("{base_url}/api/cart"))
        .json(&serde_json::json!({ "name": name, "price": price, "image": "https://example.com/p.jpg" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn donate(client: &Client, base_url: &str, amount: Option<f64>) -> reqwest::Response {
    client
        .post(format!("{base_url}/api/donations"))
        .json(&serde_json::json!({ "custom_amount": amount }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_counters_render_with_units() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let first: CountersResponse = client
        .get(format!("{}/api/counters", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(first.co2.ends_with(" ppm"), "{}", first.co2);
    assert!(first.temperature.ends_with("°C"), "{}", first.temperature);
    assert!(first.trees.chars().all(|ch| ch.is_ascii_digit() || ch == ','));

    sleep(Duration::from_millis(1200)).await;
    let later: CountersResponse = client
        .get(format!("{}/api/counters", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(later.trees_lost >= first.trees_lost);
}

#[tokio::test]
async fn http_login_sets_flag_and_redirects() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let page = client
        .get(format!("{}/login", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("loginForm"));

    let session: SessionResponse = client
        .post(format!("{}/api/login", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(session.logged_in);
    assert_eq!(session.redirect.as_deref(), Some("/"));

    let session: SessionResponse = client
        .get(format!("{}/api/session", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(session.logged_in);
}

#[tokio::test]
async fn http_same_product_twice_is_one_line() {
    let server = spawn_server(&unique_data_path()).await;
    let client = Client::new();

    let first = add_item(&client, &server.base_url, "Solar Charger", "$49.00").await;
    assert_eq!(first.notice.as_deref(), Some("Solar Charger added to cart!"));

    let cart = add_item(&client, &server.base_url, "Solar Charger", "$49.00").await;
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].name, "Solar Charger");
    assert_eq!(cart.items[0].quantity, 2);
    assert_eq!(cart.item_count, 2);
    assert_eq!(cart.total, "98.00");
}

#[tokio::test]
async fn http_bad_price_label_uses_fallback() {
    let server = spawn_server(&unique_data_path()).await;
    let client = Client::new();

    let cart = add_item(&client, &server.base_url, "Mystery Box", "Buy now").await;
    assert_eq!(cart.items[0].price, 50.0);
    assert_eq!(cart.total, "50.00");
}

#[tokio::test]
async fn http_remove_out_of_range_is_a_no_op() {
    let server = spawn_server(&unique_data_path()).await;
    let client = Client::new();

    add_item(&client, &server.base_url, "Seed Kit", "$15").await;
    add_item(&client, &server.base_url, "Tote", "$9").await;

    for index in ["2", "-1", "abc"] {
        let response = client
            .delete(format!("{}/api/cart/{index}", server.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cart: CartResponse = response.json().await.unwrap();
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.total, "24.00");
    }

    let cart: CartResponse = client
        .delete(format!("{}/api/cart/0", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].name, "Tote");

    let cart: CartResponse = client
        .delete(format!("{}/api/cart/0", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(cart.items_html.contains("Your cart is empty"));
}

#[tokio::test]
async fn http_donation_splits_and_rejects() {
    let server = spawn_server(&unique_data_path()).await;
    let client = Client::new();

    for amount in [Some(0.0), Some(-5.0), None] {
        let response = donate(&client, &server.base_url, amount).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.text().await.unwrap(),
            "Please select or enter a valid amount!"
        );
    }

    let response = donate(&client, &server.base_url, Some(100.0)).await;
    assert!(response.status().is_success());
    let donation: DonationResponse = response.json().await.unwrap();
    assert_eq!(
        donation.ledger,
        DonationLedger {
            reforestation: 35.0,
            methane: 25.0,
            renewables: 20.0,
            education: 10.0,
            operations: 10.0,
            total_donated: 100.0,
        }
    );
    assert_eq!(
        donation.notice.as_deref(),
        Some("You just donated $100! The planet thanks you")
    );
    assert_eq!(donation.chart_generation, 2);
    let chart = donation.chart.unwrap();
    assert_eq!(chart.values.iter().sum::<f64>(), 100.0);
    assert_eq!(chart.labels.len(), 5);
    assert_eq!(chart.title, "Total Raised So Far: $0.1k — Thank You!");
}

#[tokio::test]
async fn http_pay_now_uses_selected_preset() {
    let server = spawn_server(&unique_data_path()).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/donations/select", server.base_url))
        .json(&serde_json::json!({ "amount": 37.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{}/api/donations/select", server.base_url))
        .json(&serde_json::json!({ "amount": 25.0 }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let donation: DonationResponse = donate(&client, &server.base_url, None)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(donation.ledger.total_donated, 25.0);

    let donation: DonationResponse = donate(&client, &server.base_url, Some(10.0))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(donation.ledger.total_donated, 35.0);
}

#[tokio::test]
async fn http_ledgers_survive_restart() {
    let data_path = unique_data_path();
    let client = Client::new();

    {
        let server = spawn_server(&data_path).await;
        add_item(&client, &server.base_url, "Compost Starter", "$19.50").await;
        add_item(&client, &server.base_url, "Compost Starter", "$19.50").await;
        assert!(donate(&client, &server.base_url, Some(200.0)).await.status().is_success());
    }

    let server = spawn_server(&data_path).await;
    let cart: CartResponse = client
        .get(format!("{}/api/cart", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 2);
    assert_eq!(cart.total, "39.00");

    let donation: DonationResponse = client
        .get(format!("{}/api/donations", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(donation.ledger.total_donated, 200.0);
    assert_eq!(donation.ledger.reforestation, 70.0);
    assert!(donation.notice.is_none());

    let page = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Compost Starter"));

    let _ = std::fs::remove_file(&data_path);
}
