//! Integration tests for FitPlan.
//!
//! Each test boots the storefront in-process on an ephemeral port, with its
//! local order store in a temporary directory and, optionally, a fake
//! document store standing in for the remote collaborator.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fitplan-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::unwrap_used, clippy::expect_used)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use fitplan_core::StoredOrder;
use fitplan_storefront::config::{OrderStoreConfig, PaymentConfig, RemoteStoreConfig};
use fitplan_storefront::services::FileOrderStore;
use fitplan_storefront::{AppState, StorefrontConfig, app};
use reqwest::Client;
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;
use url::Url;

/// UPI address the test storefront is configured with.
pub const TEST_UPI_ID: &str = "coach@okaxis";

/// Contact number the test storefront is configured with.
pub const TEST_CONTACT_PHONE: &str = "919812345678";

/// How the fake document store answers writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteMode {
    /// No remote store configured
    Disabled,
    /// Accepts every write and returns a document id
    Accepting,
    /// Answers every write with 503
    Failing,
}

#[derive(Default)]
struct FakeStoreState {
    failing: bool,
    received: Mutex<Vec<Value>>,
}

/// In-process stand-in for the remote document store.
#[derive(Clone)]
pub struct FakeDocumentStore {
    url: Url,
    state: Arc<FakeStoreState>,
}

impl FakeDocumentStore {
    async fn spawn(failing: bool) -> Self {
        let state = Arc::new(FakeStoreState {
            failing,
            ..FakeStoreState::default()
        });
        let router = Router::new()
            .route("/{collection}", post(insert_document))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            url: Url::parse(&format!("http://{addr}/")).unwrap(),
            state,
        }
    }

    /// Documents accepted so far.
    #[must_use]
    pub fn received(&self) -> Vec<Value> {
        self.state.received.lock().unwrap().clone()
    }
}

async fn insert_document(
    State(state): State<Arc<FakeStoreState>>,
    Json(document): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if state.failing {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "maintenance" })),
        );
    }

    let mut received = state.received.lock().unwrap();
    received.push(document);
    let id = format!("doc-{}", received.len());
    (StatusCode::CREATED, Json(json!({ "id": id })))
}

/// A running storefront plus handles on its order stores.
pub struct TestContext {
    pub base_url: String,
    /// Cookie-keeping client that does not follow redirects.
    pub client: Client,
    pub remote: Option<FakeDocumentStore>,
    pub local_path: PathBuf,
    _temp: TempDir,
}

impl TestContext {
    /// Start a storefront with the given remote store behavior.
    pub async fn new(mode: RemoteMode) -> Self {
        let temp = tempfile::tempdir().unwrap();
        let local_path = temp.path().join("orders.json");

        let remote = match mode {
            RemoteMode::Disabled => None,
            RemoteMode::Accepting => Some(FakeDocumentStore::spawn(false).await),
            RemoteMode::Failing => Some(FakeDocumentStore::spawn(true).await),
        };

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        let config = StorefrontConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: addr.port(),
            base_url: base_url.clone(),
            payment: PaymentConfig {
                upi_id: TEST_UPI_ID.to_string(),
                payee_name: "Test Coach".to_string(),
                contact_phone: TEST_CONTACT_PHONE.to_string(),
            },
            orders: OrderStoreConfig {
                remote: remote.as_ref().map(|store| RemoteStoreConfig {
                    url: store.url.clone(),
                    collection: "orders".to_string(),
                    api_key: None,
                    timeout: Duration::from_secs(5),
                }),
                local_path: local_path.clone(),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
        };

        let state = AppState::new(config).unwrap();
        let router = app(state);
        tokio::spawn(async move {
            axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            base_url,
            client,
            remote,
            local_path,
            _temp: temp,
        }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a path without following redirects.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    /// POST a form to a path without following redirects.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    /// Orders written to the local fallback store.
    pub async fn local_orders(&self) -> Vec<StoredOrder> {
        FileOrderStore::new(&self.local_path).list().await.unwrap()
    }

    /// Choose a category and a plan, leaving the visitor on the intake form.
    pub async fn select_plan(&self, category: &str, plan: &str) {
        let resp = self
            .post_form("/wizard/category", &[("category", category)])
            .await;
        assert_eq!(location(&resp), "/plans");

        let resp = self.post_form("/plans", &[("plan", plan)]).await;
        assert_eq!(location(&resp), "/intake");
    }

    /// Walk the wizard to checkout with a valid diet intake.
    pub async fn reach_diet_checkout(&self, plan: &str) {
        self.select_plan("diet", plan).await;
        let resp = self.post_form("/intake", DIET_INTAKE).await;
        assert_eq!(location(&resp), "/checkout");
    }

    /// Walk the wizard to checkout with a valid workout intake.
    pub async fn reach_workout_checkout(&self, plan: &str) {
        self.select_plan("workout", plan).await;
        let resp = self.post_form("/intake", WORKOUT_INTAKE).await;
        assert_eq!(location(&resp), "/checkout");
    }
}

/// A valid diet intake submission.
pub const DIET_INTAKE: &[(&str, &str)] = &[
    ("name", "Priya Sharma"),
    ("age", "27"),
    ("gender", "female"),
    ("height", "165"),
    ("weight", "61"),
    ("goal_fat_loss", "true"),
    ("goal_improve_energy", "true"),
    ("whey_preference", "without"),
    ("diet_preferences", "Vegetarian at home, no mushrooms please"),
    ("meals_per_day", "4"),
    ("preworkout_meals", "true"),
    ("supplements_used", "true"),
    ("supplement_creatine", "true"),
    ("wakeup_time", "06:15"),
    ("sleep_time", "22:30"),
    ("budget", "5000"),
];

/// A valid workout intake submission.
pub const WORKOUT_INTAKE: &[(&str, &str)] = &[
    ("name", "Arjun Mehta"),
    ("age", "34"),
    ("gender", "male"),
    ("height", "178"),
    ("weight", "84"),
    ("goal_muscle_gain", "true"),
    ("activity_level", "moderately-active"),
];

/// The `Location` header of a redirect response.
#[must_use]
pub fn location(resp: &reqwest::Response) -> String {
    assert!(
        resp.status().is_redirection(),
        "expected redirect, got {}",
        resp.status()
    );
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
