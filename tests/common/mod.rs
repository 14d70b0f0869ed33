// tests/common/mod.rs

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use omr_backend::config::Config;
use omr_backend::error::AppError;
use omr_backend::grading::GradingService;
use omr_backend::identity::{IdentityError, IdentityProvider};
use omr_backend::models::result::{GradeReport, MarkedQuestion, Marker};
use omr_backend::models::session::{Session, SignInRequest};
use omr_backend::routes;
use omr_backend::state::AppState;
use omr_backend::store::{DocumentStore, MemoryStore};
use omr_backend::utils::jwt::sign_jwt;
use omr_backend::workflow::SheetImage;

pub const TEST_JWT_SECRET: &str = "test_secret_for_integration_tests";

/// The canned report most tests grade against: score 2, roll number 107,
/// middle answer wrong.
pub fn sample_report() -> GradeReport {
    GradeReport {
        score: 2,
        roll_no: "107".to_string(),
        answers: vec!["A".to_string(), "X".to_string(), "C".to_string()],
        marked_questions: vec![
            MarkedQuestion {
                question: Some("q1".to_string()),
                marker: Marker::Correct,
            },
            MarkedQuestion {
                question: Some("q2".to_string()),
                marker: Marker::Incorrect,
            },
            MarkedQuestion {
                question: Some("q3".to_string()),
                marker: Marker::Correct,
            },
        ],
    }
}

/// Scripted grading service double. Outcomes queue front-to-back; an
/// empty queue answers with the canned report.
pub struct ScriptedGrader {
    outcomes: Mutex<VecDeque<Result<GradeReport, AppError>>>,
    delay: Duration,
}

impl ScriptedGrader {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(VecDeque::new()),
            delay: Duration::ZERO,
        })
    }

    /// A grader that sits on each request for `delay` before answering,
    /// long enough for a test to overlap a second submit.
    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(VecDeque::new()),
            delay,
        })
    }

    pub async fn push(&self, outcome: Result<GradeReport, AppError>) {
        self.outcomes.lock().await.push_back(outcome);
    }
}

#[async_trait]
impl GradingService for ScriptedGrader {
    async fn grade(&self, _subject: &str, _image: &SheetImage) -> Result<GradeReport, AppError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.outcomes.lock().await.pop_front() {
            Some(outcome) => outcome,
            None => Ok(sample_report()),
        }
    }
}

/// Identity provider double. `live` controls whether confirm() still
/// vouches for a cached uid; `cancel_next` scripts an abandoned popup.
pub struct FakeIdentity {
    pub live: AtomicBool,
    pub cancel_next: AtomicBool,
}

impl FakeIdentity {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            live: AtomicBool::new(true),
            cancel_next: AtomicBool::new(false),
        })
    }

    fn session(uid: &str) -> Session {
        Session {
            uid: uid.to_string(),
            display_name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            photo_url: String::new(),
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_in(&self, credentials: &SignInRequest) -> Result<Session, IdentityError> {
        if self.cancel_next.swap(false, Ordering::SeqCst) {
            return Err(IdentityError::Cancelled);
        }
        let mut session = Self::session("uid_1");
        if let Some(email) = &credentials.email {
            session.email = email.clone();
        }
        Ok(session)
    }

    async fn confirm(&self, uid: &str) -> Result<Option<Session>, IdentityError> {
        if self.live.load(Ordering::SeqCst) {
            Ok(Some(Self::session(uid)))
        } else {
            Ok(None)
        }
    }
}

/// Store wrapper that counts writes and can simulate an outage for
/// chosen collections.
pub struct InstrumentedStore {
    inner: Arc<MemoryStore>,
    broken: std::sync::Mutex<HashSet<String>>,
    writes: std::sync::Mutex<HashMap<String, u32>>,
}

impl InstrumentedStore {
    pub fn wrap(inner: Arc<MemoryStore>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            broken: std::sync::Mutex::new(HashSet::new()),
            writes: std::sync::Mutex::new(HashMap::new()),
        })
    }

    pub fn break_collection(&self, collection: &str) {
        self.broken.lock().unwrap().insert(collection.to_string());
    }

    pub fn heal_collection(&self, collection: &str) {
        self.broken.lock().unwrap().remove(collection);
    }

    pub fn write_count(&self, collection: &str) -> u32 {
        *self.writes.lock().unwrap().get(collection).unwrap_or(&0)
    }

    fn check(&self, collection: &str) -> Result<(), AppError> {
        if self.broken.lock().unwrap().contains(collection) {
            return Err(AppError::Persistence("simulated store outage".to_string()));
        }
        Ok(())
    }

    fn count(&self, collection: &str) {
        *self
            .writes
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_insert(0) += 1;
    }
}

#[async_trait]
impl DocumentStore for InstrumentedStore {
    async fn get(&self, collection: &str, doc_id: &str) -> Result<Option<Value>, AppError> {
        self.inner.get(collection, doc_id).await
    }

    async fn put(&self, collection: &str, doc_id: &str, data: Value) -> Result<(), AppError> {
        self.check(collection)?;
        self.count(collection);
        self.inner.put(collection, doc_id, data).await
    }

    async fn merge(&self, collection: &str, doc_id: &str, data: Value) -> Result<(), AppError> {
        self.check(collection)?;
        self.count(collection);
        self.inner.merge(collection, doc_id, data).await
    }
}

/// Everything a test needs to drive the app end to end.
pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub memory: Arc<MemoryStore>,
    pub store: Arc<InstrumentedStore>,
    pub grader: Arc<ScriptedGrader>,
    pub identity: Arc<FakeIdentity>,
}

/// Helper function to spawn the app on a random port for testing.
/// Returns the harness with its scripted collaborators.
pub async fn spawn_app() -> TestApp {
    spawn_app_with_grader(ScriptedGrader::new()).await
}

pub async fn spawn_app_with_grader(grader: Arc<ScriptedGrader>) -> TestApp {
    let memory = Arc::new(MemoryStore::new());
    let store = InstrumentedStore::wrap(memory.clone());
    let identity = FakeIdentity::new();

    let config = Config {
        database_url: "postgres://unused-in-tests".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        grading_service_url: "http://127.0.0.1:9/".to_string(),
        grading_timeout_secs: 5,
        identity_provider_url: "http://127.0.0.1:9/".to_string(),
        rust_log: "error".to_string(),
        seed_subjects: None,
    };

    let state = AppState::new(config, store.clone(), identity.clone(), grader.clone());
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        client: reqwest::Client::new(),
        memory,
        store,
        grader,
        identity,
    }
}

impl TestApp {
    /// A valid session token for the fake identity's uid.
    pub fn token(&self) -> String {
        sign_jwt("uid_1", "admin@example.com", TEST_JWT_SECRET, 600).unwrap()
    }

    /// Seeds the subject list directly in the store.
    pub async fn seed_subjects(&self, subjects: &[&str]) {
        self.memory
            .put(
                "subject",
                "subjects",
                serde_json::json!({ "subjects": subjects }),
            )
            .await
            .unwrap();
    }

    pub async fn create_attempt(&self) -> String {
        let response = self
            .client
            .post(format!("{}/api/attempts", self.address))
            .send()
            .await
            .expect("Failed to create attempt");
        assert_eq!(response.status().as_u16(), 201);
        let body: Value = response.json().await.unwrap();
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn choose_subject(&self, id: &str, subject: &str) -> reqwest::Response {
        self.client
            .put(format!("{}/api/attempts/{}/subject", self.address, id))
            .json(&serde_json::json!({ "subject": subject }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn upload_image(&self, id: &str) -> reqwest::Response {
        let part = reqwest::multipart::Part::bytes(vec![0xFF, 0xD8, 0xFF, 0xE0])
            .file_name("sheet.jpg")
            .mime_str("image/jpeg")
            .unwrap();
        let form = reqwest::multipart::Form::new().part("file", part);

        self.client
            .put(format!("{}/api/attempts/{}/image", self.address, id))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn submit(&self, id: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/api/attempts/{}/submit", self.address, id))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn attempt_state(&self, id: &str) -> String {
        let response = self
            .client
            .get(format!("{}/api/attempts/{}", self.address, id))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 200);
        let body: Value = response.json().await.unwrap();
        body["state"].as_str().unwrap().to_string()
    }
}
