use std::sync::{Arc, OnceLock};

use axum::Router;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::api::ApiClient;
use crate::core::{config::Settings, state::ClientState};
use crate::schemas::{Role, Session, UserProfile};
use crate::session::SessionStore;

const OVERRIDABLE_VARS: &[&str] = &[
    "EDUCONNECT_API_BASE_URL",
    "EDUCONNECT_HTTP_TIMEOUT_SECONDS",
    "EDUCONNECT_HTTP_CONNECT_TIMEOUT_SECONDS",
    "EDUCONNECT_STORE_PATH",
    "EDUCONNECT_STUDENT_MIN_SUBJECTS",
    "EDUCONNECT_STUDENT_MAX_SUBJECTS",
    "EDUCONNECT_NOTICE_REDIRECT_DELAY_MS",
    "EDUCONNECT_PAYMENT_REDIRECT_DELAY_MS",
    "EDUCONNECT_MAX_UPLOAD_SIZE_MB",
    "EDUCONNECT_ALLOWED_IMAGE_EXTENSIONS",
    "EDUCONNECT_MOMO_NUMBER",
    "EDUCONNECT_MOMO_NAME",
    "EDUCONNECT_LOG_LEVEL",
    "EDUCONNECT_LOG_JSON",
];

pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

pub(crate) fn set_test_env() {
    std::env::set_var("EDUCONNECT_ENV", "test");
    std::env::set_var("EDUCONNECT_STRICT_CONFIG", "0");
    for key in OVERRIDABLE_VARS {
        std::env::remove_var(key);
    }
}

pub(crate) fn settings_for(base_url: &str) -> Settings {
    Settings::for_base_url(base_url)
}

/// Client state against `base_url` with an in-memory session store.
pub(crate) fn client_state(base_url: &str) -> ClientState {
    let settings = settings_for(base_url);
    let api = ApiClient::from_settings(&settings).expect("api client");
    ClientState::new(settings, api, SessionStore::in_memory())
}

/// Serves `app` on an ephemeral local port and returns its base URL.
pub(crate) async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind mock backend");
    let addr = listener.local_addr().expect("mock backend addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock backend");
    });
    format!("http://{addr}")
}

pub(crate) async fn sign_in(client: &ClientState, role: Role, user_id: &str, token: &str) {
    let user = UserProfile {
        id: user_id.to_string(),
        role,
        full_name: Some("Test User".to_string()),
        email: None,
        phone: None,
        fields: serde_json::Map::new(),
    };
    let session = Session { token: token.to_string(), user_id: user_id.to_string(), role };
    client.store().save_session(&session, Some(&user)).await.expect("save session");
}
