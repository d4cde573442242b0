use std::sync::Arc;

use educonnect_client::api::ApiClient;
use educonnect_client::core::{config::Settings, state::ClientState};
use educonnect_client::schemas::Role;
use educonnect_client::session::{FileStore, KeyValueStore, SessionStore, StorageKey};
use educonnect_client::workflow::{SignupField, SignupFlow, SignupState};

fn client_at(path: &std::path::Path) -> ClientState {
    let settings = Settings::defaults()
        .with_api_base_url("http://127.0.0.1:9")
        .expect("base url")
        .with_store_path(path);
    let api = ApiClient::from_settings(&settings).expect("api client");
    let backend: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(path));
    ClientState::new(settings, api, SessionStore::new(backend))
}

#[tokio::test]
async fn signup_draft_survives_a_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("session.json");

    let first = client_at(&path);
    let mut flow = SignupFlow::start(&first, Role::Student).await.expect("start");
    flow.set_field(SignupField::FullName, "Ama Mensah");
    flow.set_field(SignupField::Email, "ama@example.com");
    flow.set_curriculum("Cambridge");
    flow.set_package("One on One");
    flow.save(&first).await.expect("save");
    drop(first);

    let second = client_at(&path);
    let resumed = SignupFlow::load(&second).await.expect("draft persisted");
    assert_eq!(resumed.draft(), flow.draft());
    assert_eq!(resumed.draft().package_key(), "ONE-ON-ONE");
    assert_eq!(resumed.state(), &SignupState::Editing { grade_set: false });
}

#[tokio::test]
async fn corrupt_store_reads_as_signed_out() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.json");
    tokio::fs::write(&path, b"{not json").await.expect("write");

    let client = client_at(&path);
    assert!(client.store().session().await.is_none());
    assert!(client.store().text(StorageKey::Token).await.is_none());
    assert!(SignupFlow::load(&client).await.is_none());
}
