use super::*;

use portal::attachment::Attachment;

fn token_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("nested").join("token")
}

#[test]
fn file_store_is_empty_before_login() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileTokenStore::new(token_path(&dir));
    assert_eq!(store.load(), None);
}

#[test]
fn file_store_saves_and_trims_token() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileTokenStore::new(token_path(&dir));
    store.save("abc123\n");
    assert_eq!(store.load().as_deref(), Some("abc123"));
}

#[test]
fn file_store_clear_removes_file_and_tolerates_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileTokenStore::new(token_path(&dir));
    store.save("abc123");
    store.clear();
    assert!(!store.path().exists());
    store.clear();
    assert_eq!(store.load(), None);
}

#[test]
fn blank_file_is_not_a_token() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("token");
    fs::write(&path, "   \n").expect("write");
    assert_eq!(FileTokenStore::new(path).load(), None);
}

#[test]
fn url_joins_without_double_slash() {
    let dir = tempfile::tempdir().expect("tempdir");
    let client = HttpPortalApi::new(reqwest::Client::new(), "http://portal.test/", FileTokenStore::new(token_path(&dir)));
    assert_eq!(client.url(LOGIN_PATH), "http://portal.test/api/auth/login");
}

#[test]
fn multipart_form_accepts_text_and_files() {
    let parts = vec![
        Part::Text { name: "libelle", value: "Routeurs".to_owned() },
        Part::File { name: "courrier", file: Attachment::new("letter.pdf", "application/pdf", b"%PDF".to_vec()) },
    ];
    assert!(multipart_form(parts).is_ok());
}

#[test]
fn multipart_form_rejects_bad_content_type() {
    let parts = vec![Part::File { name: "courrier", file: Attachment::new("letter.pdf", "not a mime", vec![1]) }];
    assert!(matches!(multipart_form(parts), Err(ApiError::Transport(_))));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);

    let dir = tempfile::tempdir().expect("tempdir");
    let client = HttpPortalApi::new(
        reqwest::Client::new(),
        &format!("http://127.0.0.1:{port}"),
        FileTokenStore::new(token_path(&dir)),
    );
    let result = client.overview().await;
    assert!(matches!(result, Err(ApiError::Transport(_))));
}
