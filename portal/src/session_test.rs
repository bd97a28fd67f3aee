use super::*;
use serde_json::json;

#[test]
fn new_session_is_anonymous() {
    let session = Session::new(MemoryTokenStore::default());
    assert!(!session.is_authenticated());
    assert_eq!(session.bearer(), None);
}

#[test]
fn absorb_persists_top_level_token() {
    let session = Session::new(MemoryTokenStore::default());
    assert!(session.absorb(&json!({ "token": "abc", "user": {} })));
    assert!(session.is_authenticated());
    assert_eq!(session.bearer().as_deref(), Some("Bearer abc"));
}

#[test]
fn absorb_reads_nested_access_token() {
    let session = Session::new(MemoryTokenStore::default());
    assert!(session.absorb(&json!({ "data": { "accessToken": "xyz" } })));
    assert_eq!(session.token().as_deref(), Some("xyz"));
}

#[test]
fn absorb_without_token_keeps_existing() {
    let session = Session::new(MemoryTokenStore::with_token("old"));
    assert!(!session.absorb(&json!({ "message": "ok" })));
    assert!(!session.absorb(&json!({ "token": "" })));
    assert_eq!(session.token().as_deref(), Some("old"));
}

#[test]
fn blank_stored_token_is_not_authenticated() {
    let session = Session::new(MemoryTokenStore::with_token("  "));
    assert!(!session.is_authenticated());
}

#[test]
fn sign_out_clears_store() {
    let session = Session::new(MemoryTokenStore::with_token("t"));
    session.sign_out();
    assert!(!session.is_authenticated());
    assert_eq!(session.store().load(), None);
}
