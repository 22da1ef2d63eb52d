use super::*;

#[test]
fn request_sets_fields() {
    let frame = Frame::request("upload:submit", Data::new());
    assert_eq!(frame.syscall, "upload:submit");
    assert_eq!(frame.status, Status::Request);
    assert!(frame.parent_id.is_none());
    assert!(frame.ts > 0);
}

#[test]
fn event_is_parentless_item() {
    let frame = Frame::event("upload:changed", Data::new());
    assert_eq!(frame.status, Status::Item);
    assert!(frame.parent_id.is_none());
}

#[test]
fn done_with_carries_payload_and_parent() {
    let req = Frame::request("upload:remove", Data::new());
    let mut data = Data::new();
    data.insert("removed".into(), serde_json::json!(2));
    let done = req.done_with(data);

    assert_eq!(done.parent_id, Some(req.id));
    assert_eq!(done.syscall, "upload:remove");
    assert_eq!(done.status, Status::Done);
    assert_eq!(done.data.get("removed").and_then(serde_json::Value::as_u64), Some(2));
}

#[test]
fn status_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Status::Item).unwrap(), r#""item""#);
    assert_eq!(serde_json::from_str::<Status>(r#""error""#).unwrap(), Status::Error);
}

#[test]
fn prefix_extraction() {
    let frame = Frame::request("upload:list", Data::new());
    assert_eq!(frame.prefix(), "upload");

    let frame = Frame::request("noseparator", Data::new());
    assert_eq!(frame.prefix(), "noseparator");
}

#[test]
fn client_frame_without_data_parses() {
    let id = Uuid::new_v4();
    let json = format!(r#"{{"id":"{id}","parent_id":null,"ts":1,"syscall":"upload:list","status":"request"}}"#);
    let frame: Frame = serde_json::from_str(&json).unwrap();
    assert_eq!(frame.id, id);
    assert!(frame.data.is_empty());
}

#[test]
fn data_str_reads_string_fields_only() {
    let frame = Frame::request("upload:submit", Data::new())
        .with_data("name", "Login.fig")
        .with_data("count", 3);
    assert_eq!(frame.data_str("name"), Some("Login.fig"));
    assert_eq!(frame.data_str("count"), None);
    assert_eq!(frame.data_str("missing"), None);
}

#[test]
fn error_from_typed() {
    let req = Frame::request("upload:submit", Data::new());
    let err = req.error_from(&crate::services::upload::UploadError::EmptyIdentifier);

    assert_eq!(err.status, Status::Error);
    assert_eq!(err.parent_id, Some(req.id));
    assert_eq!(err.data_str("code"), Some("E_EMPTY_IDENTIFIER"));
    assert_eq!(err.data_str("message"), Some("file name must not be empty"));
    assert_eq!(err.data.get("retryable").and_then(serde_json::Value::as_bool), Some(false));
}
