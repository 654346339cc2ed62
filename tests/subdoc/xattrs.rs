//! Extended attribute paths
//!
//! XATTR-flagged commands address the xattr buffer; the body is carried
//! through untouched and does not count towards the size limit.

use crate::common::*;

fn xattr_cmd(key: &str, opcode: Opcode, path: &str) -> SubdocCommand {
    SubdocCommand::new(key, opcode, path).with_path_flags(PathFlags::XATTR)
}

#[test]
fn absent_xattrs_read_as_empty_object() {
    let mock = mock_with("doc", r#"{"a":1}"#);
    let resp = run(&mock, xattr_cmd("doc", Opcode::Get, ""));
    assert_eq!(resp.status, Status::Success);
    assert_eq!(resp.value_str(), Some("{}"));
    let resp = run(&mock, xattr_cmd("doc", Opcode::Exists, "meta"));
    assert_eq!(resp.status, Status::SubdocPathNotFound);
}

#[test]
fn xattr_upsert_preserves_body() {
    let mock = mock_with("doc", r#"{"a":1}"#);
    let resp = run(
        &mock,
        xattr_cmd("doc", Opcode::DictUpsert, "_sync.rev")
            .with_path_flags(PathFlags::XATTR | PathFlags::MKDIR_P)
            .with_value(r#""1-abc""#),
    );
    assert_eq!(resp.status, Status::Success);
    assert_eq!(body(&mock, "doc"), r#"{"a":1}"#);
    assert_eq!(xattr(&mock, "doc").as_deref(), Some(r#"{"_sync":{"rev":"1-abc"}}"#));
}

#[test]
fn body_mutation_preserves_xattrs() {
    let mock = mock();
    mock.store()
        .add(Document::new("doc", r#"{"n":1}"#).with_xattr(r#"{"meta":true}"#))
        .unwrap();
    run(
        &mock,
        SubdocCommand::new("doc", Opcode::Counter, "n").with_value("1"),
    );
    assert_eq!(body(&mock, "doc"), r#"{"n":2}"#);
    assert_eq!(xattr(&mock, "doc").as_deref(), Some(r#"{"meta":true}"#));
}

#[test]
fn xattr_counter_on_new_document() {
    let mock = mock();
    let resp = run(
        &mock,
        xattr_cmd("doc", Opcode::Counter, "seq")
            .with_value("1")
            .with_doc_flags(DocFlags::MKDOC),
    );
    assert_eq!(resp.status, Status::Success);
    assert_eq!(resp.value_str(), Some("1"));
    assert_eq!(xattr(&mock, "doc").as_deref(), Some(r#"{"seq":1}"#));
    assert!(mock.store().get("doc").unwrap().body.is_none());
}

#[test]
fn xattr_size_does_not_count() {
    let mock = Mock::new(MockConfig {
        item_size_max: 32,
        ..MockConfig::default()
    });
    mock.store().add(Document::new("doc", "{}")).unwrap();
    let big = format!("\"{}\"", "x".repeat(256));
    let resp = run(
        &mock,
        xattr_cmd("doc", Opcode::DictUpsert, "blob").with_value(big),
    );
    assert_eq!(resp.status, Status::Success);
}

#[test]
fn mutation_token_on_request() {
    let mock = mock_with("doc", "{}");
    let features = ClientFeatures {
        xerror: true,
        mutation_tokens: true,
    };
    let first = run(
        &mock,
        xattr_cmd("doc", Opcode::DictUpsert, "a")
            .with_value("1")
            .with_features(features),
    );
    let second = run(
        &mock,
        xattr_cmd("doc", Opcode::DictUpsert, "b")
            .with_value("2")
            .with_features(features),
    );
    let (a, b) = (first.mutation_token.unwrap(), second.mutation_token.unwrap());
    assert_eq!(a.vbucket, mock.store().vbucket_for("doc"));
    assert_eq!(a.vbucket_uuid, b.vbucket_uuid);
    assert!(b.seqno > a.seqno);
}
