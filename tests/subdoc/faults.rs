//! Status translation
//!
//! One command per fault class; every failure leaves the stored document
//! and its CAS untouched.

use crate::common::*;

const DOC: &str = r#"{"obj":{"k":1},"arr":[1,[2]],"num":9223372036854775807,"str":"s"}"#;

fn expect(opcode: Opcode, path: &str, value: &str, status: Status) {
    let mock = mock_with("doc", DOC);
    let before = cas(&mock, "doc");
    let resp = run(
        &mock,
        SubdocCommand::new("doc", opcode, path).with_value(value),
    );
    assert_eq!(resp.status, status, "{} {} {}", opcode, path, value);
    assert_eq!(resp.cas, 0);
    assert_eq!(body(&mock, "doc"), DOC);
    assert_eq!(cas(&mock, "doc"), before);
}

#[test]
fn path_not_found() {
    expect(Opcode::Get, "obj.missing", "", Status::SubdocPathNotFound);
    expect(Opcode::Replace, "arr[5]", "1", Status::SubdocPathNotFound);
    expect(Opcode::Delete, "nope", "", Status::SubdocPathNotFound);
    expect(Opcode::Exists, "obj.x", "", Status::SubdocPathNotFound);
}

#[test]
fn path_mismatch() {
    expect(Opcode::Get, "arr.k", "", Status::SubdocPathMismatch);
    expect(Opcode::ArrayPushLast, "obj", "1", Status::SubdocPathMismatch);
    expect(Opcode::DictUpsert, "str.k", "1", Status::SubdocPathMismatch);
}

#[test]
fn path_invalid() {
    expect(Opcode::Get, "obj..k", "", Status::SubdocPathInvalid);
    expect(Opcode::Get, "arr[x]", "", Status::SubdocPathInvalid);
    expect(Opcode::DictUpsert, "arr[0]", "1", Status::SubdocPathInvalid);
    expect(Opcode::Counter, "", "1", Status::SubdocPathInvalid);
}

#[test]
fn path_too_big() {
    let long = vec!["k"; 40].join(".");
    expect(Opcode::Get, &long, "", Status::SubdocPathTooBig);
}

#[test]
fn value_cannot_insert() {
    expect(Opcode::DictUpsert, "x", "not json", Status::SubdocValueCannotInsert);
    expect(Opcode::DictUpsert, "x", "", Status::SubdocValueCannotInsert);
    expect(Opcode::ArrayAddUnique, "arr", "3", Status::SubdocValueCannotInsert);
    expect(Opcode::Counter, "num", "abc", Status::SubdocValueCannotInsert);
}

#[test]
fn counter_ranges() {
    expect(Opcode::Counter, "num", "1", Status::SubdocNumberRange);
    expect(Opcode::Counter, "str", "1", Status::SubdocDeltaRange);
    expect(Opcode::Counter, "obj.k", "0", Status::SubdocDeltaRange);
    expect(
        Opcode::Counter,
        "obj.k",
        "99999999999999999999",
        Status::SubdocDeltaRange,
    );
}

#[test]
fn path_exists() {
    expect(Opcode::DictAdd, "obj.k", "2", Status::SubdocPathExists);
    expect(Opcode::ArrayAddUnique, "obj.k", "1", Status::SubdocPathMismatch);
}

#[test]
fn depth_limits() {
    let deep_value = format!("{}1{}", "[".repeat(40), "]".repeat(40));
    expect(Opcode::DictUpsert, "x", &deep_value, Status::SubdocValueTooDeep);

    let deep_doc = format!("{}{}", "[".repeat(40), "]".repeat(40));
    let mock = mock_with("deep", &deep_doc);
    let resp = run(&mock, SubdocCommand::new("deep", Opcode::Get, ""));
    assert_eq!(resp.status, Status::SubdocDocTooDeep);
}

#[test]
fn doc_not_json() {
    let mock = mock_with("text", "plain text");
    let resp = run(&mock, SubdocCommand::new("text", Opcode::Get, "a"));
    assert_eq!(resp.status, Status::SubdocDocNotJson);
    let resp = run(
        &mock,
        SubdocCommand::new("text", Opcode::Replace, "").with_value(r#"{"now":"json"}"#),
    );
    assert_eq!(resp.status, Status::Success);
    assert_eq!(body(&mock, "text"), r#"{"now":"json"}"#);
}

#[test]
fn cas_mismatch_is_key_exists() {
    let mock = mock_with("doc", DOC);
    let stale = cas(&mock, "doc");
    run(
        &mock,
        SubdocCommand::new("doc", Opcode::DictUpsert, "x").with_value("1"),
    );
    let resp = run(
        &mock,
        SubdocCommand::new("doc", Opcode::DictUpsert, "y")
            .with_value("1")
            .with_cas(stale),
    );
    assert_eq!(resp.status, Status::KeyExists);
}

#[test]
fn too_big_result() {
    let mock = Mock::new(MockConfig {
        item_size_max: 64,
        ..MockConfig::default()
    });
    mock.store().add(Document::new("doc", "{}")).unwrap();
    let resp = run(
        &mock,
        SubdocCommand::new("doc", Opcode::DictUpsert, "x").with_value(format!("\"{}\"", "a".repeat(100))),
    );
    assert_eq!(resp.status, Status::TooBig);
    assert_eq!(body(&mock, "doc"), "{}");
}
