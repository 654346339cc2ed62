//! Reference scenarios
//!
//! Each test seeds one document, runs one command and checks the status,
//! the match payload and the stored document afterwards.

use crate::common::*;

// ============================================================================
// Mutations
// ============================================================================

#[test]
fn dict_add_with_mkdir_p_creates_intermediate_objects() {
    let mock = mock_with("doc", "{}");
    let resp = run(
        &mock,
        SubdocCommand::new("doc", Opcode::DictAdd, "a.b")
            .with_value(r#""value""#)
            .with_path_flags(PathFlags::MKDIR_P),
    );
    assert_eq!(resp.status, Status::Success);
    assert!(resp.value.is_none());
    assert_eq!(body(&mock, "doc"), r#"{"a":{"b":"value"}}"#);
}

#[test]
fn replace_returns_no_match() {
    let mock = mock_with("doc", r#"{"x":1}"#);
    let resp = run(
        &mock,
        SubdocCommand::new("doc", Opcode::Replace, "x").with_value("2"),
    );
    assert_eq!(resp.status, Status::Success);
    assert!(resp.value.is_none());
    assert_eq!(body(&mock, "doc"), r#"{"x":2}"#);
}

#[test]
fn counter_returns_new_value() {
    let mock = mock_with("doc", r#"{"n":10}"#);
    let resp = run(
        &mock,
        SubdocCommand::new("doc", Opcode::Counter, "n").with_value("5"),
    );
    assert_eq!(resp.status, Status::Success);
    assert_eq!(resp.value_str(), Some("15"));
    assert_eq!(body(&mock, "doc"), r#"{"n":15}"#);
}

#[test]
fn push_last_appends_and_returns_value() {
    let mock = mock_with("doc", r#"{"arr":[1,2]}"#);
    let resp = run(
        &mock,
        SubdocCommand::new("doc", Opcode::ArrayPushLast, "arr").with_value(r#""z""#),
    );
    assert_eq!(resp.status, Status::Success);
    assert_eq!(resp.value_str(), Some(r#""z""#));
    assert_eq!(body(&mock, "doc"), r#"{"arr":[1,2,"z"]}"#);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn get_missing_path_is_path_not_found() {
    let mock = mock_with("doc", "{}");
    let before = cas(&mock, "doc");
    let resp = run(&mock, SubdocCommand::new("doc", Opcode::Get, "missing"));
    assert_eq!(resp.status, Status::SubdocPathNotFound);
    assert_eq!(resp.status.code(), 0xc0);
    assert_eq!(cas(&mock, "doc"), before);
}

#[test]
fn dict_add_existing_is_path_exists_and_unchanged() {
    let mock = mock_with("doc", r#"{"a":1}"#);
    let before = cas(&mock, "doc");
    let resp = run(
        &mock,
        SubdocCommand::new("doc", Opcode::DictAdd, "a").with_value("2"),
    );
    assert_eq!(resp.status, Status::SubdocPathExists);
    assert_eq!(body(&mock, "doc"), r#"{"a":1}"#);
    assert_eq!(cas(&mock, "doc"), before);
}

// ============================================================================
// Properties through the command layer
// ============================================================================

#[test]
fn every_mutation_changes_cas() {
    let mock = mock_with("doc", r#"{"n":0,"arr":[]}"#);
    let cmds = [
        SubdocCommand::new("doc", Opcode::Counter, "n").with_value("1"),
        SubdocCommand::new("doc", Opcode::ArrayPushFirst, "arr").with_value("0"),
        SubdocCommand::new("doc", Opcode::DictUpsert, "s").with_value(r#""x""#),
        SubdocCommand::new("doc", Opcode::Delete, "s"),
    ];
    let mut seen = vec![cas(&mock, "doc")];
    for cmd in cmds {
        let resp = run(&mock, cmd);
        assert_eq!(resp.status, Status::Success);
        assert!(!seen.contains(&resp.cas));
        assert_eq!(resp.cas, cas(&mock, "doc"));
        seen.push(resp.cas);
    }
    assert_eq!(body(&mock, "doc"), r#"{"n":1,"arr":[0]}"#);
}

#[test]
fn lookups_leave_cas_alone() {
    let mock = mock_with("doc", r#"{"a":[1,2,3]}"#);
    let before = cas(&mock, "doc");
    let resp = run(&mock, SubdocCommand::new("doc", Opcode::Get, "a[-1]"));
    assert_eq!(resp.value_str(), Some("3"));
    assert_eq!(resp.cas, before);
    let resp = run(&mock, SubdocCommand::new("doc", Opcode::Exists, "a[0]"));
    assert_eq!(resp.status, Status::Success);
    assert_eq!(cas(&mock, "doc"), before);
}

#[test]
fn upsert_then_get_returns_the_value() {
    let mock = mock_with("doc", "{}");
    let value = r#"{"nested":[true,null,"s"]}"#;
    let cmd = SubdocCommand::new("doc", Opcode::DictUpsert, "x.y")
        .with_value(value)
        .with_path_flags(PathFlags::MKDIR_P);
    run(&mock, cmd.clone());
    let first = body(&mock, "doc");
    run(&mock, cmd);
    assert_eq!(body(&mock, "doc"), first);

    let resp = run(&mock, SubdocCommand::new("doc", Opcode::Get, "x.y"));
    assert_eq!(resp.value_str(), Some(value));
}

#[test]
fn counter_round_trip_restores_document() {
    let original = r#"{"stats":{"hits":41}}"#;
    let mock = mock_with("doc", original);
    run(
        &mock,
        SubdocCommand::new("doc", Opcode::Counter, "stats.hits").with_value("+9"),
    );
    let resp = run(
        &mock,
        SubdocCommand::new("doc", Opcode::Counter, "stats.hits").with_value("-9"),
    );
    assert_eq!(resp.value_str(), Some("41"));
    assert_eq!(body(&mock, "doc"), original);
}

#[test]
fn add_unique_keeps_array_distinct() {
    let mock = mock_with("doc", r#"{"tags":[]}"#);
    for (value, expected) in [
        (r#""a""#, Status::Success),
        (r#""b""#, Status::Success),
        (r#""a""#, Status::SubdocPathExists),
        ("1", Status::Success),
        ("1", Status::SubdocPathExists),
    ] {
        let resp = run(
            &mock,
            SubdocCommand::new("doc", Opcode::ArrayAddUnique, "tags").with_value(value),
        );
        assert_eq!(resp.status, expected, "{}", value);
    }
    assert_eq!(body(&mock, "doc"), r#"{"tags":["a","b",1]}"#);
}

#[test]
fn mkdir_p_creates_only_the_missing_chain() {
    let mock = mock_with("doc", r#"{"a":{"keep":1}}"#);
    let cmd = SubdocCommand::new("doc", Opcode::DictUpsert, "a.b.c.d")
        .with_value("true")
        .with_path_flags(PathFlags::MKDIR_P);
    assert_eq!(run(&mock, cmd.clone()).status, Status::Success);
    let once = body(&mock, "doc");
    assert_eq!(once, r#"{"a":{"keep":1,"b":{"c":{"d":true}}}}"#);

    assert_eq!(run(&mock, cmd).status, Status::Success);
    assert_eq!(body(&mock, "doc"), once);
}

#[test]
fn array_insert_multi_value() {
    let mock = mock_with("doc", "[1,5]");
    let resp = run(
        &mock,
        SubdocCommand::new("doc", Opcode::ArrayInsert, "[1]").with_value("2,3,4"),
    );
    assert_eq!(resp.status, Status::Success);
    assert_eq!(resp.value_str(), Some("2,3,4"));
    assert_eq!(body(&mock, "doc"), "[1,2,3,4,5]");
}

#[test]
fn delete_keeps_member_order() {
    let mock = mock_with("doc", r#"{"z":1,"a":2,"m":3}"#);
    run(&mock, SubdocCommand::new("doc", Opcode::Delete, "a"));
    assert_eq!(body(&mock, "doc"), r#"{"z":1,"m":3}"#);
}
