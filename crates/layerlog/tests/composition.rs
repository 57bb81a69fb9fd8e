//! Field layering as seen through the public API.

use std::sync::Arc;

use layerlog::{FieldValue, JsonWriter, Level, Logger, fields};
use layerlog_test::{BufferWriter, TestHarness, test_error, test_request_fields, test_static_fields};

#[test]
fn test_all_three_layers_are_merged() {
    let harness = TestHarness::new();
    let logger = harness.logger(Level::Debug.as_i32(), "checkout", &test_static_fields());
    logger.set_dyna(&test_request_fields());

    logger.info("order placed", &fields!["order_id", 991, "total", 42.5]);

    let record = harness.normal.last().unwrap();
    assert_eq!(record.message, "order placed");
    assert_eq!(record.field("name"), Some(&FieldValue::from("checkout")));
    assert_eq!(record.field("service"), Some(&FieldValue::from("checkout")));
    assert_eq!(record.field("request_id"), Some(&FieldValue::from("r-42")));
    assert_eq!(record.field("order_id"), Some(&FieldValue::Int(991)));
    assert_eq!(record.field("total"), Some(&FieldValue::Float(42.5)));
}

#[test]
fn test_static_beats_dynamic_beats_message() {
    let harness = TestHarness::new();
    let logger = harness.logger(1, "svc", &fields!["region", "static"]);
    logger.set_dyna(&fields!["region", "dynamic", "user", "dynamic"]);

    logger.warn("collision", &fields!["region", "message", "user", "message", "attempt", 2]);

    let record = harness.normal.last().unwrap();
    assert_eq!(record.field("region"), Some(&FieldValue::from("static")));
    assert_eq!(record.field("user"), Some(&FieldValue::from("dynamic")));
    assert_eq!(record.field("attempt"), Some(&FieldValue::Int(2)));
}

#[test]
fn test_fields_can_override_name() {
    let harness = TestHarness::new();
    let logger = harness.logger(1, "svc", &fields!["name", "from-static"]);

    logger.info("hello", &[]);

    let record = harness.normal.last().unwrap();
    assert_eq!(record.field("name"), Some(&FieldValue::from("from-static")));
}

#[test]
fn test_null_pairs_do_not_shift_later_pairs() {
    let harness = TestHarness::new();
    let logger = harness.logger(1, "", &[]);

    logger.info(
        "partial",
        &fields!["a", None::<&str>, "b", 2, None::<&str>, "orphan", "c", 3, "trailing"],
    );

    let record = harness.normal.last().unwrap();
    assert_eq!(record.fields.len(), 2);
    assert_eq!(record.field("b"), Some(&FieldValue::Int(2)));
    assert_eq!(record.field("c"), Some(&FieldValue::Int(3)));
    assert!(record.field("a").is_none());
    assert!(record.field("trailing").is_none());
}

#[test]
fn test_non_string_keys_are_stringified() {
    let harness = TestHarness::new();
    let logger = harness.logger(1, "", &[]);

    logger.info("keys", &fields![7, "seven", true, "yes", 1.5, "half"]);

    let record = harness.normal.last().unwrap();
    assert_eq!(record.field("7"), Some(&FieldValue::from("seven")));
    assert_eq!(record.field("true"), Some(&FieldValue::from("yes")));
    assert_eq!(record.field("1.5"), Some(&FieldValue::from("half")));
}

#[test]
fn test_empty_name_is_not_written() {
    let harness = TestHarness::new();
    let logger = harness.logger(1, "", &fields!["env", "prod"]);

    logger.info("anonymous", &[]);

    let record = harness.normal.last().unwrap();
    assert!(record.field("name").is_none());
    assert_eq!(record.field("env"), Some(&FieldValue::from("prod")));
}

#[test]
fn test_args_form_uses_first_argument_as_message() {
    let harness = TestHarness::new();
    let logger = harness.logger(Level::Debug.as_i32(), "svc", &[]);

    logger.debug_args(&fields!["cache miss", "key", "user:7"]);
    logger.info_args(&fields![404, "path", "/missing"]);
    logger.warn_args(&[]);

    let records = harness.normal_records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].message, "cache miss");
    assert_eq!(records[0].field("key"), Some(&FieldValue::from("user:7")));
    assert_eq!(records[1].message, "404");
}

#[test]
fn test_error_args_without_message() {
    let harness = TestHarness::new();
    let logger = harness.logger(1, "svc", &[]);

    logger.error_args(&test_error("disk"), &[]);

    let record = harness.error.last().unwrap();
    assert_eq!(record.message, "");
    assert_eq!(record.error.as_deref(), Some("test failure: disk"));
}

#[test]
fn test_dynamic_fields_apply_to_later_calls_only() {
    let harness = TestHarness::new();
    let logger = harness.logger(1, "", &[]);

    logger.info("before", &[]);
    logger.add_dyna("tenant", "acme");
    logger.info("during", &[]);
    logger.reset_dyna();
    logger.info("after", &[]);

    let records = harness.normal_records();
    assert!(records[0].field("tenant").is_none());
    assert_eq!(records[1].field("tenant"), Some(&FieldValue::from("acme")));
    assert!(records[2].field("tenant").is_none());
}

#[test]
fn test_json_line_end_to_end() {
    let harness = TestHarness::new();
    let normal = BufferWriter::new();
    let errors = BufferWriter::new();
    let logger = Logger::builder(1)
        .name("billing")
        .static_fields(&fields!["region", "eu"])
        .config(Arc::clone(&harness.config))
        .normal_writer(Arc::new(JsonWriter::new(normal.clone()).without_timestamps()))
        .error_writer(Arc::new(JsonWriter::new(errors.clone()).without_timestamps()))
        .build();
    logger.set_dyna(&fields!["request_id", "r-1"]);

    logger.info("charged", &fields!["amount", 1200]);
    logger.error(&test_error("card declined"), "charge failed", &[]);

    assert_eq!(
        normal.contents(),
        "{\"level\":\"info\",\"amount\":1200,\"name\":\"billing\",\"region\":\"eu\",\"request_id\":\"r-1\",\"message\":\"charged\"}\n"
    );

    let lines = errors.json_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["level"], "error");
    assert_eq!(lines[0]["error"], "test failure: card declined");
    assert_eq!(lines[0]["message"], "charge failed");
}

#[test]
fn test_json_severity_survives_level_field() {
    let harness = TestHarness::new();
    let output = BufferWriter::new();
    let logger = Logger::builder(1)
        .config(Arc::clone(&harness.config))
        .normal_writer(Arc::new(JsonWriter::new(output.clone()).without_timestamps()))
        .error_writer(harness.error.clone())
        .build();
    logger.set_dyna(&fields!["level", "from-dynamic"]);

    logger.warn("disk almost full", &fields!["level", 97, "message", "x", "used", 97]);

    let lines = output.json_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["level"], "warn");
    assert_eq!(lines[0]["message"], "disk almost full");
    assert_eq!(lines[0]["used"], 97);
}

#[test]
fn test_failing_output_is_swallowed() {
    let harness = TestHarness::new();
    let logger = Logger::builder(1)
        .config(Arc::clone(&harness.config))
        .normal_writer(Arc::new(JsonWriter::new(layerlog_test::FailingWriter)))
        .error_writer(harness.error.clone())
        .build();

    logger.info("lost", &[]);
    logger.error(&test_error("still delivered"), "kept", &[]);

    assert_eq!(harness.error_records().len(), 1);
}
