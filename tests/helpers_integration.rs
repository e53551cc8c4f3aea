//! The stateless helpers working together on a typical request path.

use chrono::{TimeZone, Utc};
use quas_utils::datetime::{format_date_readable, format_datetime, to_gmt_plus_1, DEFAULT_FORMAT};
use quas_utils::keys::normalize_keys;
use quas_utils::logging::{console_log, log_exception};
use quas_utils::misc::{paginate, parse_bool, parse_int};
use quas_utils::{error_response, success_response, timed};
use serde_json::{json, Map, Value};

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn list_endpoint_builds_normalized_page() {
    init_logging();

    let rows: Vec<Value> = (1..=12)
        .map(|id| json!({"postId": id, "authorName": "Ada"}))
        .collect();
    let page = parse_int("2").unwrap_or(1) as usize;
    let include_meta = parse_bool(Some("yes"));

    let items = timed("load_posts", || paginate(&rows, page, 5).to_vec());
    console_log("posts", format!("served {} items", items.len()));

    let mut data = Map::new();
    data.insert("items".into(), normalize_keys(Value::Array(items)));
    if include_meta {
        data.insert("meta".into(), normalize_keys(json!({"pageNumber": page})));
    }

    let resp = success_response("posts fetched", 200, Some(data));
    let body = resp.to_value().unwrap();

    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["items"][0], json!({"post_id": 6, "author_name": "Ada"}));
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"]["meta"], json!({"page_number": 2}));
}

#[test]
fn bad_input_produces_logged_error_envelope() {
    init_logging();

    let err = match "twelve".parse::<u32>() {
        Ok(_) => panic!("Expected parse failure"),
        Err(err) => err,
    };
    log_exception("parsing page size", &err);

    let resp = error_response(err.to_string(), 400, None);
    assert_eq!(resp.status_code(), 400);
    assert_eq!(
        resp.to_json_string().unwrap(),
        r#"{"status":"failed","status_code":400,"message":"invalid digit found in string"}"#
    );
}

#[test]
fn utc_instant_rendered_for_gmt_plus_1_readers() {
    let published = Utc.with_ymd_and_hms(2024, 3, 31, 23, 30, 0).unwrap();
    let local = to_gmt_plus_1(published);

    assert_eq!(
        format_datetime(&local, DEFAULT_FORMAT).unwrap(),
        "2024-04-01 00:30:00"
    );
    assert_eq!(format_date_readable(&local), "1st April");
}
