// src/tests/router_tests/dashboard_tests.rs

use crate::router::handle;
use crate::tests::utils::{body_string, get, test_state};

#[test]
fn dashboard_renders_market_overview() {
    let state = test_state(false);

    let resp = handle(get("/"), &state).expect("dashboard should render");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "text/html; charset=utf-8"
    );

    let body = body_string(resp);
    assert!(body.contains("Market Overview"));
    assert!(body.contains("Total Listings"));
    // karen: 60M and 80M
    assert!(body.contains("70,000,000"));
    assert!(body.contains("kilimani"));
    assert!(body.contains("2024-06"));
}

#[test]
fn location_filter_narrows_the_view() {
    let state = test_state(false);

    let body = body_string(handle(get("/?location=Kilimani"), &state).unwrap());

    // only the 12M apartment is left
    assert!(body.contains("12,000,000"));
    assert!(!body.contains("70,000,000"));
    // all locations stay selectable
    assert!(body.contains(r#"value="karen""#));
}

#[test]
fn type_filter_accepts_any_case() {
    let state = test_state(false);

    let body = body_string(handle(get("/?type=villa&type=HOUSE"), &state).unwrap());
    assert!(body.contains("70,000,000"));
    assert!(!body.contains("12,000,000"));
}

#[test]
fn uniform_amenity_scores_show_a_warning() {
    let state = test_state(false);

    let body = body_string(handle(get("/"), &state).unwrap());
    assert!(body.contains("Not enough variation in amenity scores"));
}

#[test]
fn unknown_property_type_is_a_bad_request() {
    let state = test_state(false);

    let err = handle(get("/?type=castle"), &state).unwrap_err();
    assert_eq!(err.status(), 400);
}

#[test]
fn empty_selection_renders_without_figures() {
    let state = test_state(false);

    let body = body_string(handle(get("/?location=nowhere"), &state).unwrap());
    assert!(body.contains("n/a"));
    assert!(body.contains("No dated listings in this selection."));
}

#[test]
fn unknown_route_is_not_found() {
    let state = test_state(false);

    let err = handle(get("/admin"), &state).unwrap_err();
    assert_eq!(err.status(), 404);

    let resp = crate::responses::error_to_response(err);
    assert_eq!(resp.status(), 404);
    assert!(body_string(resp).contains("Not Found"));
}
