// src/tests/router_tests/predict_tests.rs

use crate::router::handle;
use crate::tests::utils::{body_string, get, test_state};

#[test]
fn bare_predict_shows_the_form() {
    // the form doesn't need a model
    let state = test_state(false);

    let resp = handle(get("/predict"), &state).expect("form should render");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Nairobi Property Price Predictor"));
    assert!(body.contains(r#"<option value="lavington" selected>"#));
    assert!(!body.contains("Prediction Result"));
}

#[test]
fn prediction_uses_the_model_and_its_error_margin() {
    let state = test_state(true);

    let resp = handle(
        get("/predict?location=Karen&bedrooms=3&bathrooms=2&size=120&amenity_score=10"),
        &state,
    )
    .expect("prediction should render");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    // 5M intercept + 3 x 1M + 10M for karen
    assert!(body.contains("KES 18,000,000"));
    assert!(body.contains("KES 16,000,000 - KES 20,000,000"));
    assert!(body.contains(r#"<option value="karen" selected>"#));
}

#[test]
fn missing_params_fall_back_to_form_defaults() {
    let state = test_state(true);

    // lavington has no coefficient: 5M + 3 x 1M
    let body = body_string(handle(get("/predict?bedrooms=3"), &state).unwrap());
    assert!(body.contains("KES 8,000,000"));
}

#[test]
fn prediction_without_a_model_is_unavailable() {
    let state = test_state(false);

    let err = handle(get("/predict?location=karen"), &state).unwrap_err();
    assert_eq!(err.status(), 503);
}

#[test]
fn out_of_range_input_is_a_bad_request() {
    let state = test_state(true);

    for uri in [
        "/predict?bedrooms=11",
        "/predict?size=5",
        "/predict?location=mombasa",
        "/predict?bathrooms=two",
    ] {
        let err = handle(get(uri), &state).unwrap_err();
        assert_eq!(err.status(), 400, "{uri}");
    }
}
