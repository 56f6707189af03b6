// src/tests/router_tests/download_tests.rs

use crate::router::handle;
use crate::tests::utils::{body_string, get, test_state};
use std::io::Read;

#[test]
fn csv_download_is_an_attachment_with_every_row() {
    let state = test_state(false);

    let resp = handle(get("/download.csv"), &state).expect("csv export");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        resp.headers().get("Content-Disposition").unwrap(),
        "attachment; filename=\"nairobi_listings.csv\""
    );

    let body = body_string(resp);
    let mut lines = body.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("Location,"));
    assert!(header.ends_with("price_per_sqft,amenity_score"));
    assert_eq!(lines.count(), 3);
    assert!(body.contains("kilimani,Apartment,3,2,150,Gym,12000000,2024-06-01"));
}

#[test]
fn xlsx_download_is_a_workbook() {
    let state = test_state(false);

    let mut resp = handle(get("/download.xlsx"), &state).expect("xlsx export");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );

    let mut bytes = Vec::new();
    resp.body_mut().reader().read_to_end(&mut bytes).unwrap();
    // xlsx files are zip archives
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn downloads_ignore_the_dashboard_filter() {
    let state = test_state(false);

    let body = body_string(handle(get("/download.csv?location=karen"), &state).unwrap());
    assert_eq!(body.lines().count(), 1 + 3);
}

#[test]
fn post_is_not_routed() {
    let state = test_state(false);

    let req = http::Request::builder()
        .method(http::Method::POST)
        .uri("/download.csv")
        .body(astra::Body::empty())
        .unwrap();

    assert_eq!(handle(req, &state).unwrap_err().status(), 404);
}
