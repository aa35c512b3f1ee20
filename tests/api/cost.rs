use reqwest::StatusCode;

use sqlx::PgPool;

use subscription_service::model::TotalCost;

use crate::helpers::{NewSubscription, TestApp};

const ALICE: &str = "60601fee-2bf1-4721-ae6f-7636e79a0cba";
const BOB: &str = "0b7f1f86-5b3c-4a31-8c1c-9f3a2f5e0d11";

async fn total_cost(app: &TestApp, query: &[(&str, &str)]) -> i64 {
    let res = app
        .subscription_cost(query)
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());

    let body: TotalCost = res.json().await.expect("Failed to parse response body");
    body.total_cost
}

/// A(01-2024..06-2024, 100) for Alice on Netflix, B(05-2024.., 200) for Bob on Spotify
async fn seed(app: &TestApp) {
    app.create_ok(
        &NewSubscription::valid("Netflix", 100, "01-2024")
            .ending("06-2024")
            .for_user(ALICE),
    )
    .await;
    app.create_ok(&NewSubscription::valid("Spotify", 200, "05-2024").for_user(BOB))
        .await;
}

async fn check_empty_store(app: &TestApp) {
    let total = total_cost(app, &[("start_date", "01-2024"), ("end_date", "12-2024")]).await;

    assert_eq!(0, total);
}

async fn check_overlap(app: &TestApp) {
    seed(app).await;

    let total = total_cost(app, &[("start_date", "04-2024"), ("end_date", "04-2024")]).await;
    assert_eq!(100, total);

    let total = total_cost(app, &[("start_date", "06-2024"), ("end_date", "12-2024")]).await;
    assert_eq!(300, total);

    let total = total_cost(app, &[("start_date", "07-2024"), ("end_date", "12-2025")]).await;
    assert_eq!(200, total);

    let total = total_cost(app, &[("start_date", "01-2023"), ("end_date", "12-2023")]).await;
    assert_eq!(0, total);
}

async fn check_filters(app: &TestApp) {
    seed(app).await;

    let window = [("start_date", "01-2024"), ("end_date", "12-2024")];

    let total = total_cost(app, &[window[0], window[1], ("user_id", ALICE)]).await;
    assert_eq!(100, total);

    let total = total_cost(app, &[window[0], window[1], ("service_name", "Spotify")]).await;
    assert_eq!(200, total);

    let total = total_cost(
        app,
        &[window[0], window[1], ("user_id", ALICE), ("service_name", "Spotify")],
    )
    .await;
    assert_eq!(0, total);
}

async fn check_reversed_window(app: &TestApp) {
    seed(app).await;

    // A: starts 01-2024 <= 02-2024 and ends 06-2024 >= 05-2024
    // B: starts 05-2024 > 02-2024
    let total = total_cost(app, &[("start_date", "05-2024"), ("end_date", "02-2024")]).await;

    assert_eq!(100, total);
}

async fn check_total_beyond_32_bits(app: &TestApp) {
    let price = i64::from(i32::MAX);
    app.create_ok(&NewSubscription::valid("Netflix", price, "01-2024"))
        .await;
    app.create_ok(&NewSubscription::valid("Spotify", price, "01-2024"))
        .await;

    let total = total_cost(app, &[("start_date", "01-2024"), ("end_date", "01-2024")]).await;

    assert_eq!(2 * price, total);
}

#[tokio::test]
async fn empty_store_costs_nothing() {
    check_empty_store(&TestApp::spawn().await).await;
}

#[tokio::test]
async fn only_overlapping_subscriptions_are_counted() {
    check_overlap(&TestApp::spawn().await).await;
}

#[tokio::test]
async fn filters_narrow_the_total() {
    check_filters(&TestApp::spawn().await).await;
}

#[tokio::test]
async fn reversed_window_applies_the_overlap_rule_literally() {
    check_reversed_window(&TestApp::spawn().await).await;
}

#[tokio::test]
async fn total_is_not_limited_to_32_bits() {
    check_total_beyond_32_bits(&TestApp::spawn().await).await;
}

#[sqlx::test]
async fn postgres_empty_table_costs_nothing(pool: PgPool) {
    check_empty_store(&TestApp::spawn_with_pool(&pool).await).await;
}

#[sqlx::test]
async fn postgres_counts_overlapping_subscriptions_only(pool: PgPool) {
    check_overlap(&TestApp::spawn_with_pool(&pool).await).await;
}

#[sqlx::test]
async fn postgres_filters_narrow_the_total(pool: PgPool) {
    check_filters(&TestApp::spawn_with_pool(&pool).await).await;
}

#[sqlx::test]
async fn postgres_reversed_window_applies_the_overlap_rule_literally(pool: PgPool) {
    check_reversed_window(&TestApp::spawn_with_pool(&pool).await).await;
}

#[sqlx::test]
async fn postgres_total_is_not_limited_to_32_bits(pool: PgPool) {
    check_total_beyond_32_bits(&TestApp::spawn_with_pool(&pool).await).await;
}

#[tokio::test]
async fn invalid_queries_are_rejected() {
    let app = TestApp::spawn().await;

    let test_cases: Vec<(&str, Vec<(&str, &str)>, Option<&str>)> = vec![
        ("missing start date", vec![("end_date", "12-2024")], None),
        ("missing end date", vec![("start_date", "01-2024")], None),
        (
            "malformed start date",
            vec![("start_date", "2024-01"), ("end_date", "12-2024")],
            Some("invalid start_date format, expected MM-YYYY"),
        ),
        (
            "malformed end date",
            vec![("start_date", "01-2024"), ("end_date", "13-2024")],
            Some("invalid end_date format, expected MM-YYYY"),
        ),
        (
            "malformed user id",
            vec![
                ("start_date", "01-2024"),
                ("end_date", "12-2024"),
                ("user_id", "12345"),
            ],
            Some("invalid user_id format, expected UUID"),
        ),
    ];

    for (desc, query, expected_error) in test_cases {
        let res = app
            .subscription_cost(&query)
            .await
            .expect("Failed to execute request");

        assert_eq!(
            StatusCode::BAD_REQUEST,
            res.status(),
            "API did not fail with 400 when query was {}",
            desc
        );

        let body: serde_json::Value = res.json().await.expect("Failed to parse response body");
        match expected_error {
            Some(message) => assert_eq!(message, body["error"], "{}", desc),
            None => assert!(body["error"].is_string(), "{}", desc),
        }
    }
}
