//! Resource services: query mapping, error mapping and endpoint fallbacks

mod common;

use bistro_client::ClientError;
use bistro_client::filters::{
    CustomerFilter, LoyaltyRange, MenuFilter, SortOrder, SpentRange, StaffFilter,
};
use common::TestServer;
use rust_decimal::Decimal;
use shared::error::ErrorCode;
use shared::models::{CustomerAnalytics, CustomerInput};

#[tokio::test]
async fn test_customer_filter_reaches_backend() {
    let server = TestServer::spawn().await;
    let (client, _store) = server.client();
    let filter = CustomerFilter {
        loyalty: LoyaltyRange::From51To100,
        spent: SpentRange::From5MTo10M,
        ..CustomerFilter::default()
    }
    .search("  Lan ")
    .sort("loyalty_points", SortOrder::Desc);

    let page = client.customers().list(&filter).await.unwrap();

    assert_eq!(page.count, 11);
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].total_spent, Decimal::from(15_000_000));
    assert!(page.next.is_some());

    let backend = &server.backend;
    assert_eq!(backend.query_value("page").as_deref(), Some("1"));
    assert_eq!(backend.query_value("limit").as_deref(), Some("10"));
    assert_eq!(backend.query_value("search").as_deref(), Some("Lan"));
    assert_eq!(backend.query_value("loyalty_points_min").as_deref(), Some("51"));
    assert_eq!(backend.query_value("loyalty_points_max").as_deref(), Some("100"));
    assert_eq!(backend.query_value("total_spent_min").as_deref(), Some("5000000"));
    assert_eq!(backend.query_value("total_spent_max").as_deref(), Some("10000000"));
    assert_eq!(backend.query_value("ordering").as_deref(), Some("-loyalty_points"));
    assert_eq!(backend.query_value("created_at_after"), None);
}

#[tokio::test]
async fn test_customer_validation_runs_before_request() {
    let server = TestServer::spawn().await;
    let (client, _store) = server.client();

    let err = client
        .customers()
        .create(&CustomerInput::new("A", "12345"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::ValidationFailed);
    assert_eq!(server.backend.hits("POST /api/customers/"), 0);
}

#[tokio::test]
async fn test_backend_validation_message_is_extracted() {
    let server = TestServer::spawn().await;
    let (client, _store) = server.client();

    let err = client
        .customers()
        .create(&CustomerInput::new("Chị Lan", "0901 234 567"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Validation { .. }));
    assert_eq!(err.server_message(), Some("Số điện thoại đã tồn tại"));
    assert!(err.user_message().starts_with("Dữ liệu không hợp lệ: "));
}

#[tokio::test]
async fn test_loyalty_history_falls_back_when_missing() {
    let server = TestServer::spawn().await;
    let (client, _store) = server.client();

    let history = client.customers().loyalty_history(1).await.unwrap();

    assert!(history.history.is_empty());
    assert_eq!(history.total_points, Decimal::ZERO);
    assert!(history.message.is_some());
}

#[tokio::test]
async fn test_analytics_falls_back_when_missing() {
    let server = TestServer::spawn().await;
    let (client, _store) = server.client();

    let analytics = client.customers().analytics().await.unwrap();

    assert_eq!(analytics, CustomerAnalytics::default());
}

#[tokio::test]
async fn test_gateway_error_message() {
    let server = TestServer::spawn().await;
    let (client, _store) = server.client();

    let err = client.staff().list(&StaffFilter::default()).await.unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
    assert_eq!(err.user_message(), "Lỗi server (503): Không xác định");
    assert_eq!(err.server_message(), Some("Server error: 503"));
}

#[tokio::test]
async fn test_dashboard_overview_tolerates_failing_sources() {
    let server = TestServer::spawn().await;
    let (client, _store) = server.client();

    let overview = client.dashboard().overview().await;

    assert_eq!(overview.summary.total_orders, 0);
    assert_eq!(overview.summary.total_salaries, Decimal::ZERO);
    assert!(overview.popular.food.is_empty());
    assert_eq!(server.backend.hits("GET /api/staff/"), 1);
}

#[tokio::test]
async fn test_menu_health() {
    let server = TestServer::spawn().await;
    let (client, _store) = server.client();

    assert!(client.menu().health().await);
}

#[tokio::test]
async fn test_menu_server_failure_maps_to_menu_load_failed() {
    let server = TestServer::spawn().await;
    let (client, _store) = server.client();

    let err = client.menu().list(&MenuFilter::default()).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::MenuLoadFailed);
    assert_eq!(err.user_message(), "Không thể tải danh sách món ăn");
}
