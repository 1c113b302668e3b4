//! End-to-end tests for the home page and the admin selection flow.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use foodomo_deals_integration_tests::{StubUpstream, TestContext, good, location};
use serde_json::json;

async fn context() -> TestContext {
    let upstream = StubUpstream::new()
        .with_goods("2661", json!([good("[i珍食] Beef bento", 2, "59")]))
        .with_goods("2558", json!([good("Milk tea", 1, "35")]))
        .spawn()
        .await;

    TestContext::start(&upstream, "2661,2558,3240", Some("secret")).await
}

#[tokio::test]
async fn test_home_groups_by_store_name() {
    let ctx = context().await;
    let html = ctx.get_text("/").await;

    assert!(html.contains("全家 中山南京店"));
    assert!(html.contains("全家 信義松仁店"));
    assert!(html.contains("Beef bento"));
    assert!(!html.contains("[i珍食]"));
    assert!(html.contains("https://www.google.com/maps/search/"));
    assert!(!html.contains("非查詢時間"));
}

#[tokio::test]
async fn test_home_without_products_shows_promotional_panel() {
    let upstream = StubUpstream::new().spawn().await;
    let ctx = TestContext::start(&upstream, "2661,2558", None).await;
    let html = ctx.get_text("/").await;

    assert!(html.contains("非查詢時間"));
    assert!(html.contains("8折"));
    assert!(html.contains("19:00 ∼ 19:59"));
    assert!(html.contains("65折"));
    assert!(html.contains("20:00 ∼ 03:00"));
    assert!(!html.contains("unreachable"));
}

#[tokio::test]
async fn test_home_during_outage_shows_banner_and_panel() {
    let ctx = TestContext::start("http://127.0.0.1:9/app/wxapp.php", "2661", None).await;
    let html = ctx.get_text("/").await;

    assert!(html.contains("Inventory service unreachable"));
    assert!(html.contains("65折"));
}

#[tokio::test]
async fn test_manual_refresh_redirects_home() {
    let ctx = context().await;

    let response = ctx.post_form("/refresh", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_manage_requires_login() {
    let ctx = context().await;

    let html = ctx.get_text("/manage").await;
    assert!(html.contains(r#"type="password""#));
    assert!(!html.contains("/manage/toggle"));

    let response = ctx.post_form("/manage/login", &[("password", "wrong")]).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.text().await.unwrap().contains("Incorrect password"));

    let response = ctx.post_form("/manage/toggle", &[("sid", "2661")]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/manage");

    // Toggle was refused, so nothing is filtered
    let html = ctx.get_text("/").await;
    assert!(html.contains("Milk tea"));
}

#[tokio::test]
async fn test_selection_flow() {
    let ctx = context().await;

    let response = ctx.post_form("/manage/login", &[("password", "secret")]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/manage");

    let html = ctx.get_text("/manage?q=中山").await;
    assert!(html.contains("全家 中山南京店"));
    assert!(html.contains("全家 中山林森店"));
    assert!(!html.contains("全家 信義松仁店"));

    let response = ctx
        .post_form("/manage/toggle", &[("sid", "2661"), ("q", "中山")])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/manage?q=%E4%B8%AD%E5%B1%B1");

    let html = ctx.get_text("/manage").await;
    assert!(html.contains("(1 家)"));

    // Home now only shows the selected store
    let html = ctx.get_text("/").await;
    assert!(html.contains("Beef bento"));
    assert!(!html.contains("Milk tea"));

    // Logging out keeps the selection
    let response = ctx.post_form("/manage/logout", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(ctx.get_text("/manage").await.contains(r#"type="password""#));
    assert!(!ctx.get_text("/").await.contains("Milk tea"));

    // Toggling again removes the filter
    ctx.post_form("/manage/login", &[("password", "secret")]).await;
    ctx.post_form("/manage/toggle", &[("sid", "2661")]).await;
    assert!(ctx.get_text("/").await.contains("Milk tea"));
}

#[tokio::test]
async fn test_selection_is_per_browser() {
    let ctx = context().await;
    ctx.post_form("/manage/login", &[("password", "secret")]).await;
    ctx.post_form("/manage/toggle", &[("sid", "2661")]).await;

    let other = reqwest::Client::new();
    let html = other
        .get(ctx.url("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Milk tea"));
}

#[tokio::test]
async fn test_selection_and_login_survive_restart() {
    let ctx = context().await;
    ctx.post_form("/manage/login", &[("password", "secret")]).await;
    ctx.post_form("/manage/toggle", &[("sid", "2661")]).await;
    assert!(!ctx.get_text("/").await.contains("Milk tea"));

    let restarted = ctx.restart().await;
    assert_ne!(restarted.base_url, ctx.base_url);

    let html = restarted.get_text("/").await;
    assert!(html.contains("Beef bento"));
    assert!(!html.contains("Milk tea"));

    let html = restarted.get_text("/manage").await;
    assert!(!html.contains(r#"type="password""#));
    assert!(html.contains("(1 家)"));
}

#[tokio::test]
async fn test_forged_admin_cookie_is_ignored() {
    let ctx = context().await;

    let response = ctx
        .client
        .post(ctx.url("/manage/toggle"))
        .header(reqwest::header::COOKIE, "deals_admin=1")
        .form(&[("sid", "2661")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/manage");
    assert!(ctx.get_text("/").await.contains("Milk tea"));
}
