use crate::common::{TestApp, routes};

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::HEALTH).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["status"], "ok");
}

#[tokio::test]
async fn openapi_document_lists_blog_routes() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::OPENAPI).await;
    assert_eq!(res.status, 200);

    let paths = res.body["paths"].as_object().expect("paths missing");
    assert!(paths.contains_key("/api/v1/blogs/public"));
    assert!(paths.contains_key("/api/v1/blogs/private"));
    assert!(paths.contains_key("/api/v1/blogs/{id}"));
    assert!(res.body["components"]["securitySchemes"]["jwt"].is_object());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = TestApp::spawn().await;

    let res = app.get("/api/v1/posts").await;
    assert_eq!(res.status, 404);
}
