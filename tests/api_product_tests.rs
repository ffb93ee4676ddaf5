//! 商品 API 集成测试

use axum::http::{Method, StatusCode};

mod common;
use common::{MultipartBody, TestApp};

fn product_form() -> MultipartBody {
    MultipartBody::new()
        .text("productName", "Desk Lamp")
        .text("productPrice", "24.99")
        .text("productCategory", "lighting")
        .text("productDescription", "Warm white LED lamp")
}

#[tokio::test]
async fn test_add_product_requires_session() {
    let app = TestApp::new();

    let request = product_form()
        .file("productImage", "lamp.png", b"png bytes")
        .into_request("/admin/add-product", None);

    let (status, _, _) = app.send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_add_product_stores_image() {
    let app = TestApp::new();
    let token = app.signed_in("a@x.com").await;

    let request = product_form()
        .file("productImage", "lamp.png", b"png bytes")
        .into_request("/admin/add-product", Some(&token));

    let (status, _, body) = app.send(request).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["message"], "Product added successfully");
    assert_eq!(body["data"]["name"], "Desk Lamp");
    assert_eq!(body["data"]["price"], "24.99");
    assert_eq!(body["data"]["category"], "lighting");

    let image_ref = body["data"]["imageRef"].as_str().unwrap();
    assert!(image_ref.starts_with("uploads/"));
    assert!(image_ref.ends_with(".png"));

    let file_name = image_ref.trim_start_matches("uploads/");
    let stored = std::fs::read(app.upload_dir.path().join(file_name)).unwrap();
    assert_eq!(stored, b"png bytes");

    // 静态文件服务
    let request = axum::http::Request::builder()
        .uri(format!("/{}", image_ref))
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, headers, _) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert!(headers.get("content-security-policy").is_some());
}

#[tokio::test]
async fn test_add_product_without_file() {
    let app = TestApp::new();
    let token = app.signed_in("a@x.com").await;

    let request = product_form().into_request("/admin/add-product", Some(&token));

    let (status, _, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "File not found");
}

#[tokio::test]
async fn test_add_product_invalid_price_stores_nothing() {
    let app = TestApp::new();
    let token = app.signed_in("a@x.com").await;

    let request = MultipartBody::new()
        .text("productName", "Desk Lamp")
        .text("productPrice", "cheap")
        .file("productImage", "lamp.png", b"png bytes")
        .into_request("/admin/add-product", Some(&token));

    let (status, _, _) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let entries = std::fs::read_dir(app.upload_dir.path()).unwrap().count();
    assert_eq!(entries, 0);
}

#[tokio::test]
async fn test_view_and_delete_products() {
    let app = TestApp::new();
    let token = app.signed_in("a@x.com").await;

    let request = product_form()
        .file("productImage", "lamp.jpg", b"jpg bytes")
        .into_request("/admin/add-product", Some(&token));
    let (status, _, created) = app.send(request).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _, list) = app.json(Method::GET, "/admin/view-products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let id = created["data"]["id"].as_str().unwrap();
    let image_ref = created["data"]["imageRef"].as_str().unwrap();
    let image_path = app
        .upload_dir
        .path()
        .join(image_ref.trim_start_matches("uploads/"));
    assert!(image_path.exists());

    let (status, _, body) = app
        .json(
            Method::DELETE,
            &format!("/admin/delete-product/{}", id),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product deleted successfully");
    assert!(!image_path.exists());

    let (_, _, list) = app.json(Method::GET, "/admin/view-products", None, None).await;
    assert!(list.as_array().unwrap().is_empty());

    let (status, _, _) = app
        .json(
            Method::DELETE,
            &format!("/admin/delete-product/{}", id),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_product_with_invalid_id() {
    let app = TestApp::new();

    let (status, _, _) = app
        .json(Method::DELETE, "/admin/delete-product/42", None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_product_rejects_non_image_upload() {
    let app = TestApp::new();
    let token = app.signed_in("a@x.com").await;

    for file_name in ["page.html", "vector.svg", "noext"] {
        let request = product_form()
            .file("productImage", file_name, b"<script>alert(1)</script>")
            .into_request("/admin/add-product", Some(&token));

        let (status, _, body) = app.send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Unsupported image type");
    }

    let entries = std::fs::read_dir(app.upload_dir.path()).unwrap().count();
    assert_eq!(entries, 0);

    let (_, _, list) = app.json(Method::GET, "/admin/view-products", None, None).await;
    assert!(list.as_array().unwrap().is_empty());
}
