use actix_files::Files;
use actix_web::http::{Method, StatusCode, header};
use actix_web::{App, test, web};
use serde_json::Value;
use store_catalog::assets::LocalImageStore;
use store_catalog::models::config::{CatalogConfig, STATIC_URL};
use store_catalog::repository::DieselRepository;
use store_catalog::routes;
use tempfile::TempDir;

mod common;

const BOUNDARY: &str = "catalog-test-boundary";

struct Upload<'a> {
    file_name: &'a str,
    bytes: &'a [u8],
}

fn multipart_body(fields: &[(&str, &str)], image: Option<Upload<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(upload) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                upload.file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(upload.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn content_type() -> (header::HeaderName, String) {
    (
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    )
}

const HOME_KIT: &[(&str, &str)] = &[
    ("name", "Home Kit 24/25"),
    ("name_lc", "home kit 24/25"),
    ("price", "89.99"),
    ("stock_quantity", "50"),
    ("category", "jerseys"),
    ("descriptions", "Official home shirt"),
];

struct Env {
    db: common::TestDb,
    static_dir: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            db: common::TestDb::new(),
            static_dir: tempfile::tempdir().unwrap(),
        }
    }

    fn images(&self) -> LocalImageStore {
        let images = LocalImageStore::new(self.static_dir.path(), STATIC_URL);
        images.ensure_directory().unwrap();
        images
    }
}

macro_rules! catalog_app {
    ($env:expr) => {
        test::init_service(
            App::new()
                .app_data(routes::multipart_config(1024 * 1024))
                .app_data(web::Data::new(DieselRepository::new($env.db.pool())))
                .app_data(web::Data::new($env.images()))
                .app_data(web::Data::new(CatalogConfig::default()))
                .service(Files::new(STATIC_URL, $env.static_dir.path()))
                .configure(routes::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn index_reports_liveness() {
    let env = Env::new();
    let app = catalog_app!(env);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("live"));
}

#[actix_web::test]
async fn create_then_get_and_list() {
    let env = Env::new();
    let app = catalog_app!(env);

    let req = test::TestRequest::post()
        .uri("/products/")
        .insert_header(content_type())
        .set_payload(multipart_body(HOME_KIT, None))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], "Home Kit 24/25");
    assert_eq!(created["price"], 89.99);
    assert_eq!(created["stock_quantity"], 50);
    assert_eq!(created["is_active"], true);
    assert!(created["image_url"].is_null());

    let req = test::TestRequest::get()
        .uri(&format!("/products/{id}"))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, created);

    let req = test::TestRequest::get().uri("/products/").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], id.as_str());
}

#[actix_web::test]
async fn uploaded_image_is_stored_and_served() {
    let env = Env::new();
    let app = catalog_app!(env);

    let req = test::TestRequest::post()
        .uri("/products/")
        .insert_header(content_type())
        .set_payload(multipart_body(
            HOME_KIT,
            Some(Upload {
                file_name: "kit.png",
                bytes: b"fake png bytes",
            }),
        ))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let image_url = created["image_url"].as_str().unwrap().to_string();
    assert!(image_url.starts_with("/static/products/"));
    assert!(image_url.ends_with(".png"));

    let req = test::TestRequest::get().uri(&image_url).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await.as_ref(), b"fake png bytes");

    let req = test::TestRequest::get().uri("/products/").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        listed[0]["image_url"].as_str().unwrap(),
        format!("http://localhost:8000{image_url}")
    );
}

#[actix_web::test]
async fn update_changes_only_submitted_fields_and_replaces_image() {
    let env = Env::new();
    let app = catalog_app!(env);

    let req = test::TestRequest::post()
        .uri("/products/")
        .insert_header(content_type())
        .set_payload(multipart_body(
            HOME_KIT,
            Some(Upload {
                file_name: "old.png",
                bytes: b"old",
            }),
        ))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap().to_string();
    let old_image = created["image_url"].as_str().unwrap().to_string();
    let old_file = env
        .static_dir
        .path()
        .join("products")
        .join(old_image.rsplit('/').next().unwrap());
    assert!(old_file.exists());

    let req = test::TestRequest::put()
        .uri(&format!("/products/{id}"))
        .insert_header(content_type())
        .set_payload(multipart_body(
            &[("price", "59.5"), ("is_active", "false")],
            Some(Upload {
                file_name: "new.jpg",
                bytes: b"new",
            }),
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;

    assert_eq!(updated["price"], 59.5);
    assert_eq!(updated["is_active"], false);
    assert_eq!(updated["name"], created["name"]);
    assert_eq!(updated["stock_quantity"], created["stock_quantity"]);
    assert_eq!(updated["descriptions"], created["descriptions"]);
    let new_image = updated["image_url"].as_str().unwrap();
    assert!(new_image.starts_with("http://localhost:8000/static/products/"));
    assert!(new_image.ends_with(".jpg"));
    assert!(!old_file.exists());
}

#[actix_web::test]
async fn delete_removes_product() {
    let env = Env::new();
    let app = catalog_app!(env);

    let req = test::TestRequest::post()
        .uri("/products/")
        .insert_header(content_type())
        .set_payload(multipart_body(HOME_KIT, None))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/products/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/products/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unknown_product_is_not_found() {
    let env = Env::new();
    let app = catalog_app!(env);

    let req = test::TestRequest::get()
        .uri("/products/no-such-id")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Product not found");

    let req = test::TestRequest::put()
        .uri("/products/no-such-id")
        .insert_header(content_type())
        .set_payload(multipart_body(&[("price", "1.0")], None))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri("/products/no-such-id")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn incomplete_or_invalid_forms_are_rejected() {
    let env = Env::new();
    let app = catalog_app!(env);

    let missing_category: Vec<(&str, &str)> = HOME_KIT
        .iter()
        .copied()
        .filter(|(name, _)| *name != "category")
        .collect();
    let req = test::TestRequest::post()
        .uri("/products/")
        .insert_header(content_type())
        .set_payload(multipart_body(&missing_category, None))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let mut bad_price = HOME_KIT.to_vec();
    bad_price[2] = ("price", "cheap");
    let req = test::TestRequest::post()
        .uri("/products/")
        .insert_header(content_type())
        .set_payload(multipart_body(&bad_price, None))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let mut empty_name = HOME_KIT.to_vec();
    empty_name[0] = ("name", "");
    let req = test::TestRequest::post()
        .uri("/products/")
        .insert_header(content_type())
        .set_payload(multipart_body(&empty_name, None))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["detail"].is_string());

    let req = test::TestRequest::get().uri("/products/").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn create_ignores_submitted_is_active() {
    let env = Env::new();
    let app = catalog_app!(env);

    let mut inactive = HOME_KIT.to_vec();
    inactive.push(("is_active", "false"));
    let req = test::TestRequest::post()
        .uri("/products/")
        .insert_header(content_type())
        .set_payload(multipart_body(&inactive, None))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["is_active"], true);

    let req = test::TestRequest::get()
        .uri(&format!("/products/{}", created["id"].as_str().unwrap()))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["is_active"], true);
}

#[actix_web::test]
async fn padded_text_round_trips_unchanged() {
    let env = Env::new();
    let app = catalog_app!(env);

    let mut padded = HOME_KIT.to_vec();
    padded[0] = ("name", " Home Kit 24/25 ");
    padded[4] = ("category", "jerseys ");
    let req = test::TestRequest::post()
        .uri("/products/")
        .insert_header(content_type())
        .set_payload(multipart_body(&padded, None))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get()
        .uri(&format!("/products/{}", created["id"].as_str().unwrap()))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["name"], " Home Kit 24/25 ");
    assert_eq!(fetched["category"], "jerseys ");
}

#[actix_web::test]
async fn collection_without_trailing_slash_redirects() {
    let env = Env::new();
    let app = catalog_app!(env);

    let req = test::TestRequest::get().uri("/products").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/products/"
    );
}

#[actix_web::test]
async fn preflight_allows_browser_origins() {
    let env = Env::new();
    let app = test::init_service(
        App::new()
            .wrap(routes::cors())
            .app_data(web::Data::new(DieselRepository::new(env.db.pool())))
            .app_data(web::Data::new(env.images()))
            .app_data(web::Data::new(CatalogConfig::default()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/products/")
        .insert_header((header::ORIGIN, "http://localhost:3000"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header((header::ORIGIN, "http://localhost:3000"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );
}
