mod common;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{json, Value};

use common::{
    bearer, business_body, call, create_business, harness, register, test_app, DownImageHost,
    RecordingMailer,
};

fn names(body: &Value) -> Vec<String> {
    body["businesses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["businessName"].as_str().unwrap().to_string())
        .collect()
}

#[actix_web::test]
async fn owner_scenario_counts_each_view_once() {
    let h = harness().await;
    let app = test::init_service(test_app(h.state.clone())).await;
    let (token, owner_id) = register(&app, "Owner A", "owner@shop.lk", "business").await;

    let id = create_business(&app, &token, business_body("Lanka Spice", "Restaurant", "Colombo")).await;

    let (status, body) = call(
        &app,
        TestRequest::get()
            .uri("/api/v1/business/my-business")
            .insert_header(bearer(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["businesses"][0]["_id"], id.as_str());
    assert_eq!(body["businesses"][0]["views"], 0);
    assert_eq!(body["businesses"][0]["owner"]["_id"], owner_id.as_str());

    call(&app, TestRequest::get().uri(&format!("/api/v1/business/{id}"))).await;
    let (status, body) = call(
        &app,
        TestRequest::get()
            .uri(&format!("/api/v1/business/{id}"))
            .insert_header(bearer(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["business"]["views"], 2);
    assert_eq!(body["business"]["owner"]["email"], "owner@shop.lk");
    assert_eq!(body["business"]["address"]["country"], "Sri Lanka");
    // numeric prices are stored as text
    assert_eq!(body["business"]["services"][0]["price"], "250");

    let (status, body) = call(&app, TestRequest::get().uri("/api/v1/business/missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Business not found");
}

#[actix_web::test]
async fn only_business_accounts_manage_businesses() {
    let h = harness().await;
    let app = test::init_service(test_app(h.state.clone())).await;
    let (token, _) = register(&app, "Shopper", "shopper@example.com", "user").await;

    let (status, body) = call(
        &app,
        TestRequest::post()
            .uri("/api/v1/business")
            .insert_header(bearer(&token))
            .set_json(business_body("Nope", "Retail", "Kandy")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Only business owners can create business profiles");

    let (status, body) = call(
        &app,
        TestRequest::get()
            .uri("/api/v1/business/my-business")
            .insert_header(bearer(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "User type 'user' is not authorized to access this route");
}

#[actix_web::test]
async fn create_lists_every_invalid_field() {
    let h = harness().await;
    let app = test::init_service(test_app(h.state.clone())).await;
    let (token, _) = register(&app, "Owner", "owner@shop.lk", "business").await;

    let (status, body) = call(
        &app,
        TestRequest::post()
            .uri("/api/v1/business")
            .insert_header(bearer(&token))
            .set_json(json!({
                "businessName": "Half Done",
                "category": "Bakery",
                "contactEmail": "nope",
                "address": { "city": "Galle" },
                "services": [{ "name": " " }]
            })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<_> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(
        fields,
        [
            "description",
            "category",
            "contactEmail",
            "contactPhone",
            "address.street",
            "address.state",
            "address.zipCode",
            "services[0].name"
        ]
    );
}

#[actix_web::test]
async fn update_and_delete_are_owner_only() {
    let h = harness().await;
    let app = test::init_service(test_app(h.state.clone())).await;
    let (owner, _) = register(&app, "Owner", "owner@shop.lk", "business").await;
    let (rival, _) = register(&app, "Rival", "rival@shop.lk", "business").await;
    let id = create_business(&app, &owner, business_body("Tea House", "Restaurant", "Nuwara Eliya")).await;

    let (status, body) = call(
        &app,
        TestRequest::put()
            .uri(&format!("/api/v1/business/{id}"))
            .insert_header(bearer(&rival))
            .set_json(json!({ "businessName": "Stolen" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not authorized to update this business");

    let (status, body) = call(
        &app,
        TestRequest::put()
            .uri(&format!("/api/v1/business/{id}"))
            .insert_header(bearer(&owner))
            .set_json(json!({ "description": "High grown tea", "address": { "city": "Hatton" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Business updated successfully");
    assert_eq!(body["business"]["description"], "High grown tea");
    assert_eq!(body["business"]["address"]["city"], "Hatton");
    assert_eq!(body["business"]["address"]["street"], "12 Main Street");

    let (status, _) = call(
        &app,
        TestRequest::put()
            .uri(&format!("/api/v1/business/{id}"))
            .insert_header(bearer(&owner))
            .set_json(json!({ "category": "Spaceport" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/v1/business/{id}"))
            .insert_header(bearer(&rival)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not authorized to delete this business");

    let (status, body) = call(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/v1/business/{id}"))
            .insert_header(bearer(&owner)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Business deleted successfully");

    let (status, _) = call(&app, TestRequest::get().uri(&format!("/api/v1/business/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn listing_filters_and_paginates_active_businesses() {
    let h = harness().await;
    let app = test::init_service(test_app(h.state.clone())).await;
    let (owner, _) = register(&app, "Owner", "owner@shop.lk", "business").await;

    create_business(&app, &owner, business_body("Colombo Cafe", "Restaurant", "Colombo")).await;
    create_business(&app, &owner, business_body("Kandy Books", "Retail", "Kandy")).await;
    create_business(&app, &owner, business_body("Galle Fort Cafe", "Restaurant", "Galle")).await;
    let hidden = create_business(&app, &owner, business_body("Closed Cafe", "Restaurant", "Colombo")).await;
    call(
        &app,
        TestRequest::put()
            .uri(&format!("/api/v1/business/{hidden}"))
            .insert_header(bearer(&owner))
            .set_json(json!({ "isActive": false })),
    )
    .await;

    let (status, body) = call(&app, TestRequest::get().uri("/api/v1/business")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(names(&body), ["Galle Fort Cafe", "Kandy Books", "Colombo Cafe"]);

    let (_, body) = call(&app, TestRequest::get().uri("/api/v1/business?search=CAFE")).await;
    assert_eq!(names(&body), ["Galle Fort Cafe", "Colombo Cafe"]);

    let (_, body) = call(&app, TestRequest::get().uri("/api/v1/business?category=Retail")).await;
    assert_eq!(names(&body), ["Kandy Books"]);

    // the plain listing matches category exactly
    let (_, body) = call(&app, TestRequest::get().uri("/api/v1/business?category=Rest")).await;
    assert_eq!(body["total"], 0);

    let (_, body) = call(&app, TestRequest::get().uri("/api/v1/business?city=colo")).await;
    assert_eq!(names(&body), ["Colombo Cafe"]);

    let (_, body) = call(&app, TestRequest::get().uri("/api/v1/business?page=2&limit=2")).await;
    assert_eq!(names(&body), ["Colombo Cafe"]);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["currentPage"], 2);

    let (status, body) = call(&app, TestRequest::get().uri("/api/v1/business?page=zero&limit=-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["totalPages"], 1);
}

#[actix_web::test]
async fn search_filter_matches_substrings_and_sorts() {
    let h = harness().await;
    let app = test::init_service(test_app(h.state.clone())).await;
    let (owner, _) = register(&app, "Owner", "owner@shop.lk", "business").await;

    let mut body = business_body("Beta Builders", "Construction", "Negombo");
    body["services"] = json!([{ "name": "Roof Repair" }]);
    let beta = create_business(&app, &owner, body).await;

    let mut body = business_body("Alpha Clinic", "Healthcare", "Colombo");
    body["address"]["state"] = json!("Central Province");
    body["services"] = json!([{ "name": "Physiotherapy" }]);
    create_business(&app, &owner, body).await;

    call(&app, TestRequest::get().uri(&format!("/api/v1/business/{beta}"))).await;

    let get = |query: &str| TestRequest::get().uri(&format!("/api/v1/business/search/filter?{query}"));

    let (_, body) = call(&app, get("sortBy=businessName&order=asc")).await;
    assert_eq!(names(&body), ["Alpha Clinic", "Beta Builders"]);

    let (_, body) = call(&app, get("sortBy=views&order=desc")).await;
    assert_eq!(names(&body), ["Beta Builders", "Alpha Clinic"]);

    // unknown sort keys fall back to newest first
    let (_, body) = call(&app, get("sortBy=rating")).await;
    assert_eq!(names(&body), ["Alpha Clinic", "Beta Builders"]);

    let (_, body) = call(&app, get("services=roof")).await;
    assert_eq!(names(&body), ["Beta Builders"]);

    let (_, body) = call(&app, get("category=health")).await;
    assert_eq!(names(&body), ["Alpha Clinic"]);

    let (_, body) = call(&app, get("state=central")).await;
    assert_eq!(names(&body), ["Alpha Clinic"]);

    let (_, body) = call(&app, get("keyword=builders&city=negombo")).await;
    assert_eq!(names(&body), ["Beta Builders"]);

    let (_, body) = call(&app, get("keyword=100%25")).await;
    assert_eq!(body["total"], 0);
}

fn multipart(filename: &str, content_type: &str, bytes: &[u8]) -> TestRequest {
    let boundary = "bizconnect-test-boundary";
    let mut payload = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    payload.extend_from_slice(bytes);
    payload.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    TestRequest::post()
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(payload)
}

#[actix_web::test]
async fn logo_upload_checks_the_file_and_stores_the_url() {
    let h = harness().await;
    let app = test::init_service(test_app(h.state.clone())).await;
    let (owner, _) = register(&app, "Owner", "owner@shop.lk", "business").await;
    let id = create_business(&app, &owner, business_body("Logo Shop", "Retail", "Matara")).await;
    let uri = format!("/api/v1/business/{id}/logo");

    let (status, body) = call(
        &app,
        multipart("logo.pdf", "application/pdf", b"%PDF-1.4")
            .uri(&uri)
            .insert_header(bearer(&owner)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Invalid file type. Please upload a valid image (JPEG, PNG, GIF, or WebP)."
    );

    let oversized = vec![0u8; 5 * 1024 * 1024 + 1];
    let (status, body) = call(
        &app,
        multipart("huge.png", "image/png", &oversized)
            .uri(&uri)
            .insert_header(bearer(&owner)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "File size exceeds 5MB. Please upload a smaller image.");

    let (status, body) = call(
        &app,
        multipart("logo.png", "image/png", b"\x89PNG\r\n")
            .uri(&uri)
            .insert_header(bearer(&owner)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["logo"], "https://images.test/bizconnect/logos/logo.png");
    assert_eq!(body["business"]["logo"], body["logo"]);
    assert_eq!(h.images.uploads.lock().unwrap().len(), 1);
}

#[actix_web::test]
async fn logo_upload_reports_image_host_failure_as_bad_gateway() {
    let state = common::state_with(
        common::test_config(&[]),
        Arc::new(RecordingMailer::default()),
        Arc::new(DownImageHost),
    )
    .await;
    let app = test::init_service(test_app(state)).await;
    let (owner, _) = register(&app, "Owner", "owner@shop.lk", "business").await;
    let id = create_business(&app, &owner, business_body("Logo Shop", "Retail", "Matara")).await;

    let (status, body) = call(
        &app,
        multipart("logo.gif", "image/gif", b"GIF89a")
            .uri(&format!("/api/v1/business/{id}/logo"))
            .insert_header(bearer(&owner)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "Image upload failed");
    assert!(body["error"].is_string());
}
