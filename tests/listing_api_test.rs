mod common;

use axum::http::StatusCode;
use common::{create_listing, listing_body, register_admin, register_candidate, send, setup_app};
use serde_json::json;

#[tokio::test]
async fn public_listing_filters() {
    let (app, _) = setup_app();
    let (admin, _) = register_admin(&app).await;

    create_listing(
        &app,
        &admin,
        listing_body("Software Development Intern", "Technology", "Bangalore", &["React", "Node.js"]),
    )
    .await;
    create_listing(
        &app,
        &admin,
        listing_body("Data Analytics Intern", "Analytics", "Delhi", &["Python", "SQL"]),
    )
    .await;
    create_listing(
        &app,
        &admin,
        listing_body("Digital Marketing Intern", "Marketing", "Mumbai", &["SEO"]),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/listings", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(body[0]["title"], "Software Development Intern");
    assert_eq!(body[0]["status"], "open");

    let (_, body) = send(&app, "GET", "/api/listings?skills=react", None, None).await;
    let titles: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Software Development Intern"]);

    let (_, body) = send(&app, "GET", "/api/listings?sector=analytics&location=delhi", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["company"], "TechCorp Solutions");

    let (_, body) = send(&app, "GET", "/api/listings?sector=Finance", None, None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn get_listing_by_id() {
    let (app, _) = setup_app();
    let (admin, admin_id) = register_admin(&app).await;
    let created = create_listing(
        &app,
        &admin,
        listing_body("Software Development Intern", "Technology", "Bangalore", &["React"]),
    )
    .await;
    assert_eq!(created["posted_by"], admin_id.as_str());

    let uri = format!("/api/listings/{}", created["id"].as_str().unwrap());
    let (status, body) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);

    let uri = format!("/api/listings/{}", uuid::Uuid::new_v4());
    let (status, body) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Internship not found");
}

#[tokio::test]
async fn only_admins_manage_listings() {
    let (app, _) = setup_app();
    let (candidate, _) = register_candidate(&app).await;

    let body = listing_body("Software Development Intern", "Technology", "Bangalore", &["React"]);
    let (status, _) = send(&app, "POST", "/api/listings", Some(&candidate), Some(body.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "POST", "/api/listings", None, Some(body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, listings) = send(&app, "GET", "/api/listings", None, None).await;
    assert!(listings.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn update_closes_listing() {
    let (app, _) = setup_app();
    let (admin, _) = register_admin(&app).await;
    let created = create_listing(
        &app,
        &admin,
        listing_body("Software Development Intern", "Technology", "Bangalore", &["React"]),
    )
    .await;
    let uri = format!("/api/listings/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, "PATCH", &uri, Some(&admin), Some(json!({"status": "closed"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "closed");
    assert_eq!(body["title"], created["title"]);

    let (_, open) = send(&app, "GET", "/api/listings?status=open", None, None).await;
    assert!(open.as_array().unwrap().is_empty());
}
