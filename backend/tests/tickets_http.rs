//! Ticket lifecycle over the full HTTP surface backed by in-memory adapters.

mod support;

use actix_web::http::StatusCode;
use actix_web::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use actix_web::test;
use chrono::{TimeZone, Utc};
use rstest::rstest;
use serde_json::{Value, json};

use support::{
    Harness, Part, create_ticket_request, file_ticket, set_status, sign_in_admin, sign_in_user,
};

#[actix_web::test]
async fn zero_byte_uploads_are_skipped() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    let user = sign_in_user(&app).await;
    let report = vec![b'x'; 500];

    let res = test::call_service(
        &app,
        create_ticket_request(
            user.clone(),
            &[
                Part::Text("title", "Laptop will not boot"),
                Part::Text("description", "Black screen after the update"),
                Part::Text("priority", "HIGH"),
                Part::File("empty.txt", b""),
                Part::File("report.pdf", &report),
            ],
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let created: Value = test::read_body_json(res).await;

    assert_eq!(created["status"], "OPEN");
    assert_eq!(created["priority"], "HIGH");
    let attachments = created["attachments"].as_array().expect("attachments");
    assert_eq!(attachments.len(), 1);
    assert_eq!(attachments[0]["filename"], "report.pdf");
    assert_eq!(attachments[0]["size"], 500);
    assert_eq!(created["failedAttachments"], json!([]));
    assert_eq!(harness.files.len(), 1);

    let own: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/tickets")
            .cookie(user)
            .to_request(),
    )
    .await;
    let own = own.as_array().expect("ticket list");
    assert_eq!(own.len(), 1);
    assert_eq!(own[0]["attachments"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn missing_title_is_rejected_before_anything_is_stored() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    let user = sign_in_user(&app).await;

    let res = test::call_service(
        &app,
        create_ticket_request(
            user,
            &[
                Part::Text("description", "No title given"),
                Part::File("notes.txt", b"hello"),
            ],
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert!(harness.files.is_empty());
}

#[rstest]
#[case(&["RESOLVED", "OPEN"])]
#[case(&["CLOSED", "IN_PROGRESS", "CLOSED"])]
#[case(&["IN_PROGRESS", "RESOLVED", "OPEN", "CLOSED"])]
#[actix_rt::test]
async fn status_follows_the_last_update(#[case] sequence: &[&str]) {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    let user = sign_in_user(&app).await;
    let admin = sign_in_admin(&app).await;
    let id = file_ticket(&app, user, "Printer jammed").await;

    for status in sequence {
        let updated = set_status(&app, admin.clone(), &id, status).await;
        assert_eq!(updated["status"], *status);
    }

    let all: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/tickets")
            .cookie(admin)
            .to_request(),
    )
    .await;
    let last = sequence.last().expect("non-empty sequence");
    assert_eq!(all[0]["status"], *last);
    assert_eq!(all[0]["user"]["email"], "employee@company.com");
}

#[rstest]
#[case::list("GET", "/api/v1/admin/tickets")]
#[case::update("PATCH", "/api/v1/admin/tickets/{id}")]
#[case::dashboard("GET", "/api/v1/admin/dashboard")]
#[actix_rt::test]
async fn admin_routes_reject_regular_users(#[case] method: &str, #[case] path: &str) {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    let user = sign_in_user(&app).await;
    let id = file_ticket(&app, user.clone(), "Need a second monitor").await;
    let uri = path.replace("{id}", &id);

    let req = match method {
        "PATCH" => test::TestRequest::patch().set_json(json!({ "status": "CLOSED" })),
        _ => test::TestRequest::get(),
    };
    let res = test::call_service(&app, req.uri(&uri).cookie(user.clone()).to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");

    let own: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/tickets")
            .cookie(user)
            .to_request(),
    )
    .await;
    assert_eq!(own[0]["status"], "OPEN");
}

#[actix_web::test]
async fn comments_are_listed_oldest_first_with_their_author() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    let user = sign_in_user(&app).await;
    let admin = sign_in_admin(&app).await;
    let id = file_ticket(&app, user.clone(), "Cannot reach the wiki").await;

    for (cookie, content) in [
        (admin.clone(), "Can you try another browser?"),
        (user.clone(), "Same result in Firefox"),
    ] {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/v1/tickets/{id}/comments"))
                .cookie(cookie)
                .set_json(json!({ "content": content }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let own: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/tickets")
            .cookie(user)
            .to_request(),
    )
    .await;
    let comments = own[0]["comments"].as_array().expect("comments");
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["content"], "Can you try another browser?");
    assert_eq!(comments[0]["user"]["name"], "System Administrator");
    assert_eq!(comments[1]["user"]["name"], "Regular Employee");
}

#[actix_web::test]
async fn commenting_on_a_missing_ticket_is_not_found() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    let user = sign_in_user(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/tickets/5d0c6f7a-8b61-4f0e-9b55-0d9b1a0c2e11/comments")
            .cookie(user)
            .set_json(json!({ "content": "Anyone there?" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn downloads_serve_stored_bytes_with_headers() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    let user = sign_in_user(&app).await;
    let bytes = vec![b'%'; 500];

    let created: Value = test::call_and_read_body_json(
        &app,
        create_ticket_request(
            user.clone(),
            &[
                Part::Text("title", "Invoice template broken"),
                Part::Text("description", "See attached export"),
                Part::File("report.pdf", &bytes),
            ],
        ),
    )
    .await;
    let key = created["attachments"][0]["filepath"]
        .as_str()
        .expect("storage key")
        .to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/uploads/{key}"))
            .cookie(user.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("application/pdf")
    );
    let disposition = res
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .expect("content disposition")
        .to_owned();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("filename=\"report.pdf\""));
    let body = test::read_body(res).await;
    assert_eq!(body.as_ref(), bytes.as_slice());

    let missing = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/uploads/1700000000000-missing.pdf")
            .cookie(user)
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn same_instant_uploads_from_two_tickets_keep_their_own_bytes() {
    let now = Utc
        .with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
        .single()
        .expect("valid instant");
    let harness = Harness::frozen_at(now);
    let app = test::init_service(harness.app()).await;
    let user = sign_in_user(&app).await;

    let uploads = [
        ("First export", b"first".as_slice()),
        ("Second export", b"second".as_slice()),
    ];
    let mut keys = Vec::new();
    for (title, bytes) in uploads {
        let created: Value = test::call_and_read_body_json(
            &app,
            create_ticket_request(
                user.clone(),
                &[
                    Part::Text("title", title),
                    Part::Text("description", "Export attached"),
                    Part::File("report.pdf", bytes),
                ],
            ),
        )
        .await;
        assert_eq!(created["failedAttachments"], json!([]));
        keys.push(
            created["attachments"][0]["filepath"]
                .as_str()
                .expect("storage key")
                .to_owned(),
        );
    }

    assert_ne!(keys[0], keys[1]);
    assert_eq!(harness.files.len(), 2);
    for (key, (_, expected)) in keys.iter().zip(uploads) {
        let body = test::call_and_read_body(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/uploads/{key}"))
                .cookie(user.clone())
                .to_request(),
        )
        .await;
        assert_eq!(body.as_ref(), expected);
    }
}

#[actix_web::test]
async fn signed_out_callers_cannot_file_tickets() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    let user = sign_in_user(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/sign-out")
            .cookie(user)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let cleared = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie cleared")
        .into_owned();

    let res = test::call_service(
        &app,
        create_ticket_request(cleared, &[Part::Text("title", "Too late")]),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
