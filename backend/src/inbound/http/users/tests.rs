//! Handler tests for the sign-in endpoints.

use super::*;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::{EmailAddress, Role};
use crate::inbound::http::test_utils::{MockPorts, caller, signed_in_cookie, test_app};

fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(sign_in)
            .service(sign_out)
            .service(current_caller),
    );
}

fn stored_user(role: Role) -> User {
    let fixture = caller(role);
    User {
        id: fixture.user_id,
        email: fixture.email,
        name: fixture.name,
        role,
    }
}

#[rstest]
#[case(json!({"email": "", "name": "Ada"}), "email", "empty")]
#[case(json!({"email": "not-an-email", "name": "Ada"}), "email", "invalid_format")]
#[case(json!({"email": "ada@company.com", "name": "  "}), "name", "empty")]
#[case(json!({"email": "ada@company.com", "name": "Ada", "role": "ROOT"}), "role", "unknown_value")]
#[actix_web::test]
async fn invalid_sign_in_payloads_are_rejected(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state(), configure)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/sign-in")
            .set_json(&payload)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[actix_web::test]
async fn sign_in_sets_a_session_that_resolves_the_caller() {
    let mut ports = MockPorts::default();
    ports
        .identity
        .expect_sign_in()
        .withf(|creds| creds.email().as_ref() == "ada@company.com" && creds.role() == Role::Admin)
        .times(1)
        .return_once(|_| Ok(stored_user(Role::Admin)));
    let app = actix_test::init_service(test_app(
        ports.signed_in_as(caller(Role::Admin)).into_state(),
        configure,
    ))
    .await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/sign-in")
            .set_json(json!({"email": "Ada@Company.com", "name": "Ada Lovelace", "role": "admin"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned();
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["role"], "ADMIN");

    let me = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(me.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(me).await;
    assert_eq!(body["email"], "ada@company.com");
    assert_eq!(body["role"], "ADMIN");
}

#[actix_web::test]
async fn me_without_a_session_is_unauthorised() {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state(), configure)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/auth/me").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn sessions_for_deleted_users_are_unauthorised() {
    let mut ports = MockPorts::default();
    ports.identity.expect_resolve_caller().returning(|_| Ok(None));
    let app = actix_test::init_service(test_app(ports.into_state(), configure)).await;
    let cookie = signed_in_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn sign_out_always_succeeds() {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state(), configure)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/sign-out")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[rstest]
fn request_conversion_defaults_the_role() {
    let credentials = SignInCredentials::try_from(SignInRequest {
        email: "bob@company.com".to_owned(),
        name: "Bob".to_owned(),
        role: None,
    })
    .expect("valid request");

    assert_eq!(credentials.role(), Role::User);
    assert_eq!(
        credentials.email(),
        &EmailAddress::new("bob@company.com").expect("email")
    );
}
