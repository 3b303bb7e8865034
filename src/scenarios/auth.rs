//! Authentication scenarios
//!
//! Logins for every seeded role, rejected credentials, `auth/me` and
//! GPS-checked farmer registration.

use chrono::Local;
use serde_json::{json, Map, Value};
use tracing::info;

use super::{raw_details, str_field, transport_details, RunContext};
use crate::http::ApiRequest;
use crate::models::{GeoPoint, Role};

pub async fn run(ctx: &mut RunContext) {
    info!("Running authentication scenarios");

    login(ctx, Role::Admin, "Admin Login", None).await;
    login(ctx, Role::Farmer, "Farmer Login", None).await;
    let mumbai = ctx.config.locations.mumbai;
    login(ctx, Role::Buyer, "Buyer Login with GPS", Some(mumbai)).await;

    invalid_credentials(ctx).await;
    current_user(ctx).await;
    unauthorized_access(ctx).await;
    farmer_registration(ctx).await;
    registration_outside_maharashtra(ctx).await;
}

/// Log in as `role` and keep the returned token in the session
async fn login(ctx: &mut RunContext, role: Role, name: &str, location: Option<GeoPoint>) {
    let body = ctx
        .config
        .credentials
        .for_role(role)
        .login_body(location.as_ref());
    let outcome = ctx.send(ApiRequest::post("auth/login").json(body)).await;

    let Some(resp) = outcome.with_status(200) else {
        ctx.recorder.record(
            name,
            false,
            format!("Login failed with status {}", outcome.status_label()),
            transport_details(&outcome),
        );
        return;
    };

    let data = resp.json().unwrap_or(Value::Null);
    let token = str_field(&data, "token");
    let user = data.get("user").filter(|u| u.is_object());

    let (Some(token), Some(user)) = (token, user) else {
        ctx.recorder.record(
            name,
            false,
            "Missing token or user in response",
            Some(raw_details(resp)),
        );
        return;
    };

    let user_role = str_field(user, "role").unwrap_or_default();
    if user_role != role.as_str() {
        ctx.recorder.record(
            name,
            false,
            format!("Expected role {role}, got {user_role:?}"),
            Some(raw_details(resp)),
        );
        return;
    }

    ctx.session.store(role, token);

    let mut details = json!({
        "user_role": user_role,
        "approved": user.get("approved").cloned().unwrap_or(Value::Null),
    });
    if location.is_some() {
        details["gps_updated"] = Value::Bool(user.get("profile").is_some());
    }

    let message = match location {
        Some(_) => format!("{} login with GPS successful", capitalized(role)),
        None => format!("{} login successful", capitalized(role)),
    };
    ctx.recorder.record(name, true, message, Some(details));
}

async fn invalid_credentials(ctx: &mut RunContext) {
    let outcome = ctx
        .send(ApiRequest::post("auth/login").json(json!({
            "email": "invalid@example.com",
            "password": "wrongpassword",
        })))
        .await;

    ctx.expect_status(
        "Invalid Credentials",
        &outcome,
        401,
        "Correctly rejected invalid credentials",
    );
}

async fn current_user(ctx: &mut RunContext) {
    const NAME: &str = "Get Current User (Admin)";

    let Some(token) = ctx.require_token(Role::Admin, NAME) else {
        return;
    };

    let outcome = ctx
        .send(ApiRequest::get("auth/me").bearer(Some(&token)))
        .await;

    match outcome.with_status(200) {
        Some(resp) => {
            let data = resp.json().unwrap_or(Value::Null);
            if str_field(&data, "role") == Some("admin") {
                ctx.recorder
                    .pass(NAME, "Admin user data retrieved successfully");
            } else {
                ctx.recorder.record(
                    NAME,
                    false,
                    "Incorrect user role returned",
                    Some(raw_details(resp)),
                );
            }
        }
        None => ctx.recorder.fail(
            NAME,
            format!("Failed to get user data: {}", outcome.status_label()),
        ),
    }
}

async fn unauthorized_access(ctx: &mut RunContext) {
    let outcome = ctx.send(ApiRequest::get("auth/me")).await;
    ctx.expect_status(
        "Unauthorized Access",
        &outcome,
        401,
        "Correctly rejected unauthorized request",
    );
}

/// Registration body for a throwaway farmer account
fn registration_body(prefix: &str, name: &str, phone: &str, location: &GeoPoint) -> Value {
    let mut body = Map::new();
    body.insert("email".into(), Value::from(unique_email(prefix)));
    body.insert("password".into(), Value::from("testpass123"));
    body.insert("name".into(), Value::from(name));
    body.insert("role".into(), Value::from("farmer"));
    body.insert("phone".into(), Value::from(phone));
    location.merge_into(&mut body);
    Value::Object(body)
}

fn unique_email(prefix: &str) -> String {
    format!("{prefix}_{}@example.com", Local::now().timestamp_micros())
}

async fn farmer_registration(ctx: &mut RunContext) {
    const NAME: &str = "Farmer Registration";

    let body = registration_body(
        "testfarmer",
        "Test Farmer",
        "9876543299",
        &ctx.config.locations.mumbai,
    );
    let outcome = ctx.send(ApiRequest::post("auth/register").json(body)).await;

    let Some(resp) = outcome.with_status(200) else {
        ctx.recorder.fail(
            NAME,
            format!("Registration failed: {}", outcome.status_label()),
        );
        return;
    };

    let data = resp.json().unwrap_or(Value::Null);
    let user = data.get("user").unwrap_or(&Value::Null);
    let has_token = str_field(&data, "token").is_some();

    if has_token && str_field(user, "role") == Some("farmer") {
        ctx.recorder.record(
            NAME,
            true,
            "Farmer registration successful",
            Some(json!({
                "approved": user.get("approved").cloned().unwrap_or(Value::Null),
                "email": user.get("email").cloned().unwrap_or(Value::Null),
            })),
        );
    } else {
        ctx.recorder.record(
            NAME,
            false,
            "Registration response missing required fields",
            Some(raw_details(resp)),
        );
    }
}

async fn registration_outside_maharashtra(ctx: &mut RunContext) {
    let body = registration_body(
        "testfarmer2",
        "Test Farmer Outside",
        "9876543298",
        &ctx.config.locations.outside_maharashtra,
    );
    let outcome = ctx.send(ApiRequest::post("auth/register").json(body)).await;

    ctx.expect_error(
        "Registration Outside Maharashtra",
        &outcome,
        400,
        "Maharashtra",
        "Correctly rejected registration outside Maharashtra",
        "Wrong error message for outside Maharashtra",
    );
}

fn capitalized(role: Role) -> &'static str {
    match role {
        Role::Admin => "Admin",
        Role::Farmer => "Farmer",
        Role::Buyer => "Buyer",
    }
}
