//! Admin dashboard scenarios

use serde_json::{json, Value};
use tracing::info;

use super::{raw_details, RunContext};
use crate::http::ApiRequest;
use crate::models::Role;

/// Fields the stats endpoint must return
const STATS_FIELDS: &[&str] = &[
    "totalFarmers",
    "totalBuyers",
    "totalProducts",
    "totalOrders",
    "pendingApprovals",
];

pub async fn run(ctx: &mut RunContext) {
    info!("Running admin scenarios");

    admin_stats(ctx).await;
    admin_listing(
        ctx,
        "Get Pending Farmers",
        "admin/farmers/pending",
        "pending farmers",
        "Failed to get pending farmers",
    )
    .await;
    admin_listing(
        ctx,
        "Get All Users",
        "admin/users",
        "total users",
        "Failed to get all users",
    )
    .await;
    access_control(ctx).await;
}

fn missing_stats_fields(stats: &Value) -> Vec<&'static str> {
    STATS_FIELDS
        .iter()
        .copied()
        .filter(|field| stats.get(field).is_none())
        .collect()
}

async fn admin_stats(ctx: &mut RunContext) {
    const NAME: &str = "Get Admin Stats";

    let Some(token) = ctx.require_token(Role::Admin, NAME) else {
        return;
    };

    let outcome = ctx
        .send(ApiRequest::get("admin/stats").bearer(Some(&token)))
        .await;

    let Some(resp) = outcome.with_status(200) else {
        ctx.recorder.fail(
            NAME,
            format!("Failed to get admin stats: {}", outcome.status_label()),
        );
        return;
    };

    let stats = resp.json().unwrap_or(Value::Null);
    let missing = missing_stats_fields(&stats);
    if missing.is_empty() {
        ctx.recorder
            .record(NAME, true, "Admin stats retrieved successfully", Some(stats));
    } else {
        let mut details = raw_details(resp);
        details["missing"] = json!(missing);
        ctx.recorder.record(
            NAME,
            false,
            "Admin stats missing required fields",
            Some(details),
        );
    }
}

async fn admin_listing(
    ctx: &mut RunContext,
    name: &str,
    endpoint: &str,
    noun: &str,
    failure_prefix: &str,
) {
    let Some(token) = ctx.require_token(Role::Admin, name) else {
        return;
    };

    let outcome = ctx
        .send(ApiRequest::get(endpoint).bearer(Some(&token)))
        .await;
    ctx.expect_list(
        name,
        &outcome,
        |n| format!("Retrieved {n} {noun}"),
        failure_prefix,
    );
}

async fn access_control(ctx: &mut RunContext) {
    const NAME: &str = "Admin Access Control";

    let Some(token) = ctx.require_token(Role::Buyer, NAME) else {
        return;
    };

    let outcome = ctx
        .send(ApiRequest::get("admin/stats").bearer(Some(&token)))
        .await;
    ctx.expect_status(
        NAME,
        &outcome,
        401,
        "Correctly rejected buyer accessing admin endpoint",
    );
}
