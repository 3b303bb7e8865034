//! Product catalog scenarios

use serde_json::{json, Value};
use tracing::info;

use super::{id_field, raw_details, str_field, RunContext};
use crate::http::ApiRequest;
use crate::models::{ResourceKind, Role};

const UPDATED_NAME: &str = "Updated Test Tomatoes";

pub async fn run(ctx: &mut RunContext) {
    info!("Running product scenarios");

    products_with_gps(ctx).await;
    all_products(ctx).await;
    create_as_farmer(ctx).await;
    create_as_buyer(ctx).await;
    farmer_products(ctx).await;
    update_product(ctx).await;
    category_filtering(ctx).await;
}

async fn products_with_gps(ctx: &mut RunContext) {
    const NAME: &str = "Get Products with GPS";

    let mumbai = ctx.config.locations.mumbai;
    let outcome = ctx
        .send(ApiRequest::get("products").query_pairs(mumbai.query()))
        .await;

    match outcome.with_status(200) {
        Some(resp) => match resp.json() {
            Some(Value::Array(products)) => {
                let has_farmer_data = products
                    .first()
                    .is_some_and(|p| p.get("farmer").is_some());
                ctx.recorder.record(
                    NAME,
                    true,
                    format!(
                        "Retrieved {} products with GPS filtering",
                        products.len()
                    ),
                    Some(json!({
                        "product_count": products.len(),
                        "has_farmer_data": has_farmer_data,
                    })),
                );
            }
            _ => ctx.recorder.record(
                NAME,
                false,
                "Response is not a list",
                Some(raw_details(resp)),
            ),
        },
        None => ctx.recorder.fail(
            NAME,
            format!("Failed to get products: {}", outcome.status_label()),
        ),
    }
}

async fn all_products(ctx: &mut RunContext) {
    let outcome = ctx.send(ApiRequest::get("products")).await;
    ctx.expect_list(
        "Get All Products",
        &outcome,
        |n| format!("Retrieved {n} total products"),
        "Failed to get all products",
    );
}

async fn create_as_farmer(ctx: &mut RunContext) {
    const NAME: &str = "Create Product (Farmer)";

    let Some(token) = ctx.require_token(Role::Farmer, NAME) else {
        return;
    };

    let outcome = ctx
        .send(
            ApiRequest::post("products")
                .json(json!({
                    "name": "Test Tomatoes",
                    "category": "Vegetable",
                    "price": 45.0,
                    "quantity": 25.0,
                    "image": "https://example.com/tomato.jpg",
                }))
                .bearer(Some(&token)),
        )
        .await;

    let Some(resp) = outcome.with_status(200) else {
        ctx.recorder.fail(
            NAME,
            format!("Product creation failed: {}", outcome.status_label()),
        );
        return;
    };

    let product = resp.json().unwrap_or(Value::Null);
    match id_field(&product) {
        Some(id) => {
            ctx.registry.register(ResourceKind::Product, id.clone());
            ctx.recorder.record(
                NAME,
                true,
                "Product created successfully",
                Some(json!({
                    "product_id": id,
                    "name": product.get("name").cloned().unwrap_or(Value::Null),
                })),
            );
        }
        None => ctx.recorder.record(
            NAME,
            false,
            "Product creation response missing ID",
            Some(raw_details(resp)),
        ),
    }
}

async fn create_as_buyer(ctx: &mut RunContext) {
    const NAME: &str = "Create Product (Buyer)";

    let Some(token) = ctx.require_token(Role::Buyer, NAME) else {
        return;
    };

    let outcome = ctx
        .send(
            ApiRequest::post("products")
                .json(json!({
                    "name": "Unauthorized Product",
                    "category": "Vegetable",
                    "price": 50.0,
                    "quantity": 10.0,
                }))
                .bearer(Some(&token)),
        )
        .await;

    ctx.expect_status(NAME, &outcome, 401, "Correctly rejected buyer creating product");
}

async fn farmer_products(ctx: &mut RunContext) {
    const NAME: &str = "Get Farmer Products";

    let Some(token) = ctx.require_token(Role::Farmer, NAME) else {
        return;
    };

    let outcome = ctx
        .send(ApiRequest::get("products/my").bearer(Some(&token)))
        .await;
    ctx.expect_list(
        NAME,
        &outcome,
        |n| format!("Retrieved {n} farmer products"),
        "Failed to get farmer products",
    );
}

async fn update_product(ctx: &mut RunContext) {
    const NAME: &str = "Update Product";

    let Some(token) = ctx.require_token(Role::Farmer, NAME) else {
        return;
    };
    let Some(product_id) = ctx.registry.first(ResourceKind::Product).map(str::to_string) else {
        ctx.recorder.skip(NAME, "no product was created");
        return;
    };

    let outcome = ctx
        .send(
            ApiRequest::put(format!("products/{product_id}"))
                .json(json!({
                    "name": UPDATED_NAME,
                    "price": 50.0,
                    "quantity": 30.0,
                }))
                .bearer(Some(&token)),
        )
        .await;

    match outcome.with_status(200) {
        Some(resp) => {
            let updated = resp.json().unwrap_or(Value::Null);
            if str_field(&updated, "name") == Some(UPDATED_NAME) {
                ctx.recorder.pass(NAME, "Product updated successfully");
            } else {
                ctx.recorder.record(
                    NAME,
                    false,
                    "Product update didn't reflect changes",
                    Some(raw_details(resp)),
                );
            }
        }
        None => ctx.recorder.fail(
            NAME,
            format!("Product update failed: {}", outcome.status_label()),
        ),
    }
}

async fn category_filtering(ctx: &mut RunContext) {
    const NAME: &str = "Category Filtering";

    let mumbai = ctx.config.locations.mumbai;
    let outcome = ctx
        .send(
            ApiRequest::get("products")
                .query("category", "Vegetable")
                .query_pairs(mumbai.query()),
        )
        .await;

    match outcome.with_status(200) {
        Some(resp) => match resp.json() {
            Some(Value::Array(products)) => {
                let all_vegetables = products
                    .iter()
                    .all(|p| str_field(p, "category") == Some("Vegetable"));
                if all_vegetables {
                    ctx.recorder.pass(
                        NAME,
                        format!("Retrieved {} vegetable products", products.len()),
                    );
                } else {
                    ctx.recorder.record(
                        NAME,
                        false,
                        "Category filtering not working correctly",
                        Some(raw_details(resp)),
                    );
                }
            }
            _ => ctx.recorder.record(
                NAME,
                false,
                "Response is not a list",
                Some(raw_details(resp)),
            ),
        },
        None => ctx.recorder.fail(
            NAME,
            format!("Category filtering failed: {}", outcome.status_label()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::test_support::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_create_product_registers_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/products"))
            .and(header("authorization", "Bearer farmer-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": "prod-1", "name": "Test Tomatoes"})),
            )
            .mount(&server)
            .await;

        let mut ctx = context_for(&server);
        ctx.session.store(Role::Farmer, "farmer-token");
        create_as_farmer(&mut ctx).await;

        assert!(outcome_named(&ctx, "Create Product (Farmer)").passed);
        assert_eq!(ctx.registry.ids(ResourceKind::Product), ["prod-1"]);
    }

    #[tokio::test]
    async fn test_update_product_skipped_without_created_product() {
        let server = MockServer::start().await;
        let mut ctx = context_for(&server);
        ctx.session.store(Role::Farmer, "farmer-token");

        update_product(&mut ctx).await;

        assert!(ctx.recorder.outcomes().is_empty());
        assert_eq!(ctx.recorder.skips()[0].reason, "no product was created");
    }

    #[tokio::test]
    async fn test_update_product_checks_name() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/products/prod-1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"name": "Test Tomatoes"})),
            )
            .mount(&server)
            .await;

        let mut ctx = context_for(&server);
        ctx.session.store(Role::Farmer, "farmer-token");
        ctx.registry.register(ResourceKind::Product, "prod-1");
        update_product(&mut ctx).await;

        let outcome = outcome_named(&ctx, "Update Product");
        assert!(!outcome.passed);
        assert_eq!(outcome.message, "Product update didn't reflect changes");
    }

    #[tokio::test]
    async fn test_category_filtering_detects_mixed_categories() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .and(query_param("category", "Vegetable"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"category": "Vegetable"},
                {"category": "Fruit"}
            ])))
            .mount(&server)
            .await;

        let mut ctx = context_for(&server);
        category_filtering(&mut ctx).await;

        assert!(!outcome_named(&ctx, "Category Filtering").passed);
    }

    #[tokio::test]
    async fn test_products_with_gps_reports_farmer_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .and(query_param("latitude", "19.1136"))
            .and(query_param("longitude", "72.8697"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "a", "farmer": {"name": "F"}}
            ])))
            .mount(&server)
            .await;

        let mut ctx = context_for(&server);
        products_with_gps(&mut ctx).await;

        let outcome = outcome_named(&ctx, "Get Products with GPS");
        assert!(outcome.passed);
        assert_eq!(outcome.details["product_count"], 1);
        assert_eq!(outcome.details["has_farmer_data"], true);
    }
}
