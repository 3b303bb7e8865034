//! Order scenarios
//!
//! Needs in-stock products near the Mumbai fixture; without them the suite
//! records a failed setup and stops.

use serde_json::{json, Value};
use tracing::{info, warn};

use super::{id_field, raw_details, str_field, RunContext};
use crate::http::ApiRequest;
use crate::models::{ResourceKind, Role};

/// Quantity no product is expected to have in stock
const EXCESSIVE_QUANTITY: u64 = 999_999;

pub async fn run(ctx: &mut RunContext) {
    info!("Running order scenarios");

    let available = available_products(ctx).await;
    if available.is_empty() {
        warn!("No in-stock products, skipping order scenarios");
        ctx.recorder.fail(
            "Order APIs Setup",
            "No available products found for order testing",
        );
        return;
    }

    create_cod_order(ctx, &available).await;
    insufficient_quantity(ctx, &available[0]).await;
    buyer_orders(ctx).await;
    farmer_orders(ctx).await;
    update_order_status(ctx).await;
    create_razorpay_order(ctx, &available[0]).await;
}

/// Ids of up to two products with quantity > 0 near Mumbai
async fn available_products(ctx: &RunContext) -> Vec<String> {
    let mumbai = ctx.config.locations.mumbai;
    let outcome = ctx
        .send(ApiRequest::get("products").query_pairs(mumbai.query()))
        .await;

    let Some(Value::Array(products)) = outcome.with_status(200).and_then(|r| r.json()) else {
        return Vec::new();
    };

    products
        .iter()
        .filter(|p| p.get("quantity").and_then(Value::as_f64).unwrap_or(0.0) > 0.0)
        .filter_map(id_field)
        .take(2)
        .collect()
}

async fn create_cod_order(ctx: &mut RunContext, available: &[String]) {
    const NAME: &str = "Create Order (COD)";

    let Some(token) = ctx.require_token(Role::Buyer, NAME) else {
        return;
    };

    let mut items = vec![json!({"productId": available[0], "quantity": 2})];
    if let Some(second) = available.get(1) {
        items.push(json!({"productId": second, "quantity": 1}));
    }

    let outcome = ctx
        .send(
            ApiRequest::post("orders")
                .json(json!({"items": items, "paymentMode": "cod"}))
                .bearer(Some(&token)),
        )
        .await;

    let Some(resp) = outcome.with_status(200) else {
        ctx.recorder.fail(
            NAME,
            format!("Order creation failed: {}", outcome.status_label()),
        );
        return;
    };

    let order = resp.json().unwrap_or(Value::Null);
    match id_field(&order) {
        Some(id) => {
            ctx.registry.register(ResourceKind::Order, id.clone());
            ctx.recorder.record(
                NAME,
                true,
                "COD order created successfully",
                Some(json!({
                    "order_id": id,
                    "total_amount": order.get("totalAmount").cloned().unwrap_or(Value::Null),
                    "payment_status": order.get("paymentStatus").cloned().unwrap_or(Value::Null),
                })),
            );
        }
        None => ctx.recorder.record(
            NAME,
            false,
            "Order creation response missing ID",
            Some(raw_details(resp)),
        ),
    }
}

async fn insufficient_quantity(ctx: &mut RunContext, product_id: &str) {
    const NAME: &str = "Order Insufficient Quantity";

    let Some(token) = ctx.require_token(Role::Buyer, NAME) else {
        return;
    };

    let outcome = ctx
        .send(
            ApiRequest::post("orders")
                .json(json!({
                    "items": [{"productId": product_id, "quantity": EXCESSIVE_QUANTITY}],
                    "paymentMode": "cod",
                }))
                .bearer(Some(&token)),
        )
        .await;

    ctx.expect_error(
        NAME,
        &outcome,
        400,
        "Insufficient quantity",
        "Correctly rejected order with insufficient quantity",
        "Wrong error message for insufficient quantity",
    );
}

async fn buyer_orders(ctx: &mut RunContext) {
    const NAME: &str = "Get Buyer Orders";

    let Some(token) = ctx.require_token(Role::Buyer, NAME) else {
        return;
    };

    let outcome = ctx
        .send(ApiRequest::get("orders/buyer").bearer(Some(&token)))
        .await;
    ctx.expect_list(
        NAME,
        &outcome,
        |n| format!("Retrieved {n} buyer orders"),
        "Failed to get buyer orders",
    );
}

async fn farmer_orders(ctx: &mut RunContext) {
    const NAME: &str = "Get Farmer Orders";

    let Some(token) = ctx.require_token(Role::Farmer, NAME) else {
        return;
    };

    let outcome = ctx
        .send(ApiRequest::get("orders/farmer").bearer(Some(&token)))
        .await;
    ctx.expect_list(
        NAME,
        &outcome,
        |n| format!("Retrieved {n} farmer orders"),
        "Failed to get farmer orders",
    );
}

async fn update_order_status(ctx: &mut RunContext) {
    const NAME: &str = "Update Order Status";

    let Some(token) = ctx.require_token(Role::Farmer, NAME) else {
        return;
    };
    let Some(order_id) = ctx.registry.first(ResourceKind::Order).map(str::to_string) else {
        ctx.recorder.skip(NAME, "no order was created");
        return;
    };

    let outcome = ctx
        .send(
            ApiRequest::put(format!("orders/{order_id}"))
                .json(json!({"orderStatus": "packed"}))
                .bearer(Some(&token)),
        )
        .await;

    match outcome.with_status(200) {
        Some(resp) => {
            let order = resp.json().unwrap_or(Value::Null);
            if str_field(&order, "orderStatus") == Some("packed") {
                ctx.recorder.pass(NAME, "Order status updated successfully");
            } else {
                ctx.recorder.record(
                    NAME,
                    false,
                    "Order status update didn't reflect changes",
                    Some(raw_details(resp)),
                );
            }
        }
        None => ctx.recorder.fail(
            NAME,
            format!("Order status update failed: {}", outcome.status_label()),
        ),
    }
}

async fn create_razorpay_order(ctx: &mut RunContext, product_id: &str) {
    const NAME: &str = "Create Razorpay Order";

    let Some(token) = ctx.require_token(Role::Buyer, NAME) else {
        return;
    };

    let outcome = ctx
        .send(
            ApiRequest::post("orders")
                .json(json!({
                    "items": [{"productId": product_id, "quantity": 1}],
                    "paymentMode": "razorpay",
                }))
                .bearer(Some(&token)),
        )
        .await;

    let Some(resp) = outcome.with_status(200) else {
        ctx.recorder.fail(
            NAME,
            format!("Razorpay order creation failed: {}", outcome.status_label()),
        );
        return;
    };

    let order = resp.json().unwrap_or(Value::Null);
    match str_field(&order, "razorpayOrderId").filter(|id| !id.is_empty()) {
        Some(razorpay_id) => ctx.recorder.record(
            NAME,
            true,
            "Razorpay order created successfully",
            Some(json!({
                "razorpay_order_id": razorpay_id,
                "payment_status": order.get("paymentStatus").cloned().unwrap_or(Value::Null),
            })),
        ),
        None => ctx.recorder.record(
            NAME,
            false,
            "Razorpay order missing razorpayOrderId",
            Some(raw_details(resp)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::test_support::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_products(server: &MockServer, products: Value) {
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(products))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_available_products_filters_stock() {
        let server = MockServer::start().await;
        mount_products(
            &server,
            json!([
                {"id": "a", "quantity": 0},
                {"id": "b", "quantity": 5},
                {"id": "c"},
                {"id": "d", "quantity": 1.5},
                {"id": "e", "quantity": 9}
            ]),
        )
        .await;

        let ctx = context_for(&server);
        assert_eq!(available_products(&ctx).await, ["b", "d"]);
    }

    #[tokio::test]
    async fn test_no_stock_records_setup_failure() {
        let server = MockServer::start().await;
        mount_products(&server, json!([])).await;

        let mut ctx = context_for(&server);
        ctx.session.store(Role::Buyer, "buyer-token");
        run(&mut ctx).await;

        assert_eq!(ctx.recorder.outcomes().len(), 1);
        let outcome = outcome_named(&ctx, "Order APIs Setup");
        assert!(!outcome.passed);
    }

    #[tokio::test]
    async fn test_insufficient_quantity_passes_on_expected_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/orders"))
            .and(body_partial_json(json!({
                "items": [{"productId": "b", "quantity": 999999}]
            })))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "Insufficient quantity for Test Tomatoes"
            })))
            .mount(&server)
            .await;

        let mut ctx = context_for(&server);
        ctx.session.store(Role::Buyer, "buyer-token");
        insufficient_quantity(&mut ctx, "b").await;

        let outcome = outcome_named(&ctx, "Order Insufficient Quantity");
        assert!(outcome.passed);
        assert_eq!(
            outcome.message,
            "Correctly rejected order with insufficient quantity"
        );
    }

    #[tokio::test]
    async fn test_insufficient_quantity_wrong_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/orders"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "Product not found"})),
            )
            .mount(&server)
            .await;

        let mut ctx = context_for(&server);
        ctx.session.store(Role::Buyer, "buyer-token");
        insufficient_quantity(&mut ctx, "b").await;

        let outcome = outcome_named(&ctx, "Order Insufficient Quantity");
        assert!(!outcome.passed);
        assert_eq!(outcome.message, "Wrong error message for insufficient quantity");
    }

    #[tokio::test]
    async fn test_cod_order_then_status_update() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/orders"))
            .and(body_partial_json(json!({"paymentMode": "cod"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "order-7",
                "totalAmount": 140.0,
                "paymentStatus": "pending"
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/orders/order-7"))
            .and(body_partial_json(json!({"orderStatus": "packed"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"orderStatus": "packed"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut ctx = context_for(&server);
        ctx.session.store(Role::Buyer, "buyer-token");
        ctx.session.store(Role::Farmer, "farmer-token");

        create_cod_order(&mut ctx, &["b".to_string(), "d".to_string()]).await;
        update_order_status(&mut ctx).await;

        let created = outcome_named(&ctx, "Create Order (COD)");
        assert!(created.passed);
        assert_eq!(created.details["order_id"], "order-7");
        assert!(outcome_named(&ctx, "Update Order Status").passed);
    }

    #[tokio::test]
    async fn test_razorpay_order_requires_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/orders"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "order-8",
                "razorpayOrderId": ""
            })))
            .mount(&server)
            .await;

        let mut ctx = context_for(&server);
        ctx.session.store(Role::Buyer, "buyer-token");
        create_razorpay_order(&mut ctx, "b").await;

        assert!(!outcome_named(&ctx, "Create Razorpay Order").passed);
    }
}
