//! Best-effort removal of products created during the run
//!
//! Results are printed only; nothing here is recorded as an outcome.

use tracing::{debug, info};

use super::RunContext;
use crate::http::ApiRequest;
use crate::models::{ResourceKind, Role};

/// Delete every registered product with the farmer token.
/// Returns the number of products deleted.
pub async fn cleanup_test_data(ctx: &mut RunContext) -> usize {
    let Some(token) = ctx.session.token(Role::Farmer).map(str::to_string) else {
        debug!("No farmer session, nothing to clean up");
        return 0;
    };

    let product_ids = ctx.registry.ids(ResourceKind::Product).to_vec();
    info!("Cleaning up {} test product(s)", product_ids.len());

    let mut deleted = 0;
    for product_id in product_ids {
        let outcome = ctx
            .send(ApiRequest::delete(format!("products/{product_id}")).bearer(Some(&token)))
            .await;

        if outcome.status() == Some(200) {
            println!("✅ Deleted test product: {product_id}");
            deleted += 1;
        } else {
            println!("❌ Failed to delete test product: {product_id}");
        }
    }

    deleted
}
