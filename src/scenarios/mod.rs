//! Marketplace API scenarios
//!
//! Scenarios are grouped into suites that run in a fixed order:
//!
//! ### Authentication
//! - Seeded logins (admin, farmer, buyer with GPS)
//! - Rejected credentials and unauthenticated access
//! - Farmer registration inside and outside Maharashtra
//!
//! ### Products
//! - GPS and category filtered listings
//! - Create / update as farmer, rejected create as buyer
//!
//! ### Orders
//! - COD and Razorpay orders, insufficient stock, status updates
//!
//! ### Admin
//! - Dashboard stats, pending farmers, users, access control
//!
//! ### GPS
//! - Distance filtering and the 10km radius
//!
//! Every scenario records its outcome through the run's [`ResultRecorder`].
//! A scenario whose prerequisite (session token, created id) is missing is
//! recorded as a skip.

mod admin;
mod auth;
mod cleanup;
mod gps;
mod orders;
mod products;

pub use cleanup::cleanup_test_data;

use anyhow::Result;
use serde_json::{json, Value};
use std::fmt;

use crate::config::AppConfig;
use crate::http::{ApiClient, ApiOutcome, ApiRequest, HttpResponse};
use crate::models::{ResourceRegistry, Role, SessionState};
use crate::results::ResultRecorder;

/// Mutable state of one run, passed to every scenario
pub struct RunContext {
    pub client: ApiClient,
    pub config: AppConfig,
    pub session: SessionState,
    pub registry: ResourceRegistry,
    pub recorder: ResultRecorder,
}

impl RunContext {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = ApiClient::with_timeout(&config.base_url, config.timeout_secs)?;
        let recorder = ResultRecorder::with_critical(config.critical_tests.clone());

        Ok(Self {
            client,
            config,
            session: SessionState::new(),
            registry: ResourceRegistry::new(),
            recorder,
        })
    }

    pub async fn send(&self, request: ApiRequest) -> ApiOutcome {
        self.client.send(request).await
    }

    /// Token for `role`, or a recorded skip of `scenario` when there is none
    pub fn require_token(&mut self, role: Role, scenario: &str) -> Option<String> {
        match self.session.token(role) {
            Some(token) => Some(token.to_string()),
            None => {
                self.recorder
                    .skip(scenario, format!("no {role} session token"));
                None
            }
        }
    }

    /// Record a pass when the observed status equals `expected`
    pub fn expect_status(
        &mut self,
        name: &str,
        outcome: &ApiOutcome,
        expected: u16,
        pass_message: &str,
    ) {
        if outcome.status() == Some(expected) {
            self.recorder.pass(name, pass_message);
        } else {
            self.recorder.record(
                name,
                false,
                format!(
                    "Should have returned {expected}, got {}",
                    outcome.status_label()
                ),
                transport_details(outcome),
            );
        }
    }

    /// Record a pass when the status equals `expected` and the body's
    /// `error` field contains `needle`
    pub fn expect_error(
        &mut self,
        name: &str,
        outcome: &ApiOutcome,
        expected: u16,
        needle: &str,
        pass_message: &str,
        wrong_message: &str,
    ) {
        match outcome.with_status(expected) {
            Some(resp) => {
                let body = resp.json();
                let error = body.as_ref().and_then(|b| str_field(b, "error"));
                if error.is_some_and(|e| e.contains(needle)) {
                    self.recorder.pass(name, pass_message);
                } else {
                    self.recorder
                        .record(name, false, wrong_message, Some(raw_details(resp)));
                }
            }
            None => self.recorder.record(
                name,
                false,
                format!(
                    "Should have returned {expected}, got {}",
                    outcome.status_label()
                ),
                transport_details(outcome),
            ),
        }
    }

    /// Record a listing check: 200 with a JSON array body
    pub fn expect_list(
        &mut self,
        name: &str,
        outcome: &ApiOutcome,
        describe: impl FnOnce(usize) -> String,
        failure_prefix: &str,
    ) -> Option<Vec<Value>> {
        match outcome.with_status(200) {
            Some(resp) => match resp.json() {
                Some(Value::Array(items)) => {
                    self.recorder.pass(name, describe(items.len()));
                    Some(items)
                }
                _ => {
                    self.recorder.record(
                        name,
                        false,
                        "Response is not a list",
                        Some(raw_details(resp)),
                    );
                    None
                }
            },
            None => {
                self.recorder.record(
                    name,
                    false,
                    format!("{failure_prefix}: {}", outcome.status_label()),
                    transport_details(outcome),
                );
                None
            }
        }
    }
}

/// Ordered groups of scenarios
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Suite {
    Auth,
    Products,
    Orders,
    Admin,
    Gps,
}

impl Suite {
    pub fn all() -> Vec<Suite> {
        vec![
            Suite::Auth,
            Suite::Products,
            Suite::Orders,
            Suite::Admin,
            Suite::Gps,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Suite::Auth => "Authentication APIs",
            Suite::Products => "Product APIs",
            Suite::Orders => "Order APIs",
            Suite::Admin => "Admin APIs",
            Suite::Gps => "GPS Functionality",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auth" | "authentication" => Some(Suite::Auth),
            "products" | "product" => Some(Suite::Products),
            "orders" | "order" => Some(Suite::Orders),
            "admin" => Some(Suite::Admin),
            "gps" => Some(Suite::Gps),
            _ => None,
        }
    }

    pub async fn run(self, ctx: &mut RunContext) {
        match self {
            Suite::Auth => auth::run(ctx).await,
            Suite::Products => products::run(ctx).await,
            Suite::Orders => orders::run(ctx).await,
            Suite::Admin => admin::run(ctx).await,
            Suite::Gps => gps::run(ctx).await,
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// String field of a JSON object
pub(crate) fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// Resource id as text; servers may return numeric or string ids
pub(crate) fn id_field(value: &Value) -> Option<String> {
    match value.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Raw response attached to structural failures
pub(crate) fn raw_details(resp: &HttpResponse) -> Value {
    json!({ "status": resp.status_code, "response": resp.json_or_raw() })
}

/// Transport error attached to failures that got no response
pub(crate) fn transport_details(outcome: &ApiOutcome) -> Option<Value> {
    outcome
        .transport_error()
        .map(|e| json!({ "error": e.to_string() }))
}
