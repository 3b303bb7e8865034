//! Run state shared between scenarios
//!
//! Session tokens per role and the registry of resources created during a run.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Marketplace user roles
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Farmer,
    Buyer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Farmer => "farmer",
            Role::Buyer => "buyer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bearer tokens obtained by login scenarios
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    tokens: HashMap<Role, String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&mut self, role: Role, token: impl Into<String>) {
        self.tokens.insert(role, token.into());
    }

    pub fn token(&self, role: Role) -> Option<&str> {
        self.tokens.get(&role).map(String::as_str)
    }
}

/// Kinds of resources the run creates on the server
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Product,
    Order,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Product => write!(f, "product"),
            ResourceKind::Order => write!(f, "order"),
        }
    }
}

/// Ids of resources created during the run, in creation order
#[derive(Clone, Debug, Default)]
pub struct ResourceRegistry {
    created: HashMap<ResourceKind, Vec<String>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: ResourceKind, id: impl Into<String>) {
        self.created.entry(kind).or_default().push(id.into());
    }

    pub fn ids(&self, kind: ResourceKind) -> &[String] {
        self.created.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, kind: ResourceKind) -> Option<&str> {
        self.ids(kind).first().map(String::as_str)
    }
}
