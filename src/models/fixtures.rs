//! Test fixtures: seed credentials and GPS points

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Role;

/// Login credentials for one seeded account
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Login body, optionally carrying the caller's position
    pub fn login_body(&self, location: Option<&GeoPoint>) -> Value {
        let mut body = Map::new();
        body.insert("email".into(), Value::from(self.email.as_str()));
        body.insert("password".into(), Value::from(self.password.as_str()));
        if let Some(point) = location {
            point.merge_into(&mut body);
        }
        Value::Object(body)
    }
}

/// Seed credentials for every role
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialSet {
    pub admin: Credentials,
    pub farmer: Credentials,
    pub buyer: Credentials,
}

impl CredentialSet {
    pub fn for_role(&self, role: Role) -> &Credentials {
        match role {
            Role::Admin => &self.admin,
            Role::Farmer => &self.farmer,
            Role::Buyer => &self.buyer,
        }
    }
}

impl Default for CredentialSet {
    fn default() -> Self {
        Self {
            admin: Credentials::new("admin@freshlocal.com", "admin123"),
            farmer: Credentials::new("farmer1@example.com", "farmer123"),
            buyer: Credentials::new("buyer@example.com", "buyer123"),
        }
    }
}

/// A latitude/longitude pair
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Query parameters `latitude` and `longitude`
    pub fn query(&self) -> [(&'static str, f64); 2] {
        [("latitude", self.latitude), ("longitude", self.longitude)]
    }

    /// Add `latitude`/`longitude` keys to a JSON object
    pub fn merge_into(&self, body: &mut Map<String, Value>) {
        body.insert("latitude".into(), Value::from(self.latitude));
        body.insert("longitude".into(), Value::from(self.longitude));
    }
}

/// Named GPS points used by the location-aware checks
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Locations {
    /// Inside the delivery area
    pub mumbai: GeoPoint,
    pub pune: GeoPoint,
    /// Delhi, outside Maharashtra
    pub outside_maharashtra: GeoPoint,
    /// Roughly 10km from the Mumbai point
    pub far_mumbai: GeoPoint,
}

impl Default for Locations {
    fn default() -> Self {
        Self {
            mumbai: GeoPoint::new(19.1136, 72.8697),
            pune: GeoPoint::new(18.5204, 73.8567),
            outside_maharashtra: GeoPoint::new(28.6139, 77.2090),
            far_mumbai: GeoPoint::new(19.0500, 72.9500),
        }
    }
}
