// ── Customer domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{Resource, ResourceId, null_as_default};

/// Account state. Inactive customers cannot sign in to the storefront.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CustomerStatus {
    Active,
    #[default]
    Inactive,
}

impl CustomerStatus {
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum AddressKind {
    #[default]
    Shipping,
    Billing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub street_address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: AddressKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_default: bool,
}

impl Address {
    /// Placeholder shown when a customer has no address on file.
    pub fn unknown() -> Self {
        Self {
            country: "Unknown".into(),
            street_address: "Unknown".into(),
            city: "Unknown".into(),
            state: "Unknown".into(),
            kind: AddressKind::Shipping,
            is_default: false,
        }
    }

    /// One-line rendering for tables.
    pub fn summary(&self) -> String {
        [&self.street_address, &self.city, &self.state, &self.country]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A storefront user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(alias = "_id")]
    pub id: ResourceId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub addresses: Vec<Address>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: CustomerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub orders: u32,
}

impl Customer {
    pub fn display_name(&self) -> String {
        let first = self.name.as_deref().filter(|s| !s.is_empty()).unwrap_or("Unnamed");
        match self.lastname.as_deref().filter(|s| !s.is_empty()) {
            Some(last) => format!("{first} {last}"),
            None => first.to_owned(),
        }
    }

    pub fn phone_or_default(&self) -> &str {
        self.phone
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("Not provided")
    }

    /// Address to ship to: default shipping, any shipping, any default,
    /// the first on file, then a placeholder.
    pub fn shipping_address(&self) -> Address {
        let shipping = |a: &&Address| a.kind == AddressKind::Shipping;
        self.addresses
            .iter()
            .find(|a| shipping(a) && a.is_default)
            .or_else(|| self.addresses.iter().find(shipping))
            .or_else(|| self.addresses.iter().find(|a| a.is_default))
            .or_else(|| self.addresses.first())
            .cloned()
            .unwrap_or_else(Address::unknown)
    }

    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }
}

impl Resource for Customer {
    const KIND: &'static str = "customer";

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn is_listed(&self) -> bool {
        !self.is_admin()
    }
}
