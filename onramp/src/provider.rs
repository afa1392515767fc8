//! On-ramp provider descriptors and the ordered provider catalog.
//!
//! A [`ProviderCatalog`] is loaded once at startup (typically from the
//! wallet's JSON config) and treated as immutable. Catalog order is
//! significant: resolution output preserves it.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use crate::chain::ChainId;

/// Identifier of a known on-ramp service.
///
/// The set of services with link-building support is closed ([`Moonpay`],
/// [`Transak`], [`Kado`]); any other id deserializes into [`Other`] so a
/// forward-compatible catalog entry never breaks resolution — it simply
/// produces no purchase link.
///
/// [`Moonpay`]: ServiceId::Moonpay
/// [`Transak`]: ServiceId::Transak
/// [`Kado`]: ServiceId::Kado
/// [`Other`]: ServiceId::Other
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceId {
    /// MoonPay — requires a server-signed purchase URL.
    Moonpay,
    /// Transak.
    Transak,
    /// Kado.
    Kado,
    /// Any service this crate has no link builder for.
    Other(String),
}

impl ServiceId {
    /// Returns the wire-format service id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Moonpay => "moonpay",
            Self::Transak => "transak",
            Self::Kado => "kado",
            Self::Other(id) => id,
        }
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ServiceId {
    fn from(value: &str) -> Self {
        match value {
            "moonpay" => Self::Moonpay,
            "transak" => Self::Transak,
            "kado" => Self::Kado,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for ServiceId {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl Serialize for ServiceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ServiceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        Ok(Self::from(id))
    }
}

/// A purchasable currency as configured in the catalog.
///
/// Only the display denom is needed for link building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyInfo {
    /// Currency display denom (e.g., `"ATOM"`).
    pub coin_denom: String,
}

impl CurrencyInfo {
    /// Creates a currency info from a denom.
    pub fn new<S: Into<String>>(coin_denom: S) -> Self {
        Self {
            coin_denom: coin_denom.into(),
        }
    }
}

/// Immutable descriptor of one on-ramp provider.
///
/// Loaded from config at process start. `supported_chain_ids` order is
/// significant — multi-chain link parameters are emitted in this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDescriptor {
    /// Service identifier.
    pub service_id: ServiceId,

    /// Human-readable service name (e.g., `"MoonPay"`).
    pub service_name: String,

    /// Chains this provider can deposit to, in declaration order.
    pub supported_chain_ids: Vec<ChainId>,

    /// Currencies purchasable through this provider, if configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_currencies: Option<Vec<CurrencyInfo>>,

    /// Per-chain purchasable currencies, if configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_currencies_by_chain: Option<HashMap<ChainId, Vec<CurrencyInfo>>>,

    /// Provider API key embedded in the purchase link.
    pub api_key: String,

    /// Origin the purchase link is built on (e.g., `"https://buy.moonpay.com"`).
    pub base_url: String,
}

impl ProviderDescriptor {
    /// Returns `true` if this provider lists the given chain.
    #[must_use]
    pub fn supports_chain(&self, chain_id: &ChainId) -> bool {
        self.supported_chain_ids.contains(chain_id)
    }
}

/// Ordered, immutable list of provider descriptors.
///
/// # Serialization
///
/// Serializes as a plain JSON array of descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderCatalog(Vec<ProviderDescriptor>);

impl ProviderCatalog {
    /// Creates a catalog from descriptors, preserving their order.
    #[must_use]
    pub const fn new(providers: Vec<ProviderDescriptor>) -> Self {
        Self(providers)
    }

    /// Iterates descriptors in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, ProviderDescriptor> {
        self.0.iter()
    }

    /// Returns the number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if at least one provider lists the given chain.
    #[must_use]
    pub fn supports_chain(&self, chain_id: &ChainId) -> bool {
        self.0.iter().any(|p| p.supports_chain(chain_id))
    }
}

impl<'a> IntoIterator for &'a ProviderCatalog {
    type Item = &'a ProviderDescriptor;
    type IntoIter = std::slice::Iter<'a, ProviderDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_id_known_roundtrip() {
        for (id, expected) in [
            (ServiceId::Moonpay, "\"moonpay\""),
            (ServiceId::Transak, "\"transak\""),
            (ServiceId::Kado, "\"kado\""),
        ] {
            let serialized = serde_json::to_string(&id).unwrap();
            assert_eq!(serialized, expected);
            let deserialized: ServiceId = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, id);
        }
    }

    #[test]
    fn test_service_id_unknown_roundtrip() {
        let deserialized: ServiceId = serde_json::from_str("\"ramp-network\"").unwrap();
        assert_eq!(deserialized, ServiceId::Other("ramp-network".to_owned()));
        assert_eq!(serde_json::to_string(&deserialized).unwrap(), "\"ramp-network\"");
    }

    #[test]
    fn test_descriptor_deserialize_camel_case() {
        let descriptor: ProviderDescriptor = serde_json::from_str(
            r#"{
                "serviceId": "kado",
                "serviceName": "Kado",
                "supportedChainIds": ["osmosis-1"],
                "supportedCurrencies": [{"coinDenom": "OSMO"}],
                "apiKey": "kado-key",
                "baseUrl": "https://app.kado.money"
            }"#,
        )
        .unwrap();
        assert_eq!(descriptor.service_id, ServiceId::Kado);
        assert!(descriptor.supports_chain(&ChainId::new("osmosis-1")));
        assert!(descriptor.supported_currencies_by_chain.is_none());
    }

    #[test]
    fn test_catalog_supports_chain() {
        let catalog = ProviderCatalog::new(vec![ProviderDescriptor {
            service_id: ServiceId::Transak,
            service_name: "Transak".to_owned(),
            supported_chain_ids: vec![ChainId::new("cosmoshub-4")],
            supported_currencies: None,
            supported_currencies_by_chain: None,
            api_key: "key".to_owned(),
            base_url: "https://global.transak.com".to_owned(),
        }]);
        assert!(catalog.supports_chain(&ChainId::new("cosmoshub-4")));
        assert!(!catalog.supports_chain(&ChainId::new("osmosis-1")));
    }
}
