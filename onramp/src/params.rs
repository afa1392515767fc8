//! Provider-specific purchase URL parameter building.
//!
//! [`build_params`] is a pure function dispatching on [`ServiceId`]: one
//! closed match arm per provider, no shared state between arms. Adding a
//! provider means adding one enum variant and one builder function.
//!
//! Values that embed structured JSON (wallet-address maps) are
//! percent-encoded here, at the point where the JSON is produced; scalar
//! values are left as text for the assembler to encode exactly once (see
//! [`crate::url::assemble`]).

use serde_json::{Map, Value};

use crate::chain::{AccountSnapshot, ChainSnapshot};
use crate::provider::{ProviderDescriptor, ServiceId};

/// A single query parameter value with its encoding discipline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Plain text; the assembler percent-encodes it once.
    Text(String),
    /// Comma-joined list; the assembler percent-encodes each element but
    /// leaves the joining commas bare.
    List(Vec<String>),
    /// Already percent-encoded payload (JSON blobs); emitted verbatim.
    Encoded(String),
}

/// Ordered collection of query parameters.
///
/// Insertion order is the serialization order — providers that care about
/// parameter order get a deterministic URL, and so do tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(&'static str, ParamValue)>);

impl Params {
    /// Creates an empty parameter list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a plain-text parameter.
    pub fn text<S: Into<String>>(&mut self, key: &'static str, value: S) {
        self.0.push((key, ParamValue::Text(value.into())));
    }

    /// Appends a comma-joined list parameter.
    pub fn list(&mut self, key: &'static str, values: Vec<String>) {
        self.0.push((key, ParamValue::List(values)));
    }

    /// Appends an already percent-encoded parameter.
    pub fn encoded<S: Into<String>>(&mut self, key: &'static str, value: S) {
        self.0.push((key, ParamValue::Encoded(value.into())));
    }

    /// Iterates parameters in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, (&'static str, ParamValue)> {
        self.0.iter()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no parameters were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the value for a key, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Builds the purchase URL query parameters for one provider.
///
/// `active_account` / `active_chain` describe the wallet's currently
/// selected chain; callers pass `None` for the account when no usable
/// address exists, which switches moonpay and transak into their
/// multi-chain address form. `supported_accounts` and `supported_chains`
/// are the parallel per-chain snapshots in the provider's declared chain
/// order.
///
/// Returns `None` when the provider cannot produce a link: unrecognized
/// service ids, or address forms with no address to embed.
#[must_use]
pub fn build_params(
    descriptor: &ProviderDescriptor,
    active_account: Option<&AccountSnapshot>,
    active_chain: Option<&ChainSnapshot>,
    supported_accounts: &[AccountSnapshot],
    supported_chains: &[ChainSnapshot],
) -> Option<Params> {
    match &descriptor.service_id {
        ServiceId::Moonpay => moonpay_params(
            descriptor,
            active_account,
            active_chain,
            supported_accounts,
            supported_chains,
        ),
        ServiceId::Transak => transak_params(
            descriptor,
            active_account,
            active_chain,
            supported_accounts,
            supported_chains,
        ),
        ServiceId::Kado => Some(kado_params(
            descriptor,
            active_account,
            active_chain,
            supported_chains,
        )),
        ServiceId::Other(_) => None,
    }
}

/// Folds parallel chain/account snapshots into a `denom → address` JSON
/// object, lower-casing denoms and skipping chains with no address.
fn address_map(
    supported_accounts: &[AccountSnapshot],
    supported_chains: &[ChainSnapshot],
) -> Map<String, Value> {
    supported_chains
        .iter()
        .zip(supported_accounts)
        .filter_map(|(chain, account)| {
            let address = account.address.clone()?;
            Some((chain.currency_code.to_lowercase(), Value::String(address)))
        })
        .collect()
}

/// Percent-encodes a JSON value for embedding in a query string.
fn encode_json(value: &Value) -> String {
    urlencoding::encode(&value.to_string()).into_owned()
}

fn moonpay_params(
    descriptor: &ProviderDescriptor,
    active_account: Option<&AccountSnapshot>,
    active_chain: Option<&ChainSnapshot>,
    supported_accounts: &[AccountSnapshot],
    supported_chains: &[ChainSnapshot],
) -> Option<Params> {
    let mut params = Params::new();
    params.text("apiKey", descriptor.api_key.clone());
    params.text("showWalletAddressForm", "true");

    match (active_account, active_chain) {
        (Some(account), Some(chain)) => {
            let denom = chain.currency_code.to_lowercase();
            let address = account.address.clone().unwrap_or_default();
            let single = Value::Object(Map::from_iter([(denom.clone(), Value::String(address))]));
            params.encoded("walletAddress", encode_json(&single));
            params.text("currencyCode", denom);
        }
        _ => {
            let addresses = address_map(supported_accounts, supported_chains);
            if addresses.is_empty() {
                return None;
            }
            params.encoded("walletAddresses", encode_json(&Value::Object(addresses)));
        }
    }
    Some(params)
}

fn transak_params(
    descriptor: &ProviderDescriptor,
    active_account: Option<&AccountSnapshot>,
    active_chain: Option<&ChainSnapshot>,
    supported_accounts: &[AccountSnapshot],
    supported_chains: &[ChainSnapshot],
) -> Option<Params> {
    let mut params = Params::new();
    params.text("apiKey", descriptor.api_key.clone());
    params.text("hideMenu", "true");

    match (active_account, active_chain) {
        (Some(account), Some(chain)) => {
            params.text("walletAddress", account.address.clone().unwrap_or_default());
            params.text("cryptoCurrencyCode", chain.currency_code.clone());
        }
        _ => {
            let coins = address_map(supported_accounts, supported_chains);
            if coins.is_empty() {
                return None;
            }
            let data = Value::Object(Map::from_iter([("coins".to_owned(), Value::Object(coins))]));
            params.encoded("walletAddressesData", encode_json(&data));
            params.text(
                "cryptoCurrencyList",
                supported_chains
                    .iter()
                    .map(|chain| chain.currency_code.as_str())
                    .collect::<Vec<_>>()
                    .join(","),
            );
        }
    }
    Some(params)
}

fn kado_params(
    descriptor: &ProviderDescriptor,
    active_account: Option<&AccountSnapshot>,
    active_chain: Option<&ChainSnapshot>,
    supported_chains: &[ChainSnapshot],
) -> Params {
    let mut params = Params::new();
    params.text("apiKey", descriptor.api_key.clone());
    params.text("product", "BUY");
    params.list(
        "networkList",
        supported_chains
            .iter()
            .map(|chain| chain.display_name.to_uppercase())
            .collect(),
    );
    if let Some(currencies) = &descriptor.supported_currencies {
        params.list(
            "cryptoList",
            currencies.iter().map(|c| c.coin_denom.clone()).collect(),
        );
    }

    if let (Some(account), Some(chain)) = (active_account, active_chain) {
        params.text("onToAddress", account.address.clone().unwrap_or_default());
        let per_chain_currency = descriptor
            .supported_currencies_by_chain
            .as_ref()
            .and_then(|by_chain| by_chain.get(&chain.chain_id))
            .and_then(|currencies| currencies.first());
        if let Some(currency) = per_chain_currency {
            params.text("onRevCurrency", currency.coin_denom.clone());
        }
        params.text("network", chain.display_name.to_uppercase());
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainId;
    use crate::provider::CurrencyInfo;
    use std::collections::HashMap;

    fn descriptor(service_id: ServiceId) -> ProviderDescriptor {
        ProviderDescriptor {
            service_id,
            service_name: "Test".to_owned(),
            supported_chain_ids: vec![ChainId::new("cosmoshub-4"), ChainId::new("osmosis-1")],
            supported_currencies: None,
            supported_currencies_by_chain: None,
            api_key: "test-key".to_owned(),
            base_url: "https://example.com".to_owned(),
        }
    }

    fn snapshots() -> (Vec<AccountSnapshot>, Vec<ChainSnapshot>) {
        let accounts = vec![
            AccountSnapshot {
                chain_id: ChainId::new("cosmoshub-4"),
                address: Some("cosmos1abc".to_owned()),
            },
            AccountSnapshot {
                chain_id: ChainId::new("osmosis-1"),
                address: Some("osmo1xyz".to_owned()),
            },
        ];
        let chains = vec![
            ChainSnapshot {
                chain_id: ChainId::new("cosmoshub-4"),
                currency_code: "ATOM".to_owned(),
                display_name: "Cosmos Hub".to_owned(),
            },
            ChainSnapshot {
                chain_id: ChainId::new("osmosis-1"),
                currency_code: "OSMO".to_owned(),
                display_name: "Osmosis".to_owned(),
            },
        ];
        (accounts, chains)
    }

    #[test]
    fn test_moonpay_active_uses_single_address_form() {
        let (accounts, chains) = snapshots();
        let params = build_params(
            &descriptor(ServiceId::Moonpay),
            Some(&accounts[0]),
            Some(&chains[0]),
            &accounts,
            &chains,
        )
        .unwrap();

        assert_eq!(
            params.get("walletAddress"),
            Some(&ParamValue::Encoded(
                "%7B%22atom%22%3A%22cosmos1abc%22%7D".to_owned()
            ))
        );
        assert_eq!(
            params.get("currencyCode"),
            Some(&ParamValue::Text("atom".to_owned()))
        );
        assert!(params.get("walletAddresses").is_none());
    }

    #[test]
    fn test_moonpay_without_active_folds_all_addresses() {
        let (accounts, chains) = snapshots();
        let params =
            build_params(&descriptor(ServiceId::Moonpay), None, None, &accounts, &chains).unwrap();

        assert!(params.get("walletAddress").is_none());
        assert!(params.get("currencyCode").is_none());
        assert_eq!(
            params.get("walletAddresses"),
            Some(&ParamValue::Encoded(
                "%7B%22atom%22%3A%22cosmos1abc%22%2C%22osmo%22%3A%22osmo1xyz%22%7D".to_owned()
            ))
        );
    }

    #[test]
    fn test_moonpay_no_addresses_yields_no_link() {
        let (mut accounts, chains) = snapshots();
        for account in &mut accounts {
            account.address = None;
        }
        let params =
            build_params(&descriptor(ServiceId::Moonpay), None, None, &accounts, &chains);
        assert!(params.is_none());
    }

    #[test]
    fn test_transak_active_uses_raw_address_and_denom_case() {
        let (accounts, chains) = snapshots();
        let params = build_params(
            &descriptor(ServiceId::Transak),
            Some(&accounts[1]),
            Some(&chains[1]),
            &accounts,
            &chains,
        )
        .unwrap();

        assert_eq!(
            params.get("walletAddress"),
            Some(&ParamValue::Text("osmo1xyz".to_owned()))
        );
        // Not lower-cased, unlike moonpay.
        assert_eq!(
            params.get("cryptoCurrencyCode"),
            Some(&ParamValue::Text("OSMO".to_owned()))
        );
    }

    #[test]
    fn test_transak_active_missing_address_is_empty_string() {
        let (accounts, chains) = snapshots();
        let uninitialized = AccountSnapshot {
            chain_id: ChainId::new("cosmoshub-4"),
            address: None,
        };
        let params = build_params(
            &descriptor(ServiceId::Transak),
            Some(&uninitialized),
            Some(&chains[0]),
            &accounts,
            &chains,
        )
        .unwrap();
        assert_eq!(
            params.get("walletAddress"),
            Some(&ParamValue::Text(String::new()))
        );
    }

    #[test]
    fn test_transak_fallback_lists_every_supported_chain() {
        let (accounts, chains) = snapshots();
        let params =
            build_params(&descriptor(ServiceId::Transak), None, None, &accounts, &chains).unwrap();

        let expected =
            urlencoding::encode(r#"{"coins":{"atom":"cosmos1abc","osmo":"osmo1xyz"}}"#).into_owned();
        assert_eq!(
            params.get("walletAddressesData"),
            Some(&ParamValue::Encoded(expected))
        );
        assert_eq!(
            params.get("cryptoCurrencyList"),
            Some(&ParamValue::Text("ATOM,OSMO".to_owned()))
        );
    }

    #[test]
    fn test_kado_network_list_upper_cased_per_chain() {
        let (_, chains) = snapshots();
        let params = build_params(&descriptor(ServiceId::Kado), None, None, &[], &chains).unwrap();

        assert_eq!(
            params.get("networkList"),
            Some(&ParamValue::List(vec![
                "COSMOS HUB".to_owned(),
                "OSMOSIS".to_owned()
            ]))
        );
        assert!(params.get("onToAddress").is_none());
        assert!(params.get("cryptoList").is_none());
    }

    #[test]
    fn test_kado_active_includes_address_currency_and_network() {
        let (accounts, chains) = snapshots();
        let mut desc = descriptor(ServiceId::Kado);
        desc.supported_currencies = Some(vec![
            CurrencyInfo::new("ATOM"),
            CurrencyInfo::new("OSMO"),
        ]);
        desc.supported_currencies_by_chain = Some(HashMap::from_iter([(
            ChainId::new("cosmoshub-4"),
            vec![CurrencyInfo::new("ATOM")],
        )]));

        let params = build_params(
            &desc,
            Some(&accounts[0]),
            Some(&chains[0]),
            &accounts,
            &chains,
        )
        .unwrap();

        assert_eq!(
            params.get("cryptoList"),
            Some(&ParamValue::List(vec!["ATOM".to_owned(), "OSMO".to_owned()]))
        );
        assert_eq!(
            params.get("onToAddress"),
            Some(&ParamValue::Text("cosmos1abc".to_owned()))
        );
        assert_eq!(
            params.get("onRevCurrency"),
            Some(&ParamValue::Text("ATOM".to_owned()))
        );
        assert_eq!(
            params.get("network"),
            Some(&ParamValue::Text("COSMOS HUB".to_owned()))
        );
    }

    #[test]
    fn test_unknown_service_produces_no_params() {
        let (accounts, chains) = snapshots();
        let params = build_params(
            &descriptor(ServiceId::Other("ramp-network".to_owned())),
            Some(&accounts[0]),
            Some(&chains[0]),
            &accounts,
            &chains,
        );
        assert!(params.is_none());
    }
}
