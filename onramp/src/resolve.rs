//! Support resolution across the provider catalog and final result
//! assembly.
//!
//! [`resolve_providers`] is the synchronous half: for the wallet's active
//! chain it determines, per provider, whether the chain is supported,
//! gathers the per-chain account and chain snapshots, and assembles an
//! unsigned purchase URL. It is re-run to completion whenever the active
//! chain or the underlying registries change, performs no I/O, and never
//! fails.
//!
//! [`assemble_resolution`] merges the signing coordinator's snapshot into
//! the resolved list (moonpay is the only provider whose link must be
//! server-signed) and computes whether the active chain is purchasable at
//! all.

use crate::chain::{AccountResolver, AccountSnapshot, ChainResolver, ChainSnapshot};
use crate::params::build_params;
use crate::provider::{ProviderCatalog, ProviderDescriptor, ServiceId};
use crate::signing::SigningSnapshot;
use crate::url::assemble;

/// One provider's resolution result for the active chain.
///
/// `supported_accounts` and `supported_chains` are both `None` when the
/// provider does not list the active chain, and otherwise both `Some` with
/// one entry per supported chain in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProvider {
    /// The catalog descriptor this entry was resolved from.
    pub descriptor: ProviderDescriptor,
    /// Account snapshots for every chain the provider supports.
    pub supported_accounts: Option<Vec<AccountSnapshot>>,
    /// Chain snapshots parallel to `supported_accounts`.
    pub supported_chains: Option<Vec<ChainSnapshot>>,
    /// Fully assembled purchase URL, when the required inputs exist.
    pub purchase_url: Option<String>,
    /// `true` only while this provider's signed URL is being fetched.
    pub is_loading: bool,
}

impl ResolvedProvider {
    /// An entry for a provider that does not support the active chain.
    fn unsupported(descriptor: &ProviderDescriptor) -> Self {
        Self {
            descriptor: descriptor.clone(),
            supported_accounts: None,
            supported_chains: None,
            purchase_url: None,
            is_loading: false,
        }
    }
}

/// Final output consumed by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyResolution {
    /// One entry per catalog provider, in catalog order.
    pub providers: Vec<ResolvedProvider>,
    /// `true` iff at least one provider lists the active chain.
    pub is_support_chain: bool,
}

/// Returns the unsigned moonpay purchase URL from a freshly resolved list.
///
/// This is the value to feed into the signing coordinator, read before
/// [`assemble_resolution`] overwrites the moonpay entry with signing state.
#[must_use]
pub fn moonpay_unsigned_url(providers: &[ResolvedProvider]) -> Option<&str> {
    providers
        .iter()
        .find(|p| p.descriptor.service_id == ServiceId::Moonpay)
        .and_then(|p| p.purchase_url.as_deref())
}

/// Resolves every catalog provider against the wallet's active chain.
///
/// Providers that do not list the active chain come back as bare
/// descriptors. For the rest, one account and one chain snapshot are read
/// per supported chain (declaration order preserved) and the unsigned
/// purchase URL is assembled. Individual missing accounts surface as
/// snapshots with no address, never as errors.
pub fn resolve_providers<A, C>(
    catalog: &ProviderCatalog,
    accounts: &A,
    chains: &C,
) -> Vec<ResolvedProvider>
where
    A: AccountResolver + ?Sized,
    C: ChainResolver + ?Sized,
{
    let active_chain = chains.current();
    let active_account = accounts.account(&active_chain.chain_id);
    // The active pair participates in link building only once the wallet
    // actually has an address on the active chain; otherwise providers
    // fall back to their multi-chain address forms.
    let active = active_account
        .address
        .is_some()
        .then_some((&active_account, &active_chain));

    catalog
        .iter()
        .map(|descriptor| {
            if !descriptor.supports_chain(&active_chain.chain_id) {
                return ResolvedProvider::unsupported(descriptor);
            }

            let supported_accounts: Vec<AccountSnapshot> = descriptor
                .supported_chain_ids
                .iter()
                .map(|chain_id| accounts.account(chain_id))
                .collect();
            let supported_chains: Vec<ChainSnapshot> = descriptor
                .supported_chain_ids
                .iter()
                .map(|chain_id| chains.chain(chain_id))
                .collect();

            let purchase_url = build_params(
                descriptor,
                active.map(|(account, _)| account),
                active.map(|(_, chain)| chain),
                &supported_accounts,
                &supported_chains,
            )
            .map(|params| assemble(&descriptor.base_url, &params));

            ResolvedProvider {
                descriptor: descriptor.clone(),
                supported_accounts: Some(supported_accounts),
                supported_chains: Some(supported_chains),
                purchase_url,
                is_loading: false,
            }
        })
        .collect()
}

/// Merges the signing snapshot into the resolved list and computes chain
/// support.
///
/// Only the moonpay entry is touched: its `purchase_url` becomes the
/// signed URL (or `None` while the round is loading, failed, or idle) and
/// its `is_loading` mirrors the snapshot. All other providers keep their
/// synchronously assembled URLs.
#[must_use]
pub fn assemble_resolution(
    mut providers: Vec<ResolvedProvider>,
    signing: &SigningSnapshot,
) -> BuyResolution {
    let is_support_chain = providers.iter().any(|p| p.supported_chains.is_some());

    for provider in &mut providers {
        if provider.descriptor.service_id == ServiceId::Moonpay {
            provider.purchase_url = signing.signed_url.clone();
            provider.is_loading = signing.is_loading;
        }
    }

    BuyResolution {
        providers,
        is_support_chain,
    }
}
