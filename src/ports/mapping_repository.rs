//! MappingRepository port - Local entity id ↔ remote processor id.
//!
//! Every object synced to Dodo Payments (orders/payments, subscriptions,
//! products, coupons) keeps a one-to-one mapping between the store's
//! numeric id and the processor's string id. Webhooks arrive with remote
//! ids only, so handlers resolve them through this port.

use async_trait::async_trait;
use std::fmt;

use crate::domain::foundation::DomainError;

/// Which mapping table a lookup targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingKind {
    /// Store order id ↔ remote payment id.
    Payment,
    /// Store subscription id ↔ remote subscription id.
    Subscription,
    /// Store product id ↔ remote product id.
    Product,
    /// Store coupon id ↔ remote discount id.
    Coupon,
}

impl MappingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MappingKind::Payment => "payment",
            MappingKind::Subscription => "subscription",
            MappingKind::Product => "product",
            MappingKind::Coupon => "coupon",
        }
    }
}

impl fmt::Display for MappingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Port for the id mapping tables.
///
/// Both sides are unique per kind: saving a mapping for an existing local
/// id replaces its remote id, and a remote id may belong to one local id only.
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Resolve a remote id to the local id it was synced from.
    async fn find_local_id(
        &self,
        kind: MappingKind,
        remote_id: &str,
    ) -> Result<Option<u64>, DomainError>;

    /// Resolve a local id to its remote counterpart.
    async fn find_remote_id(
        &self,
        kind: MappingKind,
        local_id: u64,
    ) -> Result<Option<String>, DomainError>;

    /// Store or replace the mapping for `local_id`.
    ///
    /// Returns `ErrorCode::MappingConflict` if `remote_id` already belongs
    /// to a different local id.
    async fn save(
        &self,
        kind: MappingKind,
        local_id: u64,
        remote_id: &str,
    ) -> Result<(), DomainError>;

    /// Remove the mapping for `local_id`. Returns true if one existed.
    async fn delete(&self, kind: MappingKind, local_id: u64) -> Result<bool, DomainError>;
}
