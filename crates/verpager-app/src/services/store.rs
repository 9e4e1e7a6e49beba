//! Version store capability

use verpager_core::prelude::*;
use verpager_core::{
    InstanceContext, PageResult, UpgradeOutcome, UpgradeRequest, VersionId, VersionQuery,
    VersionValue,
};

/// Remote store backing the upgrade dialog.
///
/// Implementations must tolerate overlapping calls: the pager may issue a
/// search while a load-more request is still outstanding and discards the
/// stale response itself.
#[trait_variant::make(VersionStore: Send)]
pub trait LocalVersionStore {
    /// Fetch one page of versions
    async fn fetch_version_page(&self, query: VersionQuery) -> Result<PageResult>;

    /// Fetch the values document bound to `version_id` for this instance
    async fn fetch_value_for_version(
        &self,
        context: &InstanceContext,
        version_id: &VersionId,
    ) -> Result<VersionValue>;

    /// Submit an upgrade of the instance
    async fn upgrade(&self, request: UpgradeRequest) -> Result<UpgradeOutcome>;
}
