//! Destination-list resolution with best-effort handle enrichment.

use futures::stream::{self, StreamExt};

use clipcast_core::LinkedAccount;
use clipcast_graph::GraphClient;

use crate::error::PublishError;

const MAX_CONCURRENT_LOOKUPS: usize = 4;

/// Resolves the destination accounts reachable with this token: lists the
/// user's pages with an Instagram linkage, then enriches each account with
/// its username.
///
/// Handle lookups run concurrently and settle independently — a failed lookup
/// keeps its account in the list with `username: None` instead of dropping it
/// or aborting the siblings. Result order follows the provider's account
/// order.
///
/// # Errors
///
/// Returns [`PublishError::Graph`] only if the account listing itself fails;
/// per-account username failures are logged and absorbed.
pub async fn resolve_destinations(
    graph: &GraphClient,
    access_token: &str,
) -> Result<Vec<LinkedAccount>, PublishError> {
    let accounts = graph.list_accounts(access_token).await?;

    let destinations: Vec<LinkedAccount> = stream::iter(accounts)
        .map(|account| async move {
            match graph.account_username(access_token, &account.id).await {
                Ok(username) => LinkedAccount {
                    id: account.id,
                    name: account.name,
                    username: Some(username),
                },
                Err(e) => {
                    tracing::warn!(
                        account_id = %account.id,
                        error = %e,
                        "username lookup failed, keeping account without a handle"
                    );
                    LinkedAccount {
                        id: account.id,
                        name: account.name,
                        username: None,
                    }
                }
            }
        })
        .buffered(MAX_CONCURRENT_LOOKUPS)
        .collect()
        .await;

    Ok(destinations)
}
