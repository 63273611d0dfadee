use serde::Deserialize;

/// `GET /{v}/me/accounts` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct AccountsResponse {
    pub data: Vec<PageEntry>,
}

/// One Facebook Page from the accounts listing. Pages without a linked
/// Instagram Business Account are filtered out by the client.
#[derive(Debug, Deserialize)]
pub(crate) struct PageEntry {
    pub name: String,
    pub instagram_business_account: Option<IgAccountRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IgAccountRef {
    pub id: String,
}

/// A Facebook Page's linked Instagram Business Account, as returned by
/// [`GraphClient::list_accounts`](crate::GraphClient::list_accounts).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessAccount {
    /// Instagram Business Account id (the publish destination).
    pub id: String,
    /// Display name of the owning Facebook Page.
    pub name: String,
}

/// Last-observed state of a media container's provider-side ingestion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStatusCode {
    /// `status_code: FINISHED` — ready to publish.
    Finished,
    /// The provider reported an error payload or `status_code: ERROR`.
    Error,
    /// Any other status code; keep polling.
    InProgress,
}

/// One status-check observation.
#[derive(Debug, Clone)]
pub struct ContainerStatus {
    pub code: ContainerStatusCode,
    pub error_message: Option<String>,
}
