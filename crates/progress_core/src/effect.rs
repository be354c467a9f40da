use crate::DetailKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show a transient notification (one per failure streak).
    Notify { title: String, message: String },
    /// Fetch the collection now instead of waiting for the next tick.
    RefreshList,
    /// Fetch the detail record now instead of waiting for the next tick.
    RefreshDetail,
    /// Navigate to the detail view of a record.
    OpenDetail(DetailKey),
    /// (Re)start the detail poll loop for a new identity.
    WatchDetail { generation: u64, key: DetailKey },
    /// Leave the detail view and stop its poll loop.
    CloseDetail,
}
