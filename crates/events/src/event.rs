use chrono::{DateTime, Utc};

/// A change-notification event.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - **after-the-fact** (published only once the underlying write succeeded)
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "catalog.product.added").
    fn event_type(&self) -> &'static str;

    /// When the change occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
