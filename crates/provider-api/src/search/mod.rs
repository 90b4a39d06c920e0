use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Data only the originating provider knows how to interpret.
pub type Payload = Arc<dyn Any + Send + Sync>;

/// A single answer produced by a [`SearchSource`](crate::SearchSource).
///
/// Results are transient: they live for one query round and are only ever
/// handed back to the provider that produced them.
#[derive(Clone)]
pub struct SearchResult {
    title: String,
    description: String,
    source_name: String,
    payload: Payload,
}

impl SearchResult {
    /// Create a result without a payload.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        source_name: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            source_name: source_name.into(),
            payload: Arc::new(()),
        }
    }

    /// Attach provider-private data to the result.
    #[must_use]
    pub fn with_payload<T>(mut self, payload: T) -> Self
    where
        T: Any + Send + Sync,
    {
        self.payload = Arc::new(payload);
        self
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Display name of the provider that produced the result.
    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Borrow the payload as `T` when it has that type.
    #[must_use]
    pub fn payload_as<T>(&self) -> Option<&T>
    where
        T: Any,
    {
        self.payload.downcast_ref::<T>()
    }
}

impl fmt::Debug for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchResult")
            .field("title", &self.title)
            .field("description", &self.description)
            .field("source_name", &self.source_name)
            .finish_non_exhaustive()
    }
}
