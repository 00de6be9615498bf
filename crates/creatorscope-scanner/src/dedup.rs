use std::collections::HashSet;

/// Profile URLs already accepted under the ugc category.
///
/// Filled once the ugc category completes; consulted while filtering
/// video editor candidates so a creator is exported under one category only.
#[derive(Debug, Clone, Default)]
pub struct DeduplicationTracker {
    seen: HashSet<String>,
}

impl DeduplicationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one URL. Returns `false` if it was already present.
    pub fn insert(&mut self, url: impl Into<String>) -> bool {
        self.seen.insert(url.into())
    }

    pub fn extend<I, S>(&mut self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seen.extend(urls.into_iter().map(Into::into));
    }

    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
