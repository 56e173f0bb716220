//! Category allow-list / prefix policy shared by both portal clients.

use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {
    allow_list: HashSet<String>,
    prefix: Option<String>,
}

impl CategoryFilter {
    /// An empty prefix is treated as "no prefix" so it cannot match everything.
    pub fn new<I, S>(allow_list: I, prefix: Option<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allow_list: allow_list.into_iter().map(Into::into).collect(),
            prefix: prefix.filter(|p| !p.is_empty()),
        }
    }

    /// Case-sensitive: exact allow-list hit or prefix match
    pub fn keep(&self, category_name: &str) -> bool {
        self.allow_list.contains(category_name)
            || self
                .prefix
                .as_deref()
                .is_some_and(|p| category_name.starts_with(p))
    }
}
