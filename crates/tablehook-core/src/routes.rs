//! Static table-to-destination routing.
//!
//! The route table is built once at process start from configuration and
//! shared read-only across requests. Tables without a configured URL simply
//! have no entry; that is an expected state, not an error.

use std::collections::HashMap;

/// Tables the deployment knows how to route, with the environment variable
/// that carries each destination URL.
pub const ROUTED_TABLES: [(&str, &str); 2] =
    [("recruits", "RECRUITS_WEBHOOK_URL"), ("portal", "PORTAL_WEBHOOK_URL")];

/// Immutable mapping from table name to destination URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: HashMap<String, String>,
}

impl RouteTable {
    /// Creates an empty route table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of this table with `table` routed to `url`.
    ///
    /// Blank URLs are treated as unset and leave the table unchanged.
    #[must_use]
    pub fn with_route(mut self, table: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        let url = url.trim();
        if !url.is_empty() {
            self.routes.insert(table.into(), url.to_string());
        }
        self
    }

    /// Resolves the destination URL for `table`.
    pub fn resolve(&self, table: &str) -> Option<&str> {
        self.routes.get(table).map(String::as_str)
    }

    /// Number of tables with a configured destination.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no table has a destination.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterates over `(table, url)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.routes.iter().map(|(table, url)| (table.as_str(), url.as_str()))
    }
}

impl<T, U> FromIterator<(T, Option<U>)> for RouteTable
where
    T: Into<String>,
    U: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (T, Option<U>)>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |routes, (table, url)| match url {
            Some(url) => routes.with_route(table, url),
            None => routes,
        })
    }
}
