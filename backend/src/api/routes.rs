//! Route table: which path runs which operation.
//!
//! The HTTP router is generated from this table, so adding a route here
//! is all it takes to expose an operation.

use crate::error::{ServerError, ServerResult};
use crate::operations::Operation;

/// Health check path.
pub const HEALTH_PATH: &str = "/health";

/// SSE log stream path.
pub const LOGS_PATH: &str = "/logs";

/// Paths served by the router itself; operations cannot take them.
pub const RESERVED_PATHS: [&str; 2] = [HEALTH_PATH, LOGS_PATH];

/// Exact-match mapping from request path to operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<(String, Operation)>,
}

impl RouteTable {
    /// An empty table; every path is a 404.
    pub fn empty() -> Self {
        Self { routes: Vec::new() }
    }

    /// `/echo`, `/invert`, `/flatten`, `/sum` and `/multiply`.
    pub fn standard() -> Self {
        Self {
            routes: Operation::ALL
                .iter()
                .map(|op| (op.path().to_string(), *op))
                .collect(),
        }
    }

    /// Add (or replace) the operation served on `path`.
    ///
    /// The path must be a literal absolute path: it starts with `/`, has no
    /// `{capture}`, `:param` or `*wildcard` segments, and is not one of
    /// [`RESERVED_PATHS`].
    pub fn with_route(mut self, path: impl Into<String>, op: Operation) -> ServerResult<Self> {
        let path = path.into();
        check_path(&path)?;

        match self.routes.iter_mut().find(|(p, _)| *p == path) {
            Some(entry) => entry.1 = op,
            None => self.routes.push((path, op)),
        }
        Ok(self)
    }

    /// Operation for an exact path, if any.
    pub fn lookup(&self, path: &str) -> Option<Operation> {
        self.routes
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, op)| *op)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Operation)> {
        self.routes.iter().map(|(p, op)| (p.as_str(), *op))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn check_path(path: &str) -> ServerResult<()> {
    let invalid = |reason: &str| Err(ServerError::Config(format!("route '{}' {}", path, reason)));

    if !path.starts_with('/') {
        return invalid("must start with '/'");
    }
    if RESERVED_PATHS.contains(&path) {
        return invalid("is reserved");
    }
    if path.contains(['{', '}'])
        || path
            .split('/')
            .any(|segment| segment.starts_with(':') || segment.starts_with('*'))
    {
        return invalid("must be a literal path");
    }

    Ok(())
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}
