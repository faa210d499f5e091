//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes (web, rpc, root catch-all)
//! - Resolve a request path to a route, a redirect or not-found
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Longest pattern wins
//! - Unclean paths are redirected before matching so a path can never reach
//!   the web route while naming the RPC endpoint

use super::matcher::{clean_path, PathMatcher};
use crate::config::RoutesConfig;

/// What the dispatcher should do with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Forward untouched.
    Web,
    /// Validate the RPC envelope, then forward.
    Rpc,
    /// Forward the bare root path.
    Root,
}

impl RouteKind {
    /// Label used in logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Rpc => "rpc",
            Self::Root => "root",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Route(RouteKind),
    /// Answer with a permanent redirect to this path.
    Redirect(String),
    NotFound,
}

#[derive(Debug)]
struct Route {
    matcher: PathMatcher,
    kind: RouteKind,
}

impl Route {
    fn new(pattern: &str, kind: RouteKind) -> Self {
        Self {
            matcher: PathMatcher::new(pattern),
            kind,
        }
    }
}

/// Compiled route table.
#[derive(Debug)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn from_config(config: &RoutesConfig) -> Self {
        let mut routes = vec![
            Route::new(&config.web_path, RouteKind::Web),
            Route::new(&config.rpc_path, RouteKind::Rpc),
            Route::new("/", RouteKind::Root),
        ];
        routes.sort_by_key(|r| std::cmp::Reverse(r.matcher.pattern().len()));

        Self { routes }
    }

    pub fn resolve(&self, path: &str) -> Resolution {
        let cleaned = clean_path(path);
        if cleaned != path {
            return Resolution::Redirect(cleaned.into_owned());
        }

        if let Some(route) = self.routes.iter().find(|r| r.matcher.is_missing_slash(path)) {
            let served = self
                .routes
                .iter()
                .any(|r| r.kind != RouteKind::Root && r.matcher.matches(path));
            if !served {
                return Resolution::Redirect(route.matcher.pattern().to_string());
            }
        }

        match self.routes.iter().find(|r| r.matcher.matches(path)) {
            Some(Route { kind: RouteKind::Root, .. }) if path != "/" => Resolution::NotFound,
            Some(route) => Resolution::Route(route.kind),
            None => Resolution::NotFound,
        }
    }
}
