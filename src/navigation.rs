//! Views of the application and the guard in front of them

use std::fmt;
use std::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Dashboard,
    Bikes,
    BikeDetail { bike_id: i64 },
    Maintenance,
    Ai,
    AiHistory,
    Profile,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Bikes => "/bikes".to_string(),
            Route::BikeDetail { bike_id } => format!("/bikes/{}", bike_id),
            Route::Maintenance => "/maintenance".to_string(),
            Route::Ai => "/ai".to_string(),
            Route::AiHistory => "/ai/history".to_string(),
            Route::Profile => "/profile".to_string(),
        }
    }

    /// Parse a path; `None` for anything outside the route table
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(Route::Home),
            ["login"] => Some(Route::Login),
            ["dashboard"] => Some(Route::Dashboard),
            ["bikes"] => Some(Route::Bikes),
            ["bikes", id] => id.parse().ok().map(|bike_id| Route::BikeDetail { bike_id }),
            ["maintenance"] => Some(Route::Maintenance),
            ["ai"] => Some(Route::Ai),
            ["ai", "history"] => Some(Route::AiHistory),
            ["profile"] => Some(Route::Profile),
            _ => None,
        }
    }

    /// Everything except the login page and the root redirect needs a session
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Home | Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Where a requested path actually lands
///
/// Root and unknown paths go to the dashboard; protected views go to login
/// when there is no session.
pub fn resolve(path: &str, authenticated: bool) -> Route {
    let route = match Route::from_path(path) {
        Some(Route::Home) | None => Route::Dashboard,
        Some(route) => route,
    };

    if route.is_protected() && !authenticated {
        Route::Login
    } else {
        route
    }
}

/// Tracks the current view
#[derive(Debug)]
pub struct Navigator {
    current: RwLock<Route>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }

    pub fn current(&self) -> Route {
        *self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn navigate(&self, route: Route) {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        if *current != route {
            tracing::debug!("Navigating {} -> {}", *current, route);
            *current = route;
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_parse_back() {
        for route in [
            Route::Login,
            Route::Dashboard,
            Route::Bikes,
            Route::BikeDetail { bike_id: 12 },
            Route::Maintenance,
            Route::Ai,
            Route::AiHistory,
            Route::Profile,
        ] {
            assert_eq!(Route::from_path(&route.path()), Some(route));
        }
    }

    #[test]
    fn test_resolve_redirects() {
        assert_eq!(resolve("/", true), Route::Dashboard);
        assert_eq!(resolve("/settings", true), Route::Dashboard);
        assert_eq!(resolve("/bikes/abc", true), Route::Dashboard);
        assert_eq!(resolve("/bikes", false), Route::Login);
        assert_eq!(resolve("/", false), Route::Login);
        assert_eq!(resolve("/login", false), Route::Login);
        assert_eq!(resolve("/ai/history", true), Route::AiHistory);
    }

    #[test]
    fn test_navigator() {
        let navigator = Navigator::default();
        assert_eq!(navigator.current(), Route::Home);
        navigator.navigate(Route::Login);
        assert_eq!(navigator.current(), Route::Login);
    }
}
