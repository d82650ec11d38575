//! Well-known console paths and path normalization.

#[cfg(test)]
#[path = "paths_test.rs"]
mod paths_test;

pub const HOME: &str = "/";
pub const DASHBOARD: &str = "/dashboard";
pub const STUDENT_DASHBOARD: &str = "/student-dashboard";
pub const LOGIN: &str = "/login";
pub const REGISTER: &str = "/register";

/// Paths reachable without a session.
pub const PUBLIC_PATHS: [&str; 2] = [LOGIN, REGISTER];

/// Strip query string, fragment and trailing slash (the root stays `/`).
pub fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() { HOME } else { trimmed }
}

pub fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&normalize(path))
}

/// `/` redirects to the dashboard, so both count as home.
pub fn is_home(path: &str) -> bool {
    matches!(normalize(path), HOME | DASHBOARD)
}
