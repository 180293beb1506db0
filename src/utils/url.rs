//! URL utilities for consistent URL handling
//!
//! This module provides utilities for normalizing URLs to prevent issues
//! with trailing slashes when constructing API endpoints.

/// Normalize a base URL by removing trailing slashes
///
/// This ensures consistent URL construction when appending endpoints,
/// preventing double slashes in the final URLs.
///
/// # Examples
///
/// ```
/// use askemall::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:7860"), "http://localhost:7860");
/// assert_eq!(normalize_base_url("http://localhost:7860/"), "http://localhost:7860");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Construct a complete API endpoint URL from a base URL and endpoint path
///
/// This function normalizes the base URL and safely appends the endpoint,
/// ensuring there are no double slashes in the result.
///
/// # Examples
///
/// ```
/// use askemall::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:7860", "api/chat"),
///     "http://localhost:7860/api/chat"
/// );
/// assert_eq!(
///     construct_api_url("http://localhost:7860/", "/api/chat"),
///     "http://localhost:7860/api/chat"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}
