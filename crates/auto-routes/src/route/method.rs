//! HTTP method allow-list

use axum::routing::MethodFilter;
use std::fmt;
use std::str::FromStr;

/// Methods a discovered route may be registered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Options,
    Patch,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Head,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Patch => "PATCH",
        }
    }

    pub(crate) fn filter(&self) -> MethodFilter {
        match self {
            HttpMethod::Get => MethodFilter::GET,
            HttpMethod::Head => MethodFilter::HEAD,
            HttpMethod::Post => MethodFilter::POST,
            HttpMethod::Put => MethodFilter::PUT,
            HttpMethod::Delete => MethodFilter::DELETE,
            HttpMethod::Options => MethodFilter::OPTIONS,
            HttpMethod::Patch => MethodFilter::PATCH,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ();

    /// Case-insensitive parse against the allow-list
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        HttpMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == upper)
            .ok_or(())
    }
}

/// Normalize a declared method, falling back to GET
///
/// Anything outside the allow-list (including a missing method) becomes
/// [`HttpMethod::Get`]. With `verbose` set the rejected value is logged.
///
/// # Examples
///
/// ```
/// use auto_routes::route::{fix_route_method, HttpMethod};
///
/// assert_eq!(fix_route_method(Some("patch"), false), HttpMethod::Patch);
/// assert_eq!(fix_route_method(Some("TRACE"), false), HttpMethod::Get);
/// assert_eq!(fix_route_method(None, false), HttpMethod::Get);
/// ```
pub fn fix_route_method(method: Option<&str>, verbose: bool) -> HttpMethod {
    match method.map(str::parse::<HttpMethod>) {
        Some(Ok(method)) => method,
        _ => {
            if verbose {
                tracing::warn!(method = ?method, "invalid method, defaulting to GET");
            }
            HttpMethod::Get
        }
    }
}
