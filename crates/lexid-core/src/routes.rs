//! Navigation guard for authenticated-only screens.
//!
//! A pure decision: given the current authentication state and the
//! requested location, either render it or bounce to the login screen while
//! remembering where the citizen was headed.

/// Outcome of gating a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the requested location.
    Allow,
    /// Send the visitor to the login screen, remembering the original
    /// destination so login can return them there.
    RedirectToLogin { return_to: String },
}

/// Gates navigation to a protected location.
pub fn guard(is_authenticated: bool, requested: &str) -> RouteDecision {
    if is_authenticated {
        RouteDecision::Allow
    } else {
        RouteDecision::RedirectToLogin {
            return_to: requested.to_string(),
        }
    }
}

/// Where the login screen sends the citizen after authenticating: the
/// recorded return location if one exists, the fallback landing otherwise.
pub fn post_login_destination<'a>(return_to: Option<&'a str>, fallback: &'a str) -> &'a str {
    return_to
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: unauthenticated access redirects and records the destination.
    #[test]
    fn test_guard_redirects_unauthenticated() {
        let decision = guard(false, "/profile");
        assert_eq!(
            decision,
            RouteDecision::RedirectToLogin {
                return_to: "/profile".to_string()
            }
        );
    }

    /// Test: authenticated access renders.
    #[test]
    fn test_guard_allows_authenticated() {
        assert_eq!(guard(true, "/profile"), RouteDecision::Allow);
    }

    /// Test: login returns to the recorded location, or the fallback.
    #[test]
    fn test_post_login_destination() {
        assert_eq!(post_login_destination(Some("/profile"), "/home"), "/profile");
        assert_eq!(post_login_destination(Some("  "), "/home"), "/home");
        assert_eq!(post_login_destination(None, "/home"), "/home");
    }
}
