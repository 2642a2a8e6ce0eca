//! Declarative route guard table.
//!
//! Every protected page of the portal is described by exactly one
//! [`RouteRule`]. A single function, [`GuardTable::evaluate`], decides for a
//! request path and the (optional) role of the signed-in user whether the
//! page renders or the browser is redirected.
//!
//! # Patterns
//!
//! Patterns are `/`-separated segments:
//!
//! - `orders` - literal segment
//! - `:uuid` - exactly one segment of any value
//! - `*` - trailing only, any number of remaining segments (including none)
//!
//! When several rules match, the most specific wins: more literal segments
//! first, then a rule without a trailing `*`.
//!
//! # Evaluation order
//!
//! 1. No rule matches: [`GuardDecision::Public`]
//! 2. No session: redirect to [`LOGIN_PATH`]
//! 3. Role outside the rule's set: redirect to the rule's fallback
//! 4. Otherwise: [`GuardDecision::Authorized`]

use std::collections::{BTreeSet, HashSet};

use thiserror::Error;

use crate::types::Role;

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";

/// Errors raised while building a [`GuardTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardTableError {
    #[error("route pattern must start with '/': {0}")]
    RelativePattern(String),
    #[error("'*' is only allowed as the last segment: {0}")]
    MisplacedWildcard(String),
    #[error("route pattern {0} has no permitted roles")]
    NoRoles(String),
    #[error("redirect target must be an absolute path: {0}")]
    InvalidRedirect(String),
    #[error("duplicate rule for route pattern {0}")]
    DuplicateRule(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param,
    Rest,
}

/// Access rule for one route pattern.
#[derive(Debug, Clone)]
pub struct RouteRule {
    pattern: String,
    segments: Vec<Segment>,
    required_roles: BTreeSet<Role>,
    unauthorized_redirect: String,
}

impl RouteRule {
    /// Build a rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not absolute, uses `*` anywhere but
    /// the last segment, lists no roles, or the redirect is not an absolute
    /// path.
    pub fn new(
        pattern: &str,
        roles: &[Role],
        unauthorized_redirect: &str,
    ) -> Result<Self, GuardTableError> {
        if !pattern.starts_with('/') {
            return Err(GuardTableError::RelativePattern(pattern.to_string()));
        }
        if roles.is_empty() {
            return Err(GuardTableError::NoRoles(pattern.to_string()));
        }
        if !unauthorized_redirect.starts_with('/') {
            return Err(GuardTableError::InvalidRedirect(
                unauthorized_redirect.to_string(),
            ));
        }

        let raw: Vec<&str> = split_path(pattern).collect();
        let last = raw.len().saturating_sub(1);
        let mut segments = Vec::with_capacity(raw.len());
        for (idx, part) in raw.into_iter().enumerate() {
            let segment = match part {
                "*" if idx == last => Segment::Rest,
                "*" => return Err(GuardTableError::MisplacedWildcard(pattern.to_string())),
                p if p.starts_with(':') => Segment::Param,
                p => Segment::Literal(p.to_string()),
            };
            segments.push(segment);
        }

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
            required_roles: roles.iter().copied().collect(),
            unauthorized_redirect: unauthorized_redirect.to_string(),
        })
    }

    /// The pattern as written.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Roles allowed to see the page.
    pub fn required_roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.required_roles.iter().copied()
    }

    /// Redirect target for authenticated users with another role.
    #[must_use]
    pub fn unauthorized_redirect(&self) -> &str {
        &self.unauthorized_redirect
    }

    /// Whether `role` may see pages matched by this rule.
    #[must_use]
    pub fn permits(&self, role: Role) -> bool {
        self.required_roles.contains(&role)
    }

    fn matches(&self, path: &[&str]) -> bool {
        let mut idx = 0;
        for segment in &self.segments {
            match segment {
                Segment::Rest => return true,
                Segment::Param => {
                    if path.get(idx).is_none() {
                        return false;
                    }
                }
                Segment::Literal(literal) => {
                    if path.get(idx) != Some(&literal.as_str()) {
                        return false;
                    }
                }
            }
            idx += 1;
        }
        idx == path.len()
    }

    fn specificity(&self) -> (usize, bool) {
        let literals = self
            .segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count();
        let exact = !matches!(self.segments.last(), Some(Segment::Rest));
        (literals, exact)
    }

    /// Pattern with parameter names erased, used to detect duplicates.
    fn shape(&self) -> String {
        let mut shape = String::new();
        for segment in &self.segments {
            shape.push('/');
            match segment {
                Segment::Literal(l) => shape.push_str(l),
                Segment::Param => shape.push(':'),
                Segment::Rest => shape.push('*'),
            }
        }
        shape
    }
}

/// Why a request was redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// No session.
    Unauthenticated,
    /// Session present, role not permitted.
    Unauthorized,
}

/// Outcome of evaluating a request against the guard table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// No rule covers the path.
    Public,
    /// A rule covers the path and the role is permitted.
    Authorized,
    /// The visitor must go elsewhere.
    Redirect {
        to: String,
        reason: RedirectReason,
    },
}

impl GuardDecision {
    /// Whether the page may render.
    #[must_use]
    pub const fn renders(&self) -> bool {
        matches!(self, Self::Public | Self::Authorized)
    }

    /// Redirect target, if any.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Redirect { to, .. } => Some(to),
            _ => None,
        }
    }
}

/// The full set of route rules.
#[derive(Debug, Clone)]
pub struct GuardTable {
    rules: Vec<RouteRule>,
}

impl GuardTable {
    /// Build a table from rules.
    ///
    /// # Errors
    ///
    /// Returns [`GuardTableError::DuplicateRule`] if two rules describe the
    /// same pattern (parameter names are ignored).
    pub fn new(rules: Vec<RouteRule>) -> Result<Self, GuardTableError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.shape()) {
                return Err(GuardTableError::DuplicateRule(rule.pattern.clone()));
            }
        }
        Ok(Self { rules })
    }

    /// The portal's route table.
    ///
    /// Role mismatches go to `/` for most pages and to a feature landing page
    /// for the sub-pages of a shared area.
    ///
    /// # Errors
    ///
    /// Only fails if the table below is edited into an invalid state.
    pub fn portal() -> Result<Self, GuardTableError> {
        use Role::{Admin, Customer, Driver, OutletAdmin, Worker};

        Self::new(vec![
            RouteRule::new("/admin/dashboard", &[Admin, OutletAdmin], "/")?,
            RouteRule::new("/admin/items/*", &[Admin], "/")?,
            RouteRule::new("/admin/outlets/*", &[Admin], "/")?,
            RouteRule::new("/admin/users/*", &[Admin], "/")?,
            RouteRule::new("/admin/orders/*", &[Admin, OutletAdmin], "/")?,
            RouteRule::new("/admin/reports/sales", &[Admin, OutletAdmin], "/")?,
            RouteRule::new("/admin/attendance", &[Admin, OutletAdmin], "/")?,
            RouteRule::new("/admin/bypass-requests/*", &[OutletAdmin], "/admin/dashboard")?,
            RouteRule::new("/employee/orders", &[Worker, Driver], "/")?,
            RouteRule::new("/employee/orders/station/*", &[Worker], "/employee/orders")?,
            RouteRule::new("/employee/orders/pickup/*", &[Driver], "/employee/orders")?,
            RouteRule::new("/employee/orders/delivery/*", &[Driver], "/employee/orders")?,
            RouteRule::new("/employee/attendance/*", &[Worker, Driver], "/")?,
            RouteRule::new("/employee/bypass-requests/*", &[Worker], "/employee/orders")?,
            RouteRule::new("/user/profile/*", &[Customer], "/")?,
            RouteRule::new("/user/addresses/*", &[Customer], "/")?,
            RouteRule::new("/user/orders/*", &[Customer], "/")?,
        ])
    }

    /// All rules, in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// The most specific rule covering `path`, if any.
    ///
    /// Query strings are ignored, as are empty segments and trailing slashes.
    #[must_use]
    pub fn rule_for(&self, path: &str) -> Option<&RouteRule> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = split_path(path).collect();
        self.rules
            .iter()
            .filter(|rule| rule.matches(&segments))
            .max_by_key(|rule| rule.specificity())
    }

    /// Decide whether `path` renders for a visitor with `role`.
    ///
    /// `role` is `None` when there is no session.
    #[must_use]
    pub fn evaluate(&self, path: &str, role: Option<Role>) -> GuardDecision {
        let Some(rule) = self.rule_for(path) else {
            return GuardDecision::Public;
        };
        let Some(role) = role else {
            return GuardDecision::Redirect {
                to: LOGIN_PATH.to_string(),
                reason: RedirectReason::Unauthenticated,
            };
        };
        if rule.permits(role) {
            GuardDecision::Authorized
        } else {
            GuardDecision::Redirect {
                to: rule.unauthorized_redirect.clone(),
                reason: RedirectReason::Unauthorized,
            }
        }
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> GuardTable {
        GuardTable::portal().unwrap()
    }

    fn redirect(to: &str, reason: RedirectReason) -> GuardDecision {
        GuardDecision::Redirect {
            to: to.to_string(),
            reason,
        }
    }

    #[test]
    fn test_admin_items_scenarios() {
        let t = table();
        assert_eq!(
            t.evaluate("/admin/items", Some(Role::Admin)),
            GuardDecision::Authorized
        );
        assert_eq!(
            t.evaluate("/admin/items", Some(Role::OutletAdmin)),
            redirect("/", RedirectReason::Unauthorized)
        );
        assert_eq!(
            t.evaluate("/admin/items", None),
            redirect("/login", RedirectReason::Unauthenticated)
        );
    }

    #[test]
    fn test_worker_on_delivery_goes_to_feature_landing() {
        assert_eq!(
            table().evaluate("/employee/orders/delivery", Some(Role::Worker)),
            redirect("/employee/orders", RedirectReason::Unauthorized)
        );
    }

    #[test]
    fn test_shared_route_admits_both_roles() {
        let t = table();
        for role in [Role::Admin, Role::OutletAdmin] {
            assert_eq!(
                t.evaluate("/admin/dashboard", Some(role)),
                GuardDecision::Authorized
            );
        }
        for role in [Role::Worker, Role::Driver, Role::Customer] {
            assert!(!t.evaluate("/admin/dashboard", Some(role)).renders());
        }
    }

    #[test]
    fn test_every_rule_rejects_every_other_role() {
        let t = table();
        for rule in t.rules() {
            let path = rule.pattern().trim_end_matches("/*").to_string();
            for role in Role::ALL {
                let decision = t.evaluate(&path, Some(role));
                if rule.permits(role) {
                    assert_eq!(decision, GuardDecision::Authorized, "{path} {role}");
                } else {
                    assert_eq!(
                        decision,
                        redirect(rule.unauthorized_redirect(), RedirectReason::Unauthorized),
                        "{path} {role}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_missing_session_always_goes_to_login() {
        let t = table();
        for rule in t.rules() {
            let path = rule.pattern().replace('*', "anything");
            assert_eq!(
                t.evaluate(&path, None),
                redirect(LOGIN_PATH, RedirectReason::Unauthenticated),
                "{path}"
            );
        }
    }

    #[test]
    fn test_public_paths() {
        let t = table();
        for path in ["/", "/login", "/logout", "/health", "/static/app.css"] {
            assert_eq!(t.evaluate(path, None), GuardDecision::Public, "{path}");
        }
    }

    #[test]
    fn test_wildcard_covers_subpaths_and_root() {
        let t = table();
        assert_eq!(
            t.rule_for("/user/addresses").map(RouteRule::pattern),
            Some("/user/addresses/*")
        );
        assert_eq!(
            t.rule_for("/user/addresses/5/delete").map(RouteRule::pattern),
            Some("/user/addresses/*")
        );
    }

    #[test]
    fn test_most_specific_rule_wins() {
        let t = table();
        assert_eq!(
            t.rule_for("/employee/orders").map(RouteRule::pattern),
            Some("/employee/orders")
        );
        assert_eq!(
            t.rule_for("/employee/orders/pickup/3/complete")
                .map(RouteRule::pattern),
            Some("/employee/orders/pickup/*")
        );
        // Nothing covers unknown employee sub-pages.
        assert_eq!(t.evaluate("/employee/orders/unknown", None), GuardDecision::Public);
    }

    #[test]
    fn test_query_string_and_trailing_slash_ignored() {
        let t = table();
        assert_eq!(
            t.evaluate("/admin/items/?page=2", Some(Role::Admin)),
            GuardDecision::Authorized
        );
        assert_eq!(
            t.evaluate("/admin/dashboard/", Some(Role::Customer)),
            redirect("/", RedirectReason::Unauthorized)
        );
    }

    #[test]
    fn test_param_segments() {
        let rule = RouteRule::new("/orders/:uuid", &[Role::Customer], "/").unwrap();
        let t = GuardTable::new(vec![rule]).unwrap();
        assert_eq!(
            t.evaluate("/orders/abc", Some(Role::Customer)),
            GuardDecision::Authorized
        );
        assert_eq!(t.evaluate("/orders", Some(Role::Driver)), GuardDecision::Public);
        assert_eq!(t.evaluate("/orders/abc/x", None), GuardDecision::Public);
    }

    #[test]
    fn test_duplicate_patterns_rejected() {
        let a = RouteRule::new("/orders/:id", &[Role::Admin], "/").unwrap();
        let b = RouteRule::new("/orders/:uuid", &[Role::Driver], "/").unwrap();
        assert_eq!(
            GuardTable::new(vec![a, b]).unwrap_err(),
            GuardTableError::DuplicateRule("/orders/:uuid".to_string())
        );
    }

    #[test]
    fn test_invalid_rules() {
        assert!(matches!(
            RouteRule::new("admin", &[Role::Admin], "/"),
            Err(GuardTableError::RelativePattern(_))
        ));
        assert!(matches!(
            RouteRule::new("/a/*/b", &[Role::Admin], "/"),
            Err(GuardTableError::MisplacedWildcard(_))
        ));
        assert!(matches!(
            RouteRule::new("/a", &[], "/"),
            Err(GuardTableError::NoRoles(_))
        ));
        assert!(matches!(
            RouteRule::new("/a", &[Role::Admin], "home"),
            Err(GuardTableError::InvalidRedirect(_))
        ));
    }
}
