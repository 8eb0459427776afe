// ============================
// crates/backend-lib/src/gate/rules.rs
// ============================
//! Ordered route access rules, evaluated first-match-wins.
//!
//! Pattern syntax:
//! * `/**` as the last segment matches the prefix itself and anything below it
//! * `**` elsewhere matches zero or more whole segments
//! * `*` matches any run of characters inside one segment
//! * `?` matches one character inside one segment
use crate::config::SecuritySettings;
use regapp_common::{Access, RouteRule};
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("route pattern {0:?} must start with '/'")]
    NotAbsolute(String),

    #[error("route pattern {0:?} uses '**' inside a segment")]
    MisplacedWildcard(String),

    #[error("route pattern {pattern:?} failed to compile: {reason}")]
    Compile { pattern: String, reason: String },
}

/// A compiled path glob
#[derive(Debug, Clone)]
pub struct RoutePattern {
    regex: Regex,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let Some(rest) = pattern.strip_prefix('/') else {
            return Err(PatternError::NotAbsolute(pattern.to_string()));
        };

        let segments: Vec<&str> = rest.split('/').collect();
        let last = segments.len() - 1;
        let mut re = String::from("^");

        for (i, segment) in segments.iter().enumerate() {
            if *segment == "**" {
                if i == last {
                    re.push_str("(?:/.*)?");
                } else {
                    re.push_str("(?:/[^/]+)*");
                }
                continue;
            }
            if segment.contains("**") {
                return Err(PatternError::MisplacedWildcard(pattern.to_string()));
            }

            re.push('/');
            for ch in segment.chars() {
                match ch {
                    '*' => re.push_str("[^/]*"),
                    '?' => re.push_str("[^/]"),
                    c => re.push_str(&regex::escape(c.encode_utf8(&mut [0u8; 4]))),
                }
            }
        }
        re.push('$');

        let regex = Regex::new(&re).map_err(|e| PatternError::Compile {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { regex })
    }

    /// Match a request path (no query string)
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// The gate's route policy
#[derive(Debug, Clone)]
pub struct RouteRules {
    rules: Vec<(RoutePattern, Access)>,
    default_access: Access,
}

impl RouteRules {
    pub fn new(rules: &[RouteRule], default_access: Access) -> Result<Self, PatternError> {
        let rules = rules
            .iter()
            .map(|rule| Ok((RoutePattern::parse(&rule.pattern)?, rule.access)))
            .collect::<Result<Vec<_>, PatternError>>()?;
        Ok(Self {
            rules,
            default_access,
        })
    }

    /// Build the policy from settings. The login and logout routes are
    /// always reachable, ahead of any configured rule.
    pub fn from_settings(security: &SecuritySettings) -> Result<Self, PatternError> {
        let mut rules = vec![
            RouteRule::permit_all(security.login_path.as_str()),
            RouteRule::permit_all(security.logout_path.as_str()),
        ];
        rules.extend(security.routes.iter().cloned());
        Self::new(&rules, security.default_access)
    }

    /// Requirement for `path`: the first matching rule, else the default
    pub fn access_for(&self, path: &str) -> Access {
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.matches(path))
            .map_or(self.default_access, |(_, access)| *access)
    }

    pub fn requires_authentication(&self, path: &str) -> bool {
        self.access_for(path) == Access::Authenticated
    }
}
