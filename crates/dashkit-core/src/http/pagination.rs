//! Link-header pagination
//!
//! Multi-page results advertise the next page in an RFC 5988 `Link` header:
//!
//! ```text
//! Link: <https://n1.meraki.com/api/v1/orgs?startingAfter=9>; rel=next, <...>; rel=last
//! ```
//!
//! The continuation URL is reduced to a path relative to the API base and
//! requested again with the same verb, headers and body. Array bodies are
//! appended page after page by [`PageCollector`].

use std::sync::OnceLock;

use regex::Regex;
use reqwest::header::{HeaderMap, LINK};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::http::result::ApiResult;

/// One entry of a `Link` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    pub rel: Option<String>,
}

impl Link {
    /// `rel` may list several space-separated relation types
    pub fn has_rel(&self, relation: &str) -> bool {
        self.rel
            .as_deref()
            .map(|rel| rel.split_whitespace().any(|r| r.eq_ignore_ascii_case(relation)))
            .unwrap_or(false)
    }
}

static ENTRY_SEPARATOR: OnceLock<Regex> = OnceLock::new();

const QUOTES: &[char] = &[' ', '\'', '"'];

/// Parse a `Link` header value into its entries
pub fn parse_link_header(value: &str) -> Vec<Link> {
    let separator = ENTRY_SEPARATOR.get_or_init(|| Regex::new(r",\s*<").expect("Valid regex pattern"));

    let value = value.trim_matches(QUOTES);
    if value.is_empty() {
        return Vec::new();
    }

    separator
        .split(value)
        .filter_map(|entry| {
            let (target, params) = entry.split_once(';').unwrap_or((entry, ""));
            let url = target.trim_matches(|c: char| matches!(c, '<' | '>' | ' ' | '\'' | '"'));
            if url.is_empty() {
                return None;
            }

            let rel = params.split(';').find_map(|param| {
                let (key, value) = param.split_once('=')?;
                key.trim_matches(QUOTES)
                    .eq_ignore_ascii_case("rel")
                    .then(|| value.trim_matches(QUOTES).to_string())
            });

            Some(Link {
                url: url.to_string(),
                rel,
            })
        })
        .collect()
}

/// The first `rel="next"` target across all `Link` headers
pub fn next_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(parse_link_header)
        .find(|link| link.has_rel("next"))
        .map(|link| link.url)
}

/// Rewrite a continuation URL as a path relative to `base_url`.
///
/// Only the base URL's path prefix is stripped, so links pointing at a
/// different shard host of the same API still resolve. Relative links are
/// joined against the base first. Returns `None` when the link is outside
/// the API's path prefix.
pub fn continuation_path(link: &str, base_url: &Url) -> Option<String> {
    let absolute = match Url::parse(link) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => base_url.join(link).ok()?,
        Err(_) => return None,
    };

    let prefix = base_url.path().trim_end_matches('/');
    let path = absolute.path();
    let relative = if prefix.is_empty() {
        path
    } else {
        let rest = path.strip_prefix(prefix)?;
        if !(rest.is_empty() || rest.starts_with('/')) {
            return None;
        }
        rest
    };

    Some(match absolute.query() {
        Some(query) => format!("{}?{}", relative, query),
        None => relative.to_string(),
    })
}

/// What to return when a continuation page fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationPolicy {
    /// Drop every page fetched so far; the body is absent
    #[default]
    DiscardOnFailure,
    /// Return the pages fetched so far, still with `success == false`
    KeepPartial,
}

/// Accumulates page bodies in order.
///
/// Appending stops for good at the first page whose body is absent or when a
/// body is not an array; later pages are still fetched, but they no longer
/// contribute.
#[derive(Debug)]
pub struct PageCollector {
    policy: PaginationPolicy,
    body: Option<Value>,
    open: bool,
    pages: usize,
}

impl PageCollector {
    pub fn new(policy: PaginationPolicy) -> Self {
        Self {
            policy,
            body: None,
            open: false,
            pages: 0,
        }
    }

    /// Number of successful pages absorbed
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Absorb the body of a successful page
    pub fn push(&mut self, body: Option<Value>) {
        self.pages += 1;

        if self.pages == 1 {
            self.open = body.is_some();
            self.body = body;
            return;
        }
        if !self.open {
            return;
        }

        match (self.body.as_mut(), body) {
            (Some(Value::Array(merged)), Some(Value::Array(next))) => merged.extend(next),
            _ => self.open = false,
        }
    }

    /// The chain ended normally; status and errors come from the last page
    pub fn finish(self, last: ApiResult) -> ApiResult {
        ApiResult {
            success: last.success,
            errors: last.errors,
            body: self.body,
        }
    }

    /// A continuation failed; `errors` are the failed page's
    pub fn fail(self, errors: Option<Value>) -> ApiResult {
        let body = match self.policy {
            PaginationPolicy::DiscardOnFailure => None,
            PaginationPolicy::KeepPartial => self.body,
        };
        ApiResult {
            success: false,
            errors,
            body,
        }
    }
}
