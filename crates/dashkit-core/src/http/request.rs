//! Logical API requests
//!
//! An [`ApiRequest`] describes one call against the dashboard API: verb,
//! resource path, extra headers, query parameters and an optional JSON body.
//! It is immutable once built; continuation pages derive a new request from
//! it instead of mutating it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::form_urlencoded;

use crate::{Error, Result};

/// HTTP verbs understood by the dashboard API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    /// Only POST and PUT transmit a request body
    pub fn carries_body(self) -> bool {
        matches!(self, Verb::Post | Verb::Put)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }

    pub fn to_method(self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(Verb::Get),
            "POST" => Ok(Verb::Post),
            "PUT" => Ok(Verb::Put),
            "DELETE" => Ok(Verb::Delete),
            _ => Err(Error::Unsupported {
                message: format!("Unsupported HTTP verb: {}", s),
                feature: Some("verb".to_string()),
            }),
        }
    }
}

/// A query parameter value; `Many` is encoded as a repeated key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::One(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::One(value)
    }
}

impl<T: Into<String>> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        QueryValue::Many(values.into_iter().map(Into::into).collect())
    }
}

/// One logical call against the API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    verb: Verb,
    path: String,
    headers: BTreeMap<String, String>,
    query: BTreeMap<String, QueryValue>,
    body: Option<Value>,
}

impl ApiRequest {
    /// Create a request for `path`, relative to the client's base URL
    pub fn new(verb: Verb, path: impl Into<String>) -> Self {
        Self {
            verb,
            path: path.into(),
            headers: BTreeMap::new(),
            query: BTreeMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Verb::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Verb::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Verb::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Verb::Delete, path)
    }

    /// Add a header sent after the `Authorization` header.
    ///
    /// A caller header with the same name as the auth header replaces it.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Attach a JSON body. It is only transmitted for POST and PUT.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach any serializable value as the JSON body
    pub fn with_json<S: Serialize>(self, body: &S) -> Result<Self> {
        let value = serde_json::to_value(body)?;
        Ok(self.with_body(value))
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn query(&self) -> &BTreeMap<String, QueryValue> {
        &self.query
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// The body that actually goes on the wire for this verb
    pub fn transmitted_body(&self) -> Option<&Value> {
        if self.verb.carries_body() {
            self.body.as_ref()
        } else {
            None
        }
    }

    /// Derive the request for a continuation page.
    ///
    /// Verb, headers and body carry over; query parameters do not, because
    /// the continuation path already encodes the full query.
    pub fn continuation(&self, path: impl Into<String>) -> Self {
        Self {
            verb: self.verb,
            path: path.into(),
            headers: self.headers.clone(),
            query: BTreeMap::new(),
            body: self.body.clone(),
        }
    }

    /// Resolve the absolute URL against `base_url` by plain concatenation
    pub fn url(&self, base_url: &str) -> String {
        let mut url = format!("{}{}", base_url.trim_end_matches('/'), self.path);
        if let Some(query) = encode_query(&self.query) {
            url.push(if self.path.contains('?') { '&' } else { '?' });
            url.push_str(&query);
        }
        url
    }
}

/// Form-encode query parameters, repeating the key for each array element.
///
/// Returns `None` when there is nothing to encode.
pub fn encode_query(query: &BTreeMap<String, QueryValue>) -> Option<String> {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut pairs = 0usize;
    for (name, value) in query {
        match value {
            QueryValue::One(v) => {
                serializer.append_pair(name, v);
                pairs += 1;
            }
            QueryValue::Many(values) => {
                for v in values {
                    serializer.append_pair(name, v);
                    pairs += 1;
                }
            }
        }
    }
    if pairs == 0 {
        None
    } else {
        Some(serializer.finish())
    }
}
