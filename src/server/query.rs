//! Request parameter parsing
//!
//! axum's `Query` extractor collapses repeated keys, so match routes read the
//! raw query string into [`QueryPairs`] instead. A set key that appears only
//! with empty values (`?queue=`) is an explicit empty set; a key that never
//! appears is absent. Unknown keys are ignored.

use crate::error::{GatewayError, GatewayResult};
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

/// Decoded `key=value` pairs of a query string, in request order
#[derive(Debug, Clone, Default)]
pub struct QueryPairs {
    pairs: Vec<(String, String)>,
}

impl QueryPairs {
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|raw| {
                url::form_urlencoded::parse(raw.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();
        Self { pairs }
    }

    fn values(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// First non-blank value of `name`
    pub fn first(&self, name: &str) -> Option<&str> {
        self.values(name)
            .into_iter()
            .map(str::trim)
            .find(|v| !v.is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == name)
    }

    /// Caller-supplied platform tag; a present but blank key is still a tag
    pub fn platform(&self) -> Option<String> {
        if !self.contains("platform") {
            return None;
        }
        Some(self.first("platform").unwrap_or_default().to_string())
    }

    /// Scalar value of `name`, or `sentinel` when it is not supplied
    pub fn number_or<T: FromStr>(&self, name: &str, sentinel: T) -> GatewayResult<T> {
        match self.first(name) {
            Some(value) => parse_number(name, value),
            None => Ok(sentinel),
        }
    }

    /// All values of a repeated key; `None` when the key never appears
    pub fn int_set(&self, name: &str) -> GatewayResult<Option<BTreeSet<i32>>> {
        if !self.contains(name) {
            return Ok(None);
        }

        let mut set = BTreeSet::new();
        for value in self.values(name).into_iter().map(str::trim) {
            if value.is_empty() {
                continue;
            }
            set.insert(parse_number(name, value)?);
        }
        Ok(Some(set))
    }
}

/// Captured path segments of a matched route
#[derive(Debug, Clone, Default)]
pub struct PathParams {
    params: HashMap<String, String>,
}

impl PathParams {
    pub fn new(params: HashMap<String, String>) -> Self {
        Self { params }
    }

    /// Segment `name` as text; blank text is left to the descriptor builder
    pub fn text(&self, name: &str) -> String {
        self.params.get(name).cloned().unwrap_or_default()
    }

    pub fn number<T: FromStr>(&self, name: &str) -> GatewayResult<T> {
        parse_number(name, self.params.get(name).map(String::as_str).unwrap_or(""))
    }
}

fn parse_number<T: FromStr>(name: &str, value: &str) -> GatewayResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| GatewayError::invalid_parameter(name, value))
}
