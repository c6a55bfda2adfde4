//! Query builder for the item API.
//!
//! Directus expresses filters in a bracketed key syntax, e.g.
//! `filter[_and][0][_or][0][status][_eq]=active`. The builder keeps a typed
//! filter tree and renders it to that syntax, together with field
//! projection, sort order and limit.

use std::fmt::Write;

/// One node of a filter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `field equals value`
    Eq(String, String),
    /// `field is null`
    Null(String),
    /// `field greater than value`
    Gt(String, String),
    /// `field less than or equal to value`
    Lte(String, String),
    /// All children must match.
    And(Vec<Filter>),
    /// Any child must match.
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    pub fn null(field: impl Into<String>) -> Self {
        Filter::Null(field.into())
    }

    pub fn gt(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Gt(field.into(), value.into())
    }

    pub fn lte(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Lte(field.into(), value.into())
    }

    pub fn and(children: Vec<Filter>) -> Self {
        Filter::And(children)
    }

    pub fn or(children: Vec<Filter>) -> Self {
        Filter::Or(children)
    }

    /// Render this node under `prefix` into `params`.
    fn append_params(&self, prefix: &str, params: &mut Vec<(String, String)>) {
        match self {
            Filter::Eq(field, value) => {
                params.push((format!("{}[{}][_eq]", prefix, field), value.clone()));
            }
            Filter::Null(field) => {
                params.push((format!("{}[{}][_null]", prefix, field), "true".to_string()));
            }
            Filter::Gt(field, value) => {
                params.push((format!("{}[{}][_gt]", prefix, field), value.clone()));
            }
            Filter::Lte(field, value) => {
                params.push((format!("{}[{}][_lte]", prefix, field), value.clone()));
            }
            Filter::And(children) => {
                for (i, child) in children.iter().enumerate() {
                    child.append_params(&format!("{}[_and][{}]", prefix, i), params);
                }
            }
            Filter::Or(children) => {
                for (i, child) in children.iter().enumerate() {
                    child.append_params(&format!("{}[_or][{}]", prefix, i), params);
                }
            }
        }
    }
}

/// Query parameters for an item request, rendered in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a filter tree.
    pub fn filter(mut self, filter: Filter) -> Self {
        filter.append_params("filter", &mut self.params);
        self
    }

    /// Comma-separated field projection, e.g. `*,applications.id`.
    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.params.push(("fields".to_string(), fields.into()));
        self
    }

    /// Sort order; prefix a field with `-` for descending.
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.params.push(("sort".to_string(), sort.into()));
        self
    }

    /// Result limit; `-1` asks for the full collection.
    pub fn limit(mut self, limit: i64) -> Self {
        self.params.push(("limit".to_string(), limit.to_string()));
        self
    }

    /// Raw extra parameter (e.g. a cache-busting timestamp).
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Render to a query string, or `None` when empty.
    ///
    /// Filter values are percent-encoded (ISO timestamps carry `:`);
    /// keys and projection/sort values are caller-controlled identifiers
    /// and pass through as-is.
    pub fn to_query_string(&self) -> Option<String> {
        if self.params.is_empty() {
            return None;
        }

        let mut out = String::new();
        for (i, (key, value)) in self.params.iter().enumerate() {
            if i > 0 {
                out.push('&');
            }
            if key.starts_with("filter") {
                let _ = write!(out, "{}={}", key, urlencoding::encode(value));
            } else {
                let _ = write!(out, "{}={}", key, value);
            }
        }
        Some(out)
    }
}
