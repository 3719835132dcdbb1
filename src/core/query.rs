//! Query-string parsing: filters, includes, and pagination
//!
//! Turns raw URL query parameters into a structured [`QueryDescriptor`].
//! The parser is deliberately forgiving: filters are optional refinements of
//! a read, so malformed keys are dropped and out-of-range pagination falls
//! back to defaults instead of failing the request.
//!
//! # Recognized syntax
//! ```text
//! GET /posts?filter[published]=true&include=author&page=2&perPage=10
//! GET /users?include=posts.author
//! GET /users?include=posts,posts.author
//! ```

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Default page number when absent or invalid
pub const DEFAULT_PAGE: usize = 1;

/// Default page size when absent or invalid
pub const DEFAULT_PER_PAGE: usize = 15;

/// Validated pagination parameters.
///
/// `skip` and `take` are always derived from `page`/`per_page`, never stored,
/// so the two can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Pagination {
    /// Number of rows to skip before the current page.
    ///
    /// Saturating: the parser accepts any positive integer, so an absurd
    /// `page` must land on an unreachable offset, not overflow.
    pub fn skip(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// Number of rows on the current page
    pub fn take(&self) -> usize {
        self.per_page
    }
}

/// Parsed, validated representation of a request's read intent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryDescriptor {
    /// Field → value equality filters; last occurrence of a field wins
    pub filters: IndexMap<String, Value>,

    /// Relation name → nested relation names to eagerly attach.
    ///
    /// One level of nesting is interpreted; deeper dotted segments are kept
    /// verbatim and passed through to the store layer.
    pub includes: IndexMap<String, Vec<String>>,

    /// Pagination, defaulted when absent or invalid
    pub pagination: Pagination,
}

impl QueryDescriptor {
    /// Parse ordered query-string pairs into a descriptor.
    ///
    /// Never fails: unrecognized or malformed keys are ignored.
    pub fn parse(pairs: &[(String, String)]) -> Self {
        let mut descriptor = QueryDescriptor::default();
        let mut page = None;
        let mut per_page = None;

        for (key, raw) in pairs {
            if let Some(field) = filter_field(key) {
                if field.is_empty() {
                    continue;
                }
                descriptor
                    .filters
                    .insert(field.to_string(), coerce_scalar(raw));
                continue;
            }

            match key.as_str() {
                "include" => {
                    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                        let (relation, nested) = match part.split_once('.') {
                            Some((relation, rest)) => (relation, Some(rest)),
                            None => (part, None),
                        };
                        if relation.is_empty() {
                            continue;
                        }
                        let entry = descriptor.includes.entry(relation.to_string()).or_default();
                        if let Some(nested) = nested {
                            if !nested.is_empty() && !entry.iter().any(|n| n == nested) {
                                entry.push(nested.to_string());
                            }
                        }
                    }
                }
                "page" => page = parse_positive(raw),
                "perPage" => per_page = parse_positive(raw),
                _ => {}
            }
        }

        descriptor.pagination = Pagination {
            page: page.unwrap_or(DEFAULT_PAGE),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE),
        };
        descriptor
    }
}

/// Extract the field name from a `filter[<field>]` key, if well-formed
fn filter_field(key: &str) -> Option<&str> {
    key.strip_prefix("filter[")?.strip_suffix(']')
}

/// Coerce a raw query value: bool, then integer, else string
pub(crate) fn coerce_scalar(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => match raw.parse::<i64>() {
            Ok(n) => Value::Number(n.into()),
            Err(_) => Value::String(raw.to_string()),
        },
    }
}

/// Parse a strictly positive integer; anything else is `None`
fn parse_positive(raw: &str) -> Option<usize> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|n| *n > 0)
        .map(|n| n as usize)
}

/// Paginated response page: items plus echoed pagination parameters
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,

    pub page: usize,

    #[serde(rename = "perPage")]
    pub per_page: usize,
}
