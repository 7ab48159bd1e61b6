//! Overpass QL query builders.

use std::fmt;
use std::str::FromStr;

use catchment_core::{BoundingBox, NodeId};
use thiserror::Error;

/// Server-side query timeout in seconds.
const QUERY_TIMEOUT_SECS: u64 = 90;

/// Errors returned when parsing a [`CategoryFilter`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CategoryFilterError {
    /// The input is not of the form `key=value`.
    #[error("category '{input}' must be of the form key=value")]
    Format {
        /// Input as supplied.
        input: String,
    },
    /// The key or value contains characters that cannot be quoted.
    #[error("category '{input}' must not contain quotes or backslashes")]
    Unquotable {
        /// Input as supplied.
        input: String,
    },
}

/// Tag filter selecting the element category, such as `shop=supermarket`.
///
/// # Examples
///
/// ```
/// use catchment_data::overpass::CategoryFilter;
///
/// let filter: CategoryFilter = "shop=supermarket".parse()?;
/// assert_eq!(filter.key(), "shop");
/// assert_eq!(filter.to_string(), "shop=supermarket");
/// # Ok::<(), catchment_data::overpass::CategoryFilterError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFilter {
    key: String,
    value: String,
}

impl CategoryFilter {
    /// Tag key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Tag value.
    pub fn value(&self) -> &str {
        &self.value
    }

    fn selector(&self) -> String {
        format!("[\"{}\"=\"{}\"]", self.key, self.value)
    }
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self {
            key: "shop".to_owned(),
            value: "supermarket".to_owned(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

impl FromStr for CategoryFilter {
    type Err = CategoryFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_error = || CategoryFilterError::Format {
            input: s.to_owned(),
        };
        let (key, value) = s.split_once('=').ok_or_else(format_error)?;
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            return Err(format_error());
        }
        if [key, value]
            .iter()
            .any(|part| part.contains(['"', '\\']))
        {
            return Err(CategoryFilterError::Unquotable {
                input: s.to_owned(),
            });
        }
        Ok(Self {
            key: key.to_owned(),
            value: value.to_owned(),
        })
    }
}

/// Query for every node and way tagged with `category` inside `bbox`.
///
/// Way output includes the border-node list but not the nodes themselves.
///
/// # Examples
///
/// ```
/// use catchment_core::BoundingBox;
/// use catchment_data::overpass::{CategoryFilter, elements_query};
///
/// let bbox = BoundingBox::new(-37.0, 174.0, -36.0, 175.0)?;
/// let query = elements_query(&CategoryFilter::default(), &bbox);
/// assert!(query.contains("way[\"shop\"=\"supermarket\"](-37,174,-36,175);"));
/// # Ok::<(), catchment_core::BoundingBoxError>(())
/// ```
pub fn elements_query(category: &CategoryFilter, bbox: &BoundingBox) -> String {
    let selector = category.selector();
    format!(
        "[out:json][timeout:{QUERY_TIMEOUT_SECS}];\
         (node{selector}({bbox});way{selector}({bbox}););\
         out body;"
    )
}

/// Query for the coordinates of `nodes`.
///
/// # Examples
///
/// ```
/// use catchment_core::NodeId;
/// use catchment_data::overpass::nodes_query;
///
/// let query = nodes_query(&[NodeId(111), NodeId(222)]);
/// assert!(query.ends_with("node(id:111,222);out skel;"));
/// ```
pub fn nodes_query(nodes: &[NodeId]) -> String {
    let ids = nodes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("[out:json][timeout:{QUERY_TIMEOUT_SECS}];node(id:{ids});out skel;")
}
