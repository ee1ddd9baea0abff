//! Document lookup result types.

use serde::{Deserialize, Serialize};

/// An element found in the persisted document by its `id` attribute.
///
/// Both HTML strings are taken verbatim from the persisted source.
/// `inner_html` is empty for void elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatedElement {
    pub id: String,
    pub tag_name: String,
    pub outer_html: String,
    pub inner_html: String,
}
