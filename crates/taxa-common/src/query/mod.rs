//! Species query translation
//!
//! Request parameters go in, a [`QueryDescriptor`] comes out. The descriptor
//! says which records match, whether the taxonomy join is needed, how to
//! sort, limit, project or group, and nothing about how a particular store
//! does any of that.
//!
//! - [`params`]: typed view of the query string
//! - [`translator`]: one builder per species query
//! - [`descriptor`]: the output value

pub mod descriptor;
pub mod params;
pub mod translator;

#[cfg(test)]
pub(crate) mod testing;

pub use descriptor::{
    Condition, FieldPath, Filter, Grouping, JoinMode, ProjectedField, Projection, QueryDescriptor,
    Sort, SortDirection, SortKey, JOINED_TAXONOMY_PREFIX,
};
pub use params::{SpeciesQueryParams, TaxonomyFilter};
