//! Domain types shared across Taxa crates

pub mod conservation;
pub mod rank;

pub use conservation::{
    severity_sort_index, status_index, ConservationStatus, CONSERVATION_STATUSES,
    UNKNOWN_STATUS_INDEX,
};
pub use rank::{TaxonomicRank, RANK_NAMES};
