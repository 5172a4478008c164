//! Identifier types shared by the clients, the pipeline and the record ledger

pub mod ids;

pub use ids::{PmcId, PubMedId};
