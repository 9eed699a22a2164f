//! docseek-rank
//!
//! Orders documents by the distance of their single best chunk to a query.

pub mod ranker;
pub mod search;

pub use ranker::Ranker;
pub use search::{search, DocumentSearch};
