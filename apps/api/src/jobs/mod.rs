// Job listings: aggregation across store partitions, normalization into the
// canonical model, lookup by id, and faceted search over the merged set.

pub mod aggregate;
pub mod format;
pub mod handlers;
pub mod model;
pub mod normalize;
pub mod search;
pub mod views;
