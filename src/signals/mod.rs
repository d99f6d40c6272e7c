//! Title-index signals: typed scalars, buckets and per-mention evidence maps

mod bucket;
mod mapping;

pub use bucket::{
    is_count_key, is_signal_key, merge_signal, sparse_signals, walk_signals, SignalBucket,
    SignalValue,
};
pub use mapping::{ContributionSource, EvidenceMaps};
