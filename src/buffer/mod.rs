//! Scrolling-list bookkeeping for bundles with more items than containers.

/// Circular window over a bundle's item list.
pub mod circular;
