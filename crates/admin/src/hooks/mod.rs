//! # Hooks
//!
//! Bindings between entity configs, the shared query cache and the
//! notifier:
//! - `QueryClient`: list cache keyed by query key and filters
//! - `EntityQuery`: cached lists and notifying mutations for one entity

// ============================================================================
// Module Declarations
// ============================================================================

pub mod cache;
pub mod use_entity;

// ============================================================================
// Re-exports
// ============================================================================

pub use cache::{CacheEntry, QueryClient, QueryKey};
pub use use_entity::{EntityQuery, Mutation};
