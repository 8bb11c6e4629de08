//! Общие типы и трейты агрегатов

pub mod aggregate_id;
pub mod origin;

// Re-exports
pub use aggregate_id::AggregateId;
pub use origin::Origin;
