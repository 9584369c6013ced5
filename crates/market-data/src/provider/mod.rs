//! Price source abstractions and implementations.
//!
//! This module contains:
//! - The `PriceSource` trait that all source adapters implement
//! - Concrete adapter implementations (Yahoo, Morningstar DK)
//!
//! # Architecture
//!
//! Adapters receive a pre-resolved provider symbol. The resolution from
//! a configured instrument to that symbol happens in the resolver
//! module, not in the adapters themselves. Adapters normalize whatever
//! the wire gives them into [`crate::models::QuotePoint`]s and report
//! every failure as a typed [`crate::errors::FetchError`].

mod traits;

// Adapter implementations
pub mod morningstar;
pub mod yahoo;

// Re-exports
pub use traits::PriceSource;
