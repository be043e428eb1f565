//! gridiron: an NFL fantasy ranking pipeline.
//!
//! Raw stats tables (scraped league and aggregator pages) flow through a
//! fixed sequence — extract, normalize, score, rank, persist — once per
//! (position, year, optional week). Position-specific behavior is pure
//! configuration ([`profile::PositionProfile`]); the stages themselves are
//! stateless and, apart from persistence, side-effect free.

pub mod error;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod persist;
pub mod pipeline;
pub mod profile;
pub mod rank;
pub mod score;
pub mod table;
