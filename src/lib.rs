//! Run-assignment engine for boarding kennels.
//!
//! Given a dog's weight and behavioral tags and the runs free for a stay,
//! selects exactly one run that satisfies every applicable housing rule, or
//! reports that none does. The engine is a pure function of its inputs and a
//! random source; record keeping stays with the caller.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Run`, `RunNumber`, `RunType`, `DogProfile`,
//!   `DogTag`, `StayWindow`, `Allocation`
//! - **`allocation`**: `ExclusionRule` trait, the standard rules, `RunAllocator`
//! - **`validation`**: Input integrity checks (weights, date ranges, duplicate runs)
//! - **`booking`**: Persistence-side traits, the retrying `Booker`, `MemoryKennel`
//! - **`config`**: Rule thresholds and booking retry budget
//! - **`error`**: `AllocationError`
//!
//! # Architecture
//!
//! Plain models, rules as small trait objects composed by an engine, and
//! validation that runs before any rule is evaluated. Persistence is reached
//! only through the traits in `booking`.

pub mod allocation;
pub mod booking;
pub mod config;
pub mod error;
pub mod models;
pub mod validation;

pub use allocation::RunAllocator;
pub use error::{AllocationError, AllocationResult};
pub use models::Allocation;
