//! Demo Operations
//!
//! One function per walkthrough step. Each step builds a request, makes one
//! (or, for bulk cleanup, a handful of) `ObjectStore` calls and writes the
//! result lines to the supplied writer.

pub mod buckets;
pub mod objects;
pub mod report;

pub use buckets::*;
pub use objects::*;
pub use report::print_error;
