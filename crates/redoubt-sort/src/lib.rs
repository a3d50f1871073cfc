//! # redoubt-sort: sorting computations for the recovery-block engine
//!
//! Two independent implementations of the [`redoubt::Computation`]
//! capability, suitable as primary and backup in a recovery chain:
//!
//! - [`HeapSort`]: O(n log n), the usual primary
//! - [`InsertionSort`]: O(n²) but simple, the usual backup
//!
//! Both charge the attempt's resource-access counter per comparison, swap,
//! and element access, and poll the fault/cancellation checkpoint at
//! structural milestones (heap built, each extraction, each inserted
//! element), aborting immediately on the first interrupt.

mod heap;
mod insertion;

pub use heap::HeapSort;
pub use insertion::InsertionSort;
