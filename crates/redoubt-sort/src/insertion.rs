//! In-place insertion sort under the fault-injection contract.

use redoubt::{AttemptContext, Computation, Interrupt, Sequence, Value};

/// Straightforward insertion sort. Quadratic, but an entirely independent
/// implementation from [`HeapSort`](crate::HeapSort), which is what makes
/// it a credible backup: the two cannot share a bug.
///
/// Checkpoints after each element reaches its slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertionSort;

impl InsertionSort {
    pub fn new() -> Self {
        Self
    }
}

impl Computation for InsertionSort {
    fn name(&self) -> &'static str {
        "insertion-sort"
    }

    fn execute(&self, mut input: Sequence, ctx: &mut AttemptContext) -> Option<Sequence> {
        match sort(&mut input, ctx) {
            Ok(()) => Some(input),
            Err(_) => None,
        }
    }
}

fn sort(values: &mut [Value], ctx: &mut AttemptContext) -> Result<(), Interrupt> {
    for i in 1..values.len() {
        let mut j = i;
        while j > 0 {
            ctx.charge(2);
            if values[j - 1] <= values[j] {
                break;
            }
            values.swap(j - 1, j);
            ctx.charge(3);
            j -= 1;
        }
        ctx.checkpoint()?;
    }
    Ok(())
}
