//! In-place heap sort under the fault-injection contract.

use redoubt::{AttemptContext, Computation, Interrupt, Sequence, Value};

/// Max-heap based sort. Checkpoints once after the heap is built and once
/// after every extraction, so a declared fault or cancellation aborts the
/// attempt between structural steps rather than mid-sift.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeapSort;

impl HeapSort {
    pub fn new() -> Self {
        Self
    }
}

impl Computation for HeapSort {
    fn name(&self) -> &'static str {
        "heap-sort"
    }

    fn execute(&self, mut input: Sequence, ctx: &mut AttemptContext) -> Option<Sequence> {
        match sort(&mut input, ctx) {
            Ok(()) => Some(input),
            Err(_) => None,
        }
    }
}

fn sort(values: &mut [Value], ctx: &mut AttemptContext) -> Result<(), Interrupt> {
    build_heap(values, ctx);
    ctx.checkpoint()?;

    for end in (1..values.len()).rev() {
        values.swap(0, end);
        ctx.charge(3);
        sift_down(&mut values[..end], 0, ctx);
        ctx.checkpoint()?;
    }
    Ok(())
}

fn build_heap(values: &mut [Value], ctx: &mut AttemptContext) {
    let len = values.len();
    for root in (0..len / 2).rev() {
        sift_down(values, root, ctx);
    }
}

fn sift_down(values: &mut [Value], mut root: usize, ctx: &mut AttemptContext) {
    let len = values.len();
    loop {
        let left = 2 * root + 1;
        if left >= len {
            return;
        }

        let mut largest = root;
        ctx.charge(2);
        if values[left] > values[largest] {
            largest = left;
        }
        let right = left + 1;
        if right < len {
            ctx.charge(2);
            if values[right] > values[largest] {
                largest = right;
            }
        }

        if largest == root {
            return;
        }
        values.swap(root, largest);
        ctx.charge(3);
        root = largest;
    }
}
