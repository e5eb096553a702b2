use std::cell::Cell;
use std::time::Instant;

thread_local! {
    static PERF_DEPTH: Cell<u32> = const { Cell::new(0) };
}

/// 性能统计 Guard：记录 elapsed_ms + 处理条目数 + 嵌套深度
///
/// 使用方式：
/// ```ignore
/// let mut perf = visa_inventory::perf::PerfGuard::new("aggregate_store");
/// // do work...
/// perf.set_items(records.len());
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    depth: u32,
    items: Option<usize>,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        let depth = PERF_DEPTH.with(|d| {
            let next = d.get().saturating_add(1);
            d.set(next);
            next
        });
        Self {
            op,
            start: Instant::now(),
            depth,
            items: None,
        }
    }

    /// 记录本次操作处理的条目数（文件数/记录数）
    pub fn set_items(&mut self, items: usize) {
        self.items = Some(items);
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            items = self.items,
            depth = self.depth,
            "done"
        );

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_guards_track_depth() {
        let outer = PerfGuard::new("outer");
        assert_eq!(outer.depth, 1);
        {
            let mut inner = PerfGuard::new("inner");
            inner.set_items(3);
            assert_eq!(inner.depth, 2);
        }
        let sibling = PerfGuard::new("sibling");
        assert_eq!(sibling.depth, 2);
    }
}
