/// Remaining stack below which recursion allocates a new segment.
const RED_ZONE: usize = 128 * 1024;

/// Size of each freshly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Runs `f`, growing the native stack first if it is close to exhausted.
///
/// Wrapped around the recursive entry points of the parser and the
/// evaluator so deeply nested programs hit the configured depth limit
/// instead of the guard page.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
