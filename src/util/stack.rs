/// Remaining stack below which a guarded call moves to a new segment.
const RED_ZONE: usize = 128 * 1024;
/// Size of each new stack segment.
const GROW_SIZE: usize = 4 * 1024 * 1024;

/// Runs `f`, first switching to a freshly allocated stack segment when less
/// than [`RED_ZONE`] bytes are left on the current one.
///
/// Every recursive walk over the syntax tree goes through this, so nesting
/// and call depth are bounded by the configured limits only.
///
/// # Example
/// ```
/// use fhll::util::stack::guarded;
///
/// fn depth(n: u32) -> u32 {
///     guarded(|| if n == 0 { 0 } else { 1 + depth(n - 1) })
/// }
///
/// assert_eq!(depth(100_000), 100_000);
/// ```
pub fn guarded<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, GROW_SIZE, f)
}
