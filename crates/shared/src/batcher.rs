use std::num::NonZeroUsize;

/// Split `items` into contiguous chunks of at most `size`; only the last
/// chunk may be shorter.
pub fn batch<T>(items: &[T], size: NonZeroUsize) -> Vec<&[T]> {
    items.chunks(size.get()).collect()
}
