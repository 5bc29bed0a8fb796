use std::alloc::GlobalAlloc;
use std::alloc::Layout;
use std::alloc::System;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

/// Reports how many bytes the process currently has allocated.
///
/// Readings are best-effort snapshots used for comparative reporting only.
/// Implementations that cannot introspect the allocator return 0.
pub trait MemoryProbe {
    /// Bytes currently allocated by the process, or 0 if unknown.
    fn allocated_bytes(&self) -> usize;
}

/// Probe for builds without allocator introspection.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullProbe;

impl MemoryProbe for NullProbe {
    fn allocated_bytes(&self) -> usize {
        0
    }
}

impl<P: MemoryProbe + ?Sized> MemoryProbe for &P {
    fn allocated_bytes(&self) -> usize {
        (**self).allocated_bytes()
    }
}

/// A [`GlobalAlloc`] wrapper that keeps a running count of live bytes.
///
/// Install it with `#[global_allocator]` to make it see every allocation in
/// the process:
///
/// ```rust
/// use hash_perf::memory::CountingAllocator;
/// use hash_perf::memory::MemoryProbe;
///
/// #[global_allocator]
/// static ALLOC: CountingAllocator = CountingAllocator::system();
///
/// fn main() {
///     let data = vec![0u8; 4096];
///     assert!(ALLOC.allocated_bytes() >= data.len());
/// }
/// ```
pub struct CountingAllocator<A = System> {
    inner: A,
    allocated: AtomicUsize,
}

impl CountingAllocator<System> {
    /// Counts allocations served by the system allocator.
    pub const fn system() -> Self {
        Self::new(System)
    }
}

impl<A> CountingAllocator<A> {
    /// Wraps `inner` with a zeroed counter.
    pub const fn new(inner: A) -> Self {
        Self {
            inner,
            allocated: AtomicUsize::new(0),
        }
    }

    #[inline(always)]
    fn record_alloc(&self, size: usize) {
        self.allocated.fetch_add(size, Ordering::Relaxed);
    }

    #[inline(always)]
    fn record_dealloc(&self, size: usize) {
        self.allocated.fetch_sub(size, Ordering::Relaxed);
    }
}

// SAFETY: Every method forwards to `inner` with the caller's arguments
// unchanged, so `inner` upholds the `GlobalAlloc` contract. The counter is
// only touched after a successful allocation or before a deallocation and
// never allocates itself.
unsafe impl<A: GlobalAlloc> GlobalAlloc for CountingAllocator<A> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        // SAFETY: Forwarded from our caller.
        let ptr = unsafe { self.inner.alloc(layout) };
        if !ptr.is_null() {
            self.record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        // SAFETY: Forwarded from our caller.
        let ptr = unsafe { self.inner.alloc_zeroed(layout) };
        if !ptr.is_null() {
            self.record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        self.record_dealloc(layout.size());
        // SAFETY: Forwarded from our caller.
        unsafe { self.inner.dealloc(ptr, layout) };
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        // SAFETY: Forwarded from our caller.
        let new_ptr = unsafe { self.inner.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            // On failure the old block stays live, so the count is unchanged.
            self.record_dealloc(layout.size());
            self.record_alloc(new_size);
        }
        new_ptr
    }
}

impl<A> MemoryProbe for CountingAllocator<A> {
    fn allocated_bytes(&self) -> usize {
        self.allocated.load(Ordering::Relaxed)
    }
}
