//! Free-list object pool.
//!
//! Acquire is unbounded: an empty pool constructs a fresh instance.
//! Release is bounded: instances past `max_retained` are dropped.

/// Objects that can be recycled through an [`ObjectPool`].
pub trait Poolable: Default {
    /// Clear per-use state before the object goes back on the free list.
    fn reset(&mut self);
}

#[derive(Debug)]
pub struct ObjectPool<T> {
    free: Vec<T>,
    max_retained: usize,
    constructed: usize,
}

impl<T: Poolable> ObjectPool<T> {
    pub fn new(max_retained: usize) -> Self {
        Self {
            free: Vec::with_capacity(max_retained),
            max_retained,
            constructed: 0,
        }
    }

    /// Create a pool with `prewarm` instances already constructed. The
    /// prewarm never exceeds `max_retained`.
    pub fn with_prewarm(prewarm: usize, max_retained: usize) -> Self {
        let mut pool = Self::new(max_retained);
        for _ in 0..prewarm.min(max_retained) {
            pool.constructed += 1;
            pool.free.push(T::default());
        }
        pool
    }

    /// Take an instance, reusing a released one when available.
    pub fn acquire(&mut self) -> T {
        match self.free.pop() {
            Some(obj) => obj,
            None => {
                self.constructed += 1;
                T::default()
            }
        }
    }

    /// Reset `obj` and keep it for reuse, or drop it if the pool is full.
    pub fn release(&mut self, mut obj: T) {
        if self.free.len() < self.max_retained {
            obj.reset();
            self.free.push(obj);
        }
    }

    pub fn release_all(&mut self, objs: impl IntoIterator<Item = T>) {
        for obj in objs {
            self.release(obj);
        }
    }

    /// Instances sitting on the free list.
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Total instances ever constructed by this pool.
    pub fn constructed(&self) -> usize {
        self.constructed
    }

    pub fn max_retained(&self) -> usize {
        self.max_retained
    }
}
