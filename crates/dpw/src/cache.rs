//! Get-or-compute cache for per-position geometry, scoped to one engine call.
//!
//! Keys are the absolute coordinates of a point quantized to a tolerance, so
//! the four mirror images of a lattice point share one entry. Entries are
//! evicted first-in first-out once the capacity is reached.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;

/// Hit/miss counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn requests(&self) -> u64 {
        self.hits + self.misses
    }

    /// Hits over requests; 0 when nothing was requested.
    pub fn hit_rate(&self) -> f64 {
        match self.requests() {
            0 => 0.0,
            n => self.hits as f64 / n as f64,
        }
    }
}

/// Injected per-call cache used by the engine.
pub trait GeomCache {
    /// Value stored for `(x, y)`, or the result of `compute` (then stored).
    fn get_or_compute(&mut self, x: f64, y: f64, compute: &mut dyn FnMut() -> f64) -> f64;

    fn stats(&self) -> CacheStats;

    fn clear(&mut self);
}

/// Pass-through: always computes, stores nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCache;

impl GeomCache for NoCache {
    #[inline]
    fn get_or_compute(&mut self, _x: f64, _y: f64, compute: &mut dyn FnMut() -> f64) -> f64 {
        compute()
    }

    fn stats(&self) -> CacheStats {
        CacheStats::default()
    }

    fn clear(&mut self) {}
}

/// Quantization and capacity of a `QuantizedCache`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CacheCfg {
    /// Quantum in mm; coordinates closer than this may share an entry.
    pub tolerance: f64,
    pub capacity: usize,
}

impl Default for CacheCfg {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            capacity: 4096,
        }
    }
}

impl CacheCfg {
    /// Quantum capped at a quarter of `min_pitch`, so two lattice points
    /// never round to the same key.
    pub fn for_pitch(self, min_pitch: f64) -> Self {
        Self {
            tolerance: self.tolerance.min(min_pitch / 4.0),
            ..self
        }
    }
}

type Key = (i64, i64);

/// Bounded FIFO map keyed by quantized `(|x|, |y|)`.
#[derive(Clone, Debug)]
pub struct QuantizedCache {
    cfg: CacheCfg,
    map: HashMap<Key, f64>,
    order: VecDeque<Key>,
    stats: CacheStats,
}

impl QuantizedCache {
    pub fn new(cfg: CacheCfg) -> Self {
        Self {
            cfg,
            map: HashMap::with_capacity(cfg.capacity.min(1 << 16)),
            order: VecDeque::new(),
            stats: CacheStats::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    fn key(&self, x: f64, y: f64) -> Key {
        let q = |v: f64| (v.abs() / self.cfg.tolerance).round() as i64;
        (q(x), q(y))
    }

    fn insert(&mut self, key: Key, value: f64) {
        if self.cfg.capacity == 0 {
            return;
        }
        while self.map.len() >= self.cfg.capacity {
            match self.order.pop_front() {
                Some(old) => {
                    self.map.remove(&old);
                }
                None => break,
            }
        }
        self.map.insert(key, value);
        self.order.push_back(key);
    }
}

impl Default for QuantizedCache {
    fn default() -> Self {
        Self::new(CacheCfg::default())
    }
}

impl GeomCache for QuantizedCache {
    fn get_or_compute(&mut self, x: f64, y: f64, compute: &mut dyn FnMut() -> f64) -> f64 {
        let key = self.key(x, y);
        if let Some(&v) = self.map.get(&key) {
            self.stats.hits += 1;
            return v;
        }
        self.stats.misses += 1;
        let v = compute();
        self.insert(key, v);
        v
    }

    fn stats(&self) -> CacheStats {
        self.stats
    }

    fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
        self.stats = CacheStats::default();
    }
}
