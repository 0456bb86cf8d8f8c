//! Cached, fail-soft elevation queries.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use terralos_model::GeoPoint2D;
use tracing::warn;

use crate::{ElevationError, ElevationProvider};

/// Default maximum number of cached elevations.
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Default maximum number of points per provider batch request.
pub const DEFAULT_BATCH_WIDTH: usize = 256;

/// Elevation queried when every resolution step has failed.
const DEFAULT_ELEVATION: f64 = 0.0;

/// Coordinates are rounded to this many fractional-degree steps per degree
/// for cache keying (1e-5 degrees is ~1.1 m, fine enough to keep distinct
/// grid cells apart while deduplicating repeat queries).
const KEY_STEPS_PER_DEGREE: f64 = 100_000.0;

/// Cache key based on coordinates rounded to a fixed precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    lat: i64,
    lon: i64,
}

impl CacheKey {
    fn from_point(p: GeoPoint2D) -> Self {
        CacheKey {
            lat: (p.lat * KEY_STEPS_PER_DEGREE).round() as i64,
            lon: (p.lon * KEY_STEPS_PER_DEGREE).round() as i64,
        }
    }
}

/// Bounded FIFO cache of resolved elevations.
#[derive(Debug)]
struct ElevationCache {
    entries: HashMap<CacheKey, f64>,
    /// Insertion order for FIFO eviction (oldest at the front).
    insertion_order: VecDeque<CacheKey>,
}

impl ElevationCache {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            insertion_order: VecDeque::new(),
        }
    }

    fn get(&self, key: &CacheKey) -> Option<f64> {
        self.entries.get(key).copied()
    }

    fn insert(&mut self, key: CacheKey, elevation: f64, capacity: usize) {
        if self.entries.insert(key, elevation).is_none() {
            self.insertion_order.push_back(key);
        }
        // Evict oldest entries if over capacity
        while self.entries.len() > capacity {
            match self.insertion_order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.insertion_order.clear();
    }
}

/// Fail-soft elevation queries over a host [`ElevationProvider`], with a
/// bounded per-service cache.
///
/// One service instance is constructed per host session and shared (it is
/// thread-safe); the cache persists across analysis invocations but is
/// strictly size-bounded with FIFO eviction.
///
/// Resolution order for each point: cache, then provider (batched where the
/// call has multiple misses, chunked at a bounded batch width), then a
/// single-point retry, then a default of `0.0` with the failure logged.
/// Errors are never propagated to callers.
pub struct ElevationService {
    provider: Arc<dyn ElevationProvider>,
    cache: RwLock<ElevationCache>,
    cache_capacity: usize,
    batch_width: usize,
}

impl std::fmt::Debug for ElevationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElevationService")
            .field("cache_capacity", &self.cache_capacity)
            .field("batch_width", &self.batch_width)
            .field("cached", &self.cached_len())
            .finish()
    }
}

impl ElevationService {
    /// Create a service with default cache capacity and batch width.
    pub fn new(provider: Arc<dyn ElevationProvider>) -> Self {
        Self::with_limits(provider, DEFAULT_CACHE_CAPACITY, DEFAULT_BATCH_WIDTH)
    }

    /// Create a service with explicit cache capacity and batch width.
    pub fn with_limits(
        provider: Arc<dyn ElevationProvider>,
        cache_capacity: usize,
        batch_width: usize,
    ) -> Self {
        Self {
            provider,
            cache: RwLock::new(ElevationCache::new()),
            cache_capacity: cache_capacity.max(1),
            batch_width: batch_width.max(1),
        }
    }

    /// Best-effort elevation at a single coordinate. Never fails.
    pub fn elevation_at(&self, point: GeoPoint2D) -> f64 {
        if !point.is_finite() {
            warn!(lat = point.lat, lon = point.lon, "non-finite elevation query, using default");
            return DEFAULT_ELEVATION;
        }

        let key = CacheKey::from_point(point);
        if let Some(hit) = self.cache_get(&key) {
            return hit;
        }

        match self.query_single(point) {
            Some(elevation) => {
                self.cache_put(key, elevation);
                elevation
            }
            None => {
                warn!(
                    lat = point.lat,
                    lon = point.lon,
                    "elevation unavailable, using default of {DEFAULT_ELEVATION}"
                );
                DEFAULT_ELEVATION
            }
        }
    }

    /// Best-effort elevations for a batch of coordinates.
    ///
    /// The returned vector always has the same length and order as the
    /// input. Cache misses are resolved through the provider's batch
    /// interface, chunked at the configured batch width; all successful
    /// lookups are persisted to the cache.
    pub fn elevation_batch_at(&self, points: &[GeoPoint2D]) -> Vec<f64> {
        let mut results = vec![DEFAULT_ELEVATION; points.len()];
        let mut miss_indices: Vec<usize> = Vec::new();

        {
            let cache = self.cache.read().ok();
            for (i, p) in points.iter().enumerate() {
                if !p.is_finite() {
                    warn!(lat = p.lat, lon = p.lon, "non-finite point in batch, using default");
                    continue;
                }
                let key = CacheKey::from_point(*p);
                match cache.as_ref().and_then(|c| c.get(&key)) {
                    Some(hit) => results[i] = hit,
                    None => miss_indices.push(i),
                }
            }
        }

        // Resolve misses in bounded chunks so a huge grid never turns into
        // one unbounded provider request.
        for chunk in miss_indices.chunks(self.batch_width) {
            let chunk_points: Vec<GeoPoint2D> = chunk.iter().map(|&i| points[i]).collect();
            let values = self.query_chunk(&chunk_points);
            for (&i, value) in chunk.iter().zip(values.iter()) {
                if let Some(elevation) = value {
                    results[i] = *elevation;
                    self.cache_put(CacheKey::from_point(points[i]), *elevation);
                } else {
                    warn!(
                        lat = points[i].lat,
                        lon = points[i].lon,
                        "elevation unavailable in batch, using default"
                    );
                }
            }
        }

        results
    }

    /// Number of elevations currently cached.
    pub fn cached_len(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    /// Drop all cached elevations.
    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }

    fn cache_get(&self, key: &CacheKey) -> Option<f64> {
        self.cache.read().ok().and_then(|c| c.get(key))
    }

    fn cache_put(&self, key: CacheKey, elevation: f64) {
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key, elevation, self.cache_capacity);
        }
    }

    /// Query one point with a single bounded retry.
    fn query_single(&self, point: GeoPoint2D) -> Option<f64> {
        for attempt in 0..2 {
            match self.provider.elevation(point) {
                Ok(elevation) if elevation.is_finite() => return Some(elevation),
                Ok(elevation) => {
                    warn!(lat = point.lat, lon = point.lon, elevation, "provider returned non-finite elevation");
                    return None;
                }
                Err(err) => {
                    if attempt == 0 {
                        warn!(lat = point.lat, lon = point.lon, %err, "elevation query failed, retrying");
                    } else {
                        warn!(lat = point.lat, lon = point.lon, %err, "elevation retry failed");
                    }
                }
            }
        }
        None
    }

    /// Query a chunk through the batch interface, falling back to per-point
    /// queries when the batch call fails or returns a short answer.
    fn query_chunk(&self, points: &[GeoPoint2D]) -> Vec<Option<f64>> {
        match self.provider.elevation_batch(points) {
            Ok(values) if values.len() == points.len() => values
                .into_iter()
                .map(|v| v.is_finite().then_some(v))
                .collect(),
            Ok(values) => {
                let err = ElevationError::BatchLengthMismatch {
                    requested: points.len(),
                    returned: values.len(),
                };
                warn!(%err, "batch elevation response discarded, falling back to single queries");
                points.iter().map(|p| self.query_single(*p)).collect()
            }
            Err(err) => {
                warn!(%err, "batch elevation query failed, falling back to single queries");
                points.iter().map(|p| self.query_single(*p)).collect()
            }
        }
    }
}
