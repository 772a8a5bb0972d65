//! Process-wide memoizing cache for `text_bbox` results, safe for
//! concurrent callers and populated lazily on first miss.
//!
//! `lru::LruCache::get` requires `&mut self` (every touch reorders the
//! recency list), so there is no read path that avoids taking
//! exclusive access — a `RwLock` would degrade to a mutex in practice.
//! A plain `Mutex` around the `LruCache` is therefore the honest
//! choice here. Capacity defaults to `DEFAULT_CAPACITY` but can be set
//! once via `init` before first use, from `EngineConfig::font_cache_capacity`.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, OnceLock};

use lru::LruCache;
use std::num::NonZeroUsize;

/// A hashable, `Eq`-comparable wrapper around an `f32`, using its raw
/// bit pattern — the same trick `azul-css`'s `FloatValue` uses (there,
/// quantized to a fixed-precision integer; here, bit-identical inputs
/// are the common case since callers pass through the same directive
/// values run after run, so raw bits are sufficient and avoid an
/// arbitrary precision cutoff).
#[derive(Debug, Clone, Copy, PartialEq)]
struct FloatKey(u32);

impl FloatKey {
    fn new(value: f32) -> Self {
        Self(value.to_bits())
    }
}

impl Eq for FloatKey {}
impl Hash for FloatKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    text_hash: u64,
    font_size: FloatKey,
    max_width: Option<FloatKey>,
    line_height_multiplier: FloatKey,
    provider_name_hash: u64,
}

impl CacheKey {
    fn new(
        provider_name: &str,
        text: &str,
        font_size_pt: f32,
        max_width: Option<f32>,
        line_height_multiplier: f32,
    ) -> Self {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let text_hash = hasher.finish();

        let mut provider_hasher = DefaultHasher::new();
        provider_name.hash(&mut provider_hasher);
        let provider_name_hash = provider_hasher.finish();

        Self {
            text_hash,
            font_size: FloatKey::new(font_size_pt),
            max_width: max_width.map(FloatKey::new),
            line_height_multiplier: FloatKey::new(line_height_multiplier),
            provider_name_hash,
        }
    }
}

const DEFAULT_CAPACITY: usize = 4096;

type Cache = LruCache<CacheKey, (f32, f32)>;

static GLOBAL_CACHE: OnceLock<Mutex<Cache>> = OnceLock::new();

fn global() -> &'static Mutex<Cache> {
    GLOBAL_CACHE.get_or_init(|| {
        Mutex::new(LruCache::new(
            NonZeroUsize::new(DEFAULT_CAPACITY).expect("capacity is non-zero"),
        ))
    })
}

/// Sizes the process-wide cache to `capacity` entries, per
/// `EngineConfig::font_cache_capacity`. Only takes effect the first
/// time it's called — `OnceLock` can't be resized once a lookup has
/// already initialized it with the default capacity, so callers should
/// call this before the first `get_or_compute`. Falls back to
/// `DEFAULT_CAPACITY` if `capacity` is zero. A no-op (not a panic) on
/// a later call with a different value, since by then the cache may
/// already hold entries other callers rely on.
pub fn init(capacity: usize) {
    let capacity = NonZeroUsize::new(capacity)
        .unwrap_or_else(|| NonZeroUsize::new(DEFAULT_CAPACITY).expect("capacity is non-zero"));
    let _ = GLOBAL_CACHE.set(Mutex::new(LruCache::new(capacity)));
}

/// Looks up `(text, font_size_pt, max_width, line_height_multiplier)`
/// in the process-wide cache, computing and inserting via `compute` on
/// a miss.
pub fn get_or_compute(
    provider_name: &str,
    text: &str,
    font_size_pt: f32,
    max_width: Option<f32>,
    line_height_multiplier: f32,
    compute: impl FnOnce() -> (f32, f32),
) -> (f32, f32) {
    let key = CacheKey::new(
        provider_name,
        text,
        font_size_pt,
        max_width,
        line_height_multiplier,
    );

    let mut cache = global().lock().expect("font metrics cache lock poisoned");
    if let Some(hit) = cache.get(&key) {
        return *hit;
    }
    drop(cache);

    let value = compute();

    let mut cache = global().lock().expect("font metrics cache lock poisoned");
    cache.put(key, value);
    value
}

/// Test hook (spec §9: "allow a test hook to clear it"). Also useful
/// for a long-running host process that wants to reclaim memory after
/// swapping fonts.
pub fn clear() {
    global()
        .lock()
        .expect("font metrics cache lock poisoned")
        .clear();
}

/// Number of entries currently cached, for test assertions.
pub fn len() -> usize {
    global().lock().expect("font metrics cache lock poisoned").len()
}
