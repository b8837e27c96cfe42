//! Procedural skins for mass handles.
//!
//! Every mass sphere wears a small generated texture tinted by its
//! category: gold for stars, cyan for pulsars, white for dwarfs, and so
//! on. Skins are seeded from the mass id so a body keeps its surface
//! pattern for its whole lifetime, across drags and magnitude edits.
//!
//! Generation is cheap but not free, so finished skins live in a bounded
//! cache with least-recently-used eviction.

use std::collections::HashMap;

use crate::mass::MassCategory;

/// Default cache capacity.
const DEFAULT_CACHE_CAPACITY: usize = 50;

/// Base tint per category, RGB.
pub fn base_color(category: MassCategory) -> [u8; 3] {
    match category {
        MassCategory::Star => [255, 215, 0],
        MassCategory::Pulsar => [0, 255, 255],
        MassCategory::NeutronStar => [170, 255, 255],
        MassCategory::WhiteDwarf => [255, 255, 255],
        MassCategory::RedGiant => [255, 68, 68],
        // Custom bodies borrow the star skin.
        MassCategory::Custom => [255, 215, 0],
    }
}

/// A generated RGBA8 skin.
#[derive(Clone, Debug, PartialEq)]
pub struct SkinTexture {
    pub pixels: Vec<u8>,
    pub size: u32,
}

impl SkinTexture {
    fn solid(color: [u8; 3]) -> Self {
        Self {
            pixels: vec![color[0], color[1], color[2], 255],
            size: 1,
        }
    }
}

/// Generate a skin for a category.
///
/// The pattern is a radial falloff from a brightened center toward a
/// darkened rim, speckled with hash noise. A degenerate `size` of 0 falls
/// back to a 1x1 solid tint rather than failing.
pub fn generate_skin(category: MassCategory, size: u32, seed: u64) -> SkinTexture {
    let color = base_color(category);
    if size == 0 {
        return SkinTexture::solid(color);
    }

    let seed32 = (seed ^ (seed >> 32)) as u32;
    let center = (size as f32 - 1.0) / 2.0;
    let max_radius = center.max(0.5);

    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let falloff = 1.0 - (dx * dx + dy * dy).sqrt() / (max_radius * 1.5);
            let falloff = falloff.clamp(0.0, 1.0);

            // Speckle: 30% noise over the radial base intensity.
            let noise = hash_noise(x, y, seed32) as f32 / 255.0;
            let intensity = 0.4 + 0.6 * falloff * (0.7 + 0.3 * noise);

            for channel in color {
                pixels.push(((channel as f32) * intensity).min(255.0) as u8);
            }
            pixels.push(255);
        }
    }

    SkinTexture { pixels, size }
}

/// Simple hash-based noise function.
fn hash_noise(x: u32, y: u32, seed: u32) -> u8 {
    let mut n = x
        .wrapping_mul(374761393)
        .wrapping_add(y.wrapping_mul(668265263))
        .wrapping_add(seed.wrapping_mul(1013904223));
    n = (n ^ (n >> 13)).wrapping_mul(1274126177);
    n = n ^ (n >> 16);
    (n & 255) as u8
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct SkinKey {
    category: MassCategory,
    size: u32,
    seed: u64,
}

struct CacheEntry {
    texture: SkinTexture,
    last_used: u64,
}

/// Bounded skin cache with least-recently-used eviction.
pub struct SkinCache {
    capacity: usize,
    entries: HashMap<SkinKey, CacheEntry>,
    /// Logical clock advanced on every access.
    clock: u64,
}

impl SkinCache {
    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Create a cache holding at most `capacity` skins.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            clock: 0,
        }
    }

    /// Fetch a skin, generating and caching it on first use.
    pub fn get(&mut self, category: MassCategory, size: u32, seed: u64) -> &SkinTexture {
        let key = SkinKey {
            category,
            size,
            seed,
        };
        self.clock += 1;
        if !self.entries.contains_key(&key) {
            self.evict_if_full();
        }

        let clock = self.clock;
        let entry = self.entries.entry(key).or_insert_with(|| CacheEntry {
            texture: generate_skin(category, size, seed),
            last_used: clock,
        });
        entry.last_used = clock;
        &entry.texture
    }

    /// Number of cached skins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_if_full(&mut self) {
        if self.entries.len() < self.capacity {
            return;
        }
        if let Some(oldest) = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone())
        {
            self.entries.remove(&oldest);
        }
    }
}

impl Default for SkinCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skin_dimensions() {
        let skin = generate_skin(MassCategory::Star, 32, 7);
        assert_eq!(skin.size, 32);
        assert_eq!(skin.pixels.len(), 32 * 32 * 4);
    }

    #[test]
    fn test_same_seed_same_skin() {
        let a = generate_skin(MassCategory::Pulsar, 16, 42);
        let b = generate_skin(MassCategory::Pulsar, 16, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = generate_skin(MassCategory::Pulsar, 16, 1);
        let b = generate_skin(MassCategory::Pulsar, 16, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_degenerate_size_falls_back_to_solid() {
        let skin = generate_skin(MassCategory::RedGiant, 0, 9);
        assert_eq!(skin.size, 1);
        assert_eq!(skin.pixels, vec![255, 68, 68, 255]);
    }

    #[test]
    fn test_cache_hit_returns_same_texture() {
        let mut cache = SkinCache::new();
        let first = cache.get(MassCategory::Star, 16, 5).clone();
        let second = cache.get(MassCategory::Star, 16, 5).clone();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_bounded_by_capacity() {
        let mut cache = SkinCache::with_capacity(4);
        for seed in 0..10 {
            cache.get(MassCategory::Star, 8, seed);
        }
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn test_lru_keeps_recently_used() {
        let mut cache = SkinCache::with_capacity(2);
        cache.get(MassCategory::Star, 8, 1);
        cache.get(MassCategory::Star, 8, 2);
        // Touch seed 1 so seed 2 becomes the eviction candidate.
        cache.get(MassCategory::Star, 8, 1);
        cache.get(MassCategory::Star, 8, 3);

        assert_eq!(cache.len(), 2);
        let len_before = cache.len();
        cache.get(MassCategory::Star, 8, 1);
        // Seed 1 was still cached, so no growth and no regeneration.
        assert_eq!(cache.len(), len_before);
    }
}
