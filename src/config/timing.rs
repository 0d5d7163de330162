//! Animation cadence.
//!
//! Every category animates on its own interval. The scene compares elapsed
//! time against these values independently, so there is no central frame
//! clock.

/// Tunable timing for the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneConfig {
    /// Cloud drift interval (ms).
    pub cloud_tick_ms: u32,
    /// Rain fall interval (ms).
    pub rain_tick_ms: u32,
    /// Snow fall interval (ms).
    pub snow_tick_ms: u32,
    /// Smoke particle interval (ms).
    pub smoke_tick_ms: u32,
    /// Shortest gap between two smoke spawns (ms).
    pub smoke_spawn_min_ms: u32,
    /// Longest gap between two smoke spawns (ms).
    pub smoke_spawn_max_ms: u32,
    /// Ghost float interval (ms).
    pub ghost_tick_ms: u32,
    /// Birds, butterflies, bees and fireflies (ms).
    pub fauna_tick_ms: u32,
    /// Firework rockets (ms).
    pub firework_tick_ms: u32,
    /// Media text scroll step (ms).
    pub media_scroll_ms: u32,
}

impl SceneConfig {
    /// Stock timing.
    pub const DEFAULT: Self = Self {
        cloud_tick_ms: 150,
        rain_tick_ms: 100,
        snow_tick_ms: 120,
        smoke_tick_ms: 100,
        smoke_spawn_min_ms: 700,
        smoke_spawn_max_ms: 1000,
        ghost_tick_ms: 80,
        fauna_tick_ms: 50,
        firework_tick_ms: 120,
        media_scroll_ms: 150,
    };

    /// Pseudo-random gap before the next smoke spawn, inside
    /// `smoke_spawn_min_ms..=smoke_spawn_max_ms`.
    pub const fn smoke_spawn_interval(
        &self,
        now_ms: u32,
    ) -> u32 {
        let span = self.smoke_spawn_max_ms.saturating_sub(self.smoke_spawn_min_ms) + 1;
        self.smoke_spawn_min_ms + now_ms.wrapping_mul(13).wrapping_add(7) % span
    }
}

impl Default for SceneConfig {
    fn default() -> Self { Self::DEFAULT }
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================
