//! Application configuration.
//!
//! - `layout`: Panel dimensions, scene regions and pre-computed anchors
//! - `timing`: Per-category tick intervals and spawn windows

pub mod layout;
pub mod timing;

// Re-export layout constants at config level for convenience
pub use layout::{
    GROUND_Y,
    MAX_X,
    MAX_Y,
    PIXEL_COUNT,
    SCENE_BOTTOM,
    SCENE_HEIGHT,
    SCREEN_HEIGHT,
    SCREEN_WIDTH,
};
pub use timing::SceneConfig;
