//! Display and layout configuration constants.
//!
//! The panel is a 135x240 portrait ST7789. The upper [`SCENE_HEIGHT`] rows hold
//! the animated scene; everything below belongs to the status widgets and is
//! never touched by sprites.
//!
//! # Optimization: Pre-computed Layout Constants
//!
//! Edge coordinates are pre-computed as `i16` so drawing code can compare
//! against them without casts.

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels (ST7789 1.14" panel: 135x240)
pub const SCREEN_WIDTH: usize = 135;

/// Display height in pixels
pub const SCREEN_HEIGHT: usize = 240;

/// Number of pixels in one full buffer.
pub const PIXEL_COUNT: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

/// Rightmost column as a drawing coordinate.
pub const MAX_X: i16 = SCREEN_WIDTH as i16 - 1;

/// Bottom row as a drawing coordinate.
pub const MAX_Y: i16 = SCREEN_HEIGHT as i16 - 1;

/// Column offset of the visible window inside the controller RAM (240x320).
pub const PANEL_X_OFFSET: u16 = 52;

/// Row offset of the visible window inside the controller RAM.
pub const PANEL_Y_OFFSET: u16 = 40;

// =============================================================================
// Scene Region
// =============================================================================

/// Height of the animated scene region (rows `0..SCENE_HEIGHT`).
pub const SCENE_HEIGHT: usize = 155;

/// Last row of the scene region.
pub const SCENE_BOTTOM: i16 = SCENE_HEIGHT as i16 - 1;

/// Ground line. Raindrops and snowflakes respawn once they reach it.
pub const GROUND_Y: i16 = 150;

/// Sprites are culled when their bounds leave this horizontal band.
pub const CULL_LEFT: i16 = -30;

/// Right edge of the culling band.
pub const CULL_RIGHT: i16 = 165;

// =============================================================================
// Static Scenery Anchors
// =============================================================================

/// Tree trunk centres.
pub const TREE_X: [i16; 2] = [30, 67];

/// Cabin centre (the cabin stands on the ground line).
pub const CABIN_X: i16 = 105;

/// Cabin wall height.
pub const CABIN_HEIGHT: i16 = 18;

/// Roof height above the walls.
pub const ROOF_HEIGHT: i16 = 10;

/// Chimney width and height.
pub const CHIMNEY_WIDTH: i16 = 4;
pub const CHIMNEY_HEIGHT: i16 = 8;

/// Smoke origin: centre of the chimney opening.
pub const CHIMNEY_X: i16 = CABIN_X + 5 + CHIMNEY_WIDTH / 2;

/// Smoke origin row, slightly inside the chimney.
pub const CHIMNEY_TOP_Y: i16 = GROUND_Y - CABIN_HEIGHT - ROOF_HEIGHT - CHIMNEY_HEIGHT + 2;

/// Smoke puffs vanish above this row.
pub const SMOKE_CEILING_Y: i16 = 75;

// =============================================================================
// Status Widgets (below the scene)
// =============================================================================

/// Date line top row.
pub const DATE_Y: i16 = 157;

/// Clock top row.
pub const CLOCK_Y: i16 = 180;

/// Media text band top row and height.
pub const MEDIA_Y: i16 = 207;
pub const MEDIA_HEIGHT: i16 = 23;

/// Volume bar outline.
pub const VOLUME_X1: i16 = 5;
pub const VOLUME_Y1: i16 = 233;
pub const VOLUME_X2: i16 = 127;
pub const VOLUME_Y2: i16 = 238;

/// Volume fill width at 100%.
pub const VOLUME_FILL_WIDTH: i16 = 120;
