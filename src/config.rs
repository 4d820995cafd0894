//! Game balance configuration
//!
//! Defaults come from [`crate::consts`]. Overrides are read from
//! `config.json` in the platform config dir (native) or the `aerobot_config`
//! LocalStorage key (web). Any field may be omitted.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable game parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Largest step the simulation will take (seconds)
    pub max_dt: f32,

    // === Scoring ===
    pub score_rate: f64,
    pub coin_bonus: u64,
    pub powerup_bonus: u64,

    // === World motion ===
    pub scroll_speed_frac: f32,
    pub scroll_acceleration: f32,

    // === Player ===
    pub player_radius_frac: f32,
    pub player_speed_frac: f32,
    pub player_y_frac: f32,
    pub tilt_deg: f32,
    pub tilt_response: f32,

    // === Walls ===
    pub wall_width_frac: f32,
    pub wall_texture_period: f32,

    // === Spawning ===
    pub obstacle_spawn_ms: f32,
    pub obstacle_spawn_min_ms: f32,
    pub obstacle_spawn_speed_factor: f32,
    pub item_spawn_ms: f32,
    pub obstacle_size_frac: f32,
    pub item_size_frac: f32,
    pub spawn_margin: f32,
    pub cull_margin: f32,
    pub entity_spin: f32,

    // === Effects ===
    pub wall_burst: usize,
    pub obstacle_burst: usize,
    pub pickup_burst: usize,
    pub particle_spread: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_dt: MAX_DT,

            score_rate: SCORE_RATE,
            coin_bonus: COIN_BONUS,
            powerup_bonus: POWERUP_BONUS,

            scroll_speed_frac: SCROLL_SPEED_FRAC,
            scroll_acceleration: SCROLL_ACCELERATION,

            player_radius_frac: PLAYER_RADIUS_FRAC,
            player_speed_frac: PLAYER_SPEED_FRAC,
            player_y_frac: PLAYER_Y_FRAC,
            tilt_deg: PLAYER_TILT_DEG,
            tilt_response: PLAYER_TILT_RESPONSE,

            wall_width_frac: WALL_WIDTH_FRAC,
            wall_texture_period: WALL_TEXTURE_PERIOD,

            obstacle_spawn_ms: OBSTACLE_SPAWN_MS,
            obstacle_spawn_min_ms: OBSTACLE_SPAWN_MIN_MS,
            obstacle_spawn_speed_factor: OBSTACLE_SPAWN_SPEED_FACTOR,
            item_spawn_ms: ITEM_SPAWN_MS,
            obstacle_size_frac: OBSTACLE_SIZE_FRAC,
            item_size_frac: ITEM_SIZE_FRAC,
            spawn_margin: SPAWN_MARGIN,
            cull_margin: CULL_MARGIN,
            entity_spin: ENTITY_SPIN,

            wall_burst: WALL_BURST,
            obstacle_burst: OBSTACLE_BURST,
            pickup_burst: PICKUP_BURST,
            particle_spread: PARTICLE_SPREAD,
        }
    }
}

/// `value` if it is finite and strictly positive, otherwise `fallback`
fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 { value } else { fallback }
}

/// `value` if it is finite and not negative, otherwise `fallback`
fn non_negative_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value >= 0.0 { value } else { fallback }
}

impl GameConfig {
    /// Replace nonsensical overrides with defaults.
    ///
    /// Rates, intervals and sizes must be positive; margins and tuning
    /// factors may be zero. Two walls must leave room for play.
    pub fn validated(mut self) -> Self {
        let d = Self::default();

        self.max_dt = positive_or(self.max_dt, d.max_dt);
        if !self.score_rate.is_finite() || self.score_rate < 0.0 {
            self.score_rate = d.score_rate;
        }

        self.scroll_speed_frac = positive_or(self.scroll_speed_frac, d.scroll_speed_frac);
        self.scroll_acceleration = non_negative_or(self.scroll_acceleration, d.scroll_acceleration);

        self.player_radius_frac = positive_or(self.player_radius_frac, d.player_radius_frac);
        self.player_speed_frac = positive_or(self.player_speed_frac, d.player_speed_frac);
        self.player_y_frac = positive_or(self.player_y_frac, d.player_y_frac).min(1.0);
        self.tilt_deg = non_negative_or(self.tilt_deg, d.tilt_deg);
        self.tilt_response = non_negative_or(self.tilt_response, d.tilt_response);

        self.wall_width_frac = non_negative_or(self.wall_width_frac, d.wall_width_frac);
        if self.wall_width_frac >= 0.5 {
            self.wall_width_frac = d.wall_width_frac;
        }
        self.wall_texture_period = positive_or(self.wall_texture_period, d.wall_texture_period);

        self.obstacle_spawn_ms = positive_or(self.obstacle_spawn_ms, d.obstacle_spawn_ms);
        self.obstacle_spawn_min_ms =
            positive_or(self.obstacle_spawn_min_ms, d.obstacle_spawn_min_ms);
        self.obstacle_spawn_speed_factor =
            non_negative_or(self.obstacle_spawn_speed_factor, d.obstacle_spawn_speed_factor);
        self.item_spawn_ms = positive_or(self.item_spawn_ms, d.item_spawn_ms);
        self.obstacle_size_frac = positive_or(self.obstacle_size_frac, d.obstacle_size_frac);
        self.item_size_frac = positive_or(self.item_size_frac, d.item_size_frac);
        self.spawn_margin = non_negative_or(self.spawn_margin, d.spawn_margin);
        self.cull_margin = non_negative_or(self.cull_margin, d.cull_margin);
        self.entity_spin = if self.entity_spin.is_finite() { self.entity_spin } else { d.entity_spin };

        self.particle_spread = non_negative_or(self.particle_spread, d.particle_spread);

        self
    }

    /// Parse a JSON override document on top of the defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Self>(json).map(Self::validated)
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "aerobot_config";

    /// Load config overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config overrides from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring malformed config overrides: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Load config overrides from `<config dir>/aerobot/config.json`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Some(path) = dirs::config_dir().map(|d| d.join("aerobot").join("config.json")) else {
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config overrides from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring malformed config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    // === Derived, size-relative quantities ===

    /// Width of one side wall in pixels
    #[inline]
    pub fn wall_width(&self, area_width: f32) -> f32 {
        area_width * self.wall_width_frac
    }

    /// Current obstacle interval (ms) for the given scroll speed
    pub fn obstacle_interval_ms(&self, scroll_speed: f32) -> f32 {
        (self.obstacle_spawn_ms - scroll_speed * self.obstacle_spawn_speed_factor)
            .max(self.obstacle_spawn_min_ms)
    }

    /// Target tilt (radians) for a heading of +1 or -1
    #[inline]
    pub fn target_tilt(&self, direction: f32) -> f32 {
        direction * self.tilt_deg.to_radians()
    }
}

/// Game palette (sRGB, straight alpha)
pub mod palette {
    /// `0xRRGGBB` to RGBA
    pub const fn rgb(hex: u32) -> [f32; 4] {
        [
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
            1.0,
        ]
    }

    /// Same color with a different alpha
    pub const fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], alpha]
    }

    pub const BG_SAND: [f32; 4] = rgb(0xe6c288);
    pub const BG_SAND_DARK: [f32; 4] = rgb(0xdcb170);
    pub const WALL: [f32; 4] = rgb(0x5d4037);
    pub const WALL_PATTERN: [f32; 4] = rgb(0x4e342e);
    pub const PLAYER: [f32; 4] = rgb(0x607d8b);
    pub const PLAYER_ACCENT: [f32; 4] = rgb(0x00bcd4);
    pub const OBSTACLE: [f32; 4] = rgb(0x795548);
    pub const OBSTACLE_HIGHLIGHT: [f32; 4] = rgb(0x8d6e63);
    /// Puzzle piece
    pub const COIN: [f32; 4] = rgb(0xffc107);
    /// Hourglass
    pub const POWERUP: [f32; 4] = rgb(0x00bcd4);
    pub const VISOR: [f32; 4] = rgb(0x222222);
    pub const ANTENNA: [f32; 4] = rgb(0x555555);
    pub const ANTENNA_TIP: [f32; 4] = rgb(0xff0000);
    pub const WHITE: [f32; 4] = rgb(0xffffff);
    pub const SHADOW: [f32; 4] = [0.0, 0.0, 0.0, 0.2];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "coin_bonus": 250 }"#).unwrap();
        assert_eq!(config.coin_bonus, 250);
        assert_eq!(config.powerup_bonus, POWERUP_BONUS);
        assert_eq!(config.max_dt, MAX_DT);
    }

    #[test]
    fn test_validated_rejects_nonsense() {
        let config = GameConfig::from_json(
            r#"{ "max_dt": -1.0, "item_spawn_ms": 0.0, "wall_width_frac": 0.7 }"#,
        )
        .unwrap();
        assert_eq!(config.max_dt, MAX_DT);
        assert_eq!(config.item_spawn_ms, ITEM_SPAWN_MS);
        assert_eq!(config.wall_width_frac, WALL_WIDTH_FRAC);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(GameConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_obstacle_interval_is_floored() {
        let config = GameConfig::default();
        assert_eq!(config.obstacle_interval_ms(0.0), 1500.0);
        assert_eq!(config.obstacle_interval_ms(400.0), 1300.0);
        assert_eq!(config.obstacle_interval_ms(10_000.0), 500.0);
    }

    #[test]
    fn test_palette_hex() {
        assert_eq!(palette::rgb(0xff0000), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(palette::with_alpha(palette::WHITE, 0.5)[3], 0.5);
    }
}
