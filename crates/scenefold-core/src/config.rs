use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccordionConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub snap: SnapConfig,
    #[serde(default)]
    pub footer: FooterConfig,
    #[serde(default)]
    pub drawer: DrawerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// How a released gesture is settled to 0 or 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapStrategy {
    /// Momentum events are reliable: snap on drag-end unless momentum follows,
    /// otherwise snap on momentum-end
    Momentum,
    /// Momentum events are unreliable: every drag-end asks the logic thread
    /// for a snap after `delayed_snap_ms`
    Delayed,
}

/// Easing curve for snap animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    None,
    Linear,
    Cubic,
    Quintic,
    EaseOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapConfig {
    #[serde(default = "default_strategy")]
    pub strategy: SnapStrategy,
    /// Duration of the snap animation in milliseconds
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    /// Delay before the logic thread settles a released drag (delayed strategy)
    #[serde(default = "default_delayed_snap")]
    pub delayed_snap_ms: u64,
    #[serde(default = "default_easing")]
    pub easing: EasingType,
    /// Ratio a drag must pass while opening from closed before it snaps open
    #[serde(default = "default_open_threshold")]
    pub open_threshold: f64,
    /// Ratio a drag must fall below while closing from open before it snaps shut
    #[serde(default = "default_close_threshold")]
    pub close_threshold: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            animation_duration_ms: default_animation_duration(),
            delayed_snap_ms: default_delayed_snap(),
            easing: default_easing(),
            open_threshold: default_open_threshold(),
            close_threshold: default_close_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FooterConfig {
    /// Scroll distance that moves the footer across the whole [0, 1] range
    #[serde(default = "default_scroll_distance")]
    pub scroll_distance: f64,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            scroll_distance: default_scroll_distance(),
        }
    }
}

/// Theme constants for the tab-bar drawer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawerConfig {
    /// Visible height when fully collapsed
    #[serde(default = "default_drawer_min_height")]
    pub min_height: f64,
    /// Visible height when fully expanded
    #[serde(default = "default_drawer_max_height")]
    pub max_height: f64,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            min_height: default_drawer_min_height(),
            max_height: default_drawer_max_height(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate while an accordion is animating
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_strategy() -> SnapStrategy {
    SnapStrategy::Momentum
}

fn default_animation_duration() -> u64 {
    300
}

fn default_delayed_snap() -> u64 {
    300
}

fn default_easing() -> EasingType {
    EasingType::Cubic
}

fn default_open_threshold() -> f64 {
    0.3
}

fn default_close_threshold() -> f64 {
    0.7
}

fn default_scroll_distance() -> f64 {
    100.0
}

fn default_drawer_min_height() -> f64 {
    2.0
}

fn default_drawer_max_height() -> f64 {
    4.0
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

impl AccordionConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, defaults if it does not exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get the configuration file path
    /// Always uses ~/.config/scenefold/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("scenefold")
            .join("config.toml")
    }

    fn validate(&self) -> crate::Result<()> {
        let snap = &self.snap;
        if !(0.0..=1.0).contains(&snap.open_threshold) || !(0.0..=1.0).contains(&snap.close_threshold) {
            return Err(crate::Error::Config(format!(
                "snap thresholds must lie in [0, 1] (open = {}, close = {})",
                snap.open_threshold, snap.close_threshold
            )));
        }
        if snap.open_threshold >= snap.close_threshold {
            return Err(crate::Error::Config(format!(
                "snap.open_threshold ({}) must be below snap.close_threshold ({})",
                snap.open_threshold, snap.close_threshold
            )));
        }
        if self.footer.scroll_distance <= 0.0 {
            return Err(crate::Error::Config(format!(
                "footer.scroll_distance must be positive, got {}",
                self.footer.scroll_distance
            )));
        }
        if self.drawer.min_height > self.drawer.max_height {
            return Err(crate::Error::Config(format!(
                "drawer.min_height ({}) exceeds drawer.max_height ({})",
                self.drawer.min_height, self.drawer.max_height
            )));
        }
        Ok(())
    }
}
