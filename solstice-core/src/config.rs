use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use solstice_types::ScrollDirection;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

const MIN_SCROLL_SPEED: u8 = 1;
const MAX_SCROLL_SPEED: u8 = 10;

#[derive(Serialize, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    editor: EditorConfig,
    #[serde(default)]
    gameplay: GameplayConfig,
}

#[derive(Serialize, Deserialize, Default)]
struct EditorConfig {
    scroll_direction_4k: Option<String>,
    scroll_direction_7k: Option<String>,
    scroll_speed: Option<u8>,
}

#[derive(Serialize, Deserialize, Default)]
struct GameplayConfig {
    smooth_audio_timing: Option<bool>,
}

/// Resolved editor settings. The scroll direction toggle writes back through
/// [`Config::save`], so a flipped direction survives restarts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub scroll_direction_4k: ScrollDirection,
    pub scroll_direction_7k: ScrollDirection,
    /// Editor playfield scroll speed, clamped to 1..=10.
    pub scroll_speed: u8,
    pub smooth_audio_timing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scroll_direction_4k: ScrollDirection::Down,
            scroll_direction_7k: ScrollDirection::Down,
            scroll_speed: 4,
            smooth_audio_timing: true,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(user_config_path().as_deref())
    }

    pub fn load_from(path: Option<&Path>) -> Self {
        let mut base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");

        if let Some(path) = path {
            if path.exists() {
                match std::fs::read_to_string(path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => {
                            merge_editor(&mut base.editor, user.editor);
                            merge_gameplay(&mut base.gameplay, user.gameplay);
                        }
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        let fallback = Config::default();
        Config {
            scroll_direction_4k: base
                .editor
                .scroll_direction_4k
                .as_deref()
                .and_then(parse_scroll_direction)
                .unwrap_or(fallback.scroll_direction_4k),
            scroll_direction_7k: base
                .editor
                .scroll_direction_7k
                .as_deref()
                .and_then(parse_scroll_direction)
                .unwrap_or(fallback.scroll_direction_7k),
            scroll_speed: base
                .editor
                .scroll_speed
                .unwrap_or(fallback.scroll_speed)
                .clamp(MIN_SCROLL_SPEED, MAX_SCROLL_SPEED),
            smooth_audio_timing: base
                .gameplay
                .smooth_audio_timing
                .unwrap_or(fallback.smooth_audio_timing),
        }
    }

    pub fn save(&self) -> std::io::Result<()> {
        match user_config_path() {
            Some(path) => self.save_to(&path),
            None => Ok(()),
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = ConfigFile {
            editor: EditorConfig {
                scroll_direction_4k: Some(scroll_direction_name(self.scroll_direction_4k).into()),
                scroll_direction_7k: Some(scroll_direction_name(self.scroll_direction_7k).into()),
                scroll_speed: Some(self.scroll_speed),
            },
            gameplay: GameplayConfig {
                smooth_audio_timing: Some(self.smooth_audio_timing),
            },
        };
        let contents = toml::to_string_pretty(&file)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, contents)
    }

    /// Nudge the scroll speed, clamping at the bounds. Returns the new value.
    pub fn adjust_scroll_speed(&mut self, delta: i8) -> u8 {
        let adjusted = self.scroll_speed.saturating_add_signed(delta);
        self.scroll_speed = adjusted.clamp(MIN_SCROLL_SPEED, MAX_SCROLL_SPEED);
        self.scroll_speed
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("solstice").join("config.toml"))
}

fn merge_editor(base: &mut EditorConfig, user: EditorConfig) {
    if user.scroll_direction_4k.is_some() {
        base.scroll_direction_4k = user.scroll_direction_4k;
    }
    if user.scroll_direction_7k.is_some() {
        base.scroll_direction_7k = user.scroll_direction_7k;
    }
    if user.scroll_speed.is_some() {
        base.scroll_speed = user.scroll_speed;
    }
}

fn merge_gameplay(base: &mut GameplayConfig, user: GameplayConfig) {
    if user.smooth_audio_timing.is_some() {
        base.smooth_audio_timing = user.smooth_audio_timing;
    }
}

fn parse_scroll_direction(s: &str) -> Option<ScrollDirection> {
    match s.to_lowercase().as_str() {
        "down" => Some(ScrollDirection::Down),
        "up" => Some(ScrollDirection::Up),
        "split" => Some(ScrollDirection::Split),
        _ => None,
    }
}

fn scroll_direction_name(direction: ScrollDirection) -> &'static str {
    match direction {
        ScrollDirection::Down => "down",
        ScrollDirection::Up => "up",
        ScrollDirection::Split => "split",
    }
}
