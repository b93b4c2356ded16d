use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, bail};
use regex::Regex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::actor::reactor::Command;
use crate::actor::wm_controller::WmCmd;
use crate::layout_engine::{Direction, LayoutCommand};
use crate::model::desktop::Mode;
use crate::sys::hotkey::{ButtonBinding, Hotkey};

const MAX_DESKTOPS: usize = 32;

pub fn config_file() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("splitwm").join("config.toml"),
        None => PathBuf::from(".splitwm.toml"),
    }
}

/// An opaque RGB color, written as `#rrggbb` in the config.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub u32);

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').ok_or_else(|| anyhow!("color '{s}' must start with '#'"))?;
        if hex.len() != 6 {
            bail!("color '{s}' must have six hex digits");
        }
        Ok(Color(u32::from_str_radix(hex, 16).map_err(|e| anyhow!("color '{s}': {e}"))?))
    }
}

impl TryFrom<String> for Color {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

impl From<Color> for String {
    fn from(c: Color) -> String { c.to_string() }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "#{:06x}", self.0) }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusFormat {
    Off,
    #[default]
    Text,
    Json,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PanelPosition {
    #[default]
    Top,
    Bottom,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct ColorSettings {
    #[serde(default = "default_focused_color")]
    pub focused: Color,
    #[serde(default = "default_unfocused_color")]
    pub unfocused: Color,
    #[serde(default = "default_urgent_color")]
    pub urgent: Color,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            focused: default_focused_color(),
            unfocused: default_unfocused_color(),
            urgent: default_urgent_color(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct PanelSettings {
    /// Height of the strip kept free for a panel. Zero disables it.
    #[serde(default)]
    pub height: i32,
    #[serde(default)]
    pub position: PanelPosition,
    /// Reserve the strip on every monitor instead of only the first.
    #[serde(default)]
    pub all_monitors: bool,
}

impl PanelSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.height < 0 {
            issues.push(format!("panel height must be non-negative, got {}", self.height));
        }
        issues
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default = "default_desktops")]
    pub desktops: usize,
    #[serde(default)]
    pub default_mode: Mode,
    #[serde(default = "default_direction")]
    pub default_direction: Direction,
    #[serde(default = "default_gap")]
    pub gap: i32,
    #[serde(default)]
    pub min_gap: i32,
    #[serde(default = "default_max_gap")]
    pub max_gap: i32,
    #[serde(default = "default_gap_step")]
    pub gap_step: i32,
    /// Percentage points moved by `grow`/`shrink`.
    #[serde(default = "default_resize_step")]
    pub resize_step: i32,
    #[serde(default = "default_border_width")]
    pub border_width: i32,
    #[serde(default = "yes")]
    pub focus_follows_mouse: bool,
    #[serde(default = "yes")]
    pub click_to_focus: bool,
    /// Switch to the target desktop after `move_client_to_desktop`.
    #[serde(default)]
    pub follow_moved_client: bool,
    #[serde(default)]
    pub status_line: StatusFormat,
    #[serde(default)]
    pub colors: ColorSettings,
    #[serde(default)]
    pub panel: PanelSettings,
    #[serde(default)]
    pub run_on_start: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            desktops: default_desktops(),
            default_mode: Mode::default(),
            default_direction: default_direction(),
            gap: default_gap(),
            min_gap: 0,
            max_gap: default_max_gap(),
            gap_step: default_gap_step(),
            resize_step: default_resize_step(),
            border_width: default_border_width(),
            focus_follows_mouse: true,
            click_to_focus: true,
            follow_moved_client: false,
            status_line: StatusFormat::default(),
            colors: ColorSettings::default(),
            panel: PanelSettings::default(),
            run_on_start: Vec::new(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.desktops == 0 || self.desktops > MAX_DESKTOPS {
            issues.push(format!(
                "desktops must be between 1 and {MAX_DESKTOPS}, got {}",
                self.desktops
            ));
        }
        if self.min_gap < 0 {
            issues.push(format!("min_gap must be non-negative, got {}", self.min_gap));
        }
        if self.min_gap > self.max_gap {
            issues.push(format!(
                "min_gap ({}) must not exceed max_gap ({})",
                self.min_gap, self.max_gap
            ));
        }
        if self.gap < self.min_gap || self.gap > self.max_gap {
            issues.push(format!(
                "gap ({}) must lie between min_gap ({}) and max_gap ({})",
                self.gap, self.min_gap, self.max_gap
            ));
        }
        if self.gap_step <= 0 {
            issues.push(format!("gap_step must be positive, got {}", self.gap_step));
        }
        if !(1..=50).contains(&self.resize_step) {
            issues.push(format!(
                "resize_step must be between 1 and 50, got {}",
                self.resize_step
            ));
        }
        if self.border_width < 0 {
            issues.push(format!("border_width must be non-negative, got {}", self.border_width));
        }
        issues.extend(self.panel.validate());

        issues
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
struct AppRuleFile {
    class: Option<String>,
    title: Option<String>,
    desktop: Option<usize>,
    #[serde(default)]
    floating: bool,
    #[serde(default)]
    follow: bool,
}

/// Placement rule for windows whose `WM_CLASS` or title match.
#[derive(Debug, Clone)]
pub struct AppRule {
    pub class: Option<Regex>,
    pub title: Option<Regex>,
    /// Target desktop (0 based). If None, the window goes to the focused desktop.
    pub desktop: Option<usize>,
    pub floating: bool,
    /// Switch to the target desktop when a matching window appears.
    pub follow: bool,
}

impl AppRule {
    pub fn matches(&self, class: &str, title: &str) -> bool {
        self.class.as_ref().is_none_or(|re| re.is_match(class))
            && self.title.as_ref().is_none_or(|re| re.is_match(title))
    }
}

impl TryFrom<AppRuleFile> for AppRule {
    type Error = anyhow::Error;

    fn try_from(rule: AppRuleFile) -> anyhow::Result<AppRule> {
        if rule.class.is_none() && rule.title.is_none() {
            bail!("app rule needs a class or a title pattern");
        }
        let compile = |pattern: Option<String>| -> anyhow::Result<Option<Regex>> {
            pattern
                .map(|p| Regex::new(&p).map_err(|e| anyhow!("bad pattern '{p}': {e}")))
                .transpose()
        };
        Ok(AppRule {
            class: compile(rule.class)?,
            title: compile(rule.title)?,
            desktop: rule.desktop,
            floating: rule.floating,
            follow: rule.follow,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    settings: Settings,
    #[serde(default)]
    keys: FxHashMap<String, Command>,
    #[serde(default)]
    buttons: FxHashMap<String, Command>,
    #[serde(default)]
    modifier_combinations: FxHashMap<String, String>,
    #[serde(default)]
    app_rules: Vec<AppRuleFile>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    pub keys: Vec<(Hotkey, Command)>,
    pub buttons: Vec<(ButtonBinding, Command)>,
    pub app_rules: Vec<AppRule>,
}

fn yes() -> bool { true }
fn default_desktops() -> usize { 9 }
fn default_direction() -> Direction { Direction::Right }
fn default_gap() -> i32 { 8 }
fn default_max_gap() -> i32 { 64 }
fn default_gap_step() -> i32 { 2 }
fn default_resize_step() -> i32 { 5 }
fn default_border_width() -> i32 { 2 }
fn default_focused_color() -> Color { Color(0x4c7899) }
fn default_unfocused_color() -> Color { Color(0x333333) }
fn default_urgent_color() -> Color { Color(0xd64937) }

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)?;
        Self::parse(&buf)
    }

    pub fn default() -> Config {
        Self::parse(include_str!("../../splitwm.default.toml")).unwrap()
    }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = self.settings.validate();
        let desktops = self.settings.desktops;

        for (index, rule) in self.app_rules.iter().enumerate() {
            if let Some(desktop) = rule.desktop {
                if desktop >= desktops {
                    issues.push(format!(
                        "App rule {index} references desktop {desktop} but only {desktops} exist"
                    ));
                }
            }
        }

        let bindings = self
            .keys
            .iter()
            .map(|(k, c)| (k.to_string(), c))
            .chain(self.buttons.iter().map(|(b, c)| (b.to_string(), c)));
        for (binding, command) in bindings {
            if let Some(desktop) = command.desktop_argument() {
                if desktop >= desktops {
                    issues.push(format!(
                        "Binding '{binding}' references desktop {desktop} but only {desktops} exist"
                    ));
                }
            }
            if let Command::Wm(WmCmd::Exec(cmd)) = command {
                if cmd.as_array().is_empty() {
                    issues.push(format!("Binding '{binding}' has an empty exec command"));
                }
            }
        }

        issues
    }

    /// First rule matching the window, if any.
    pub fn find_app_rule(&self, class: &str, title: &str) -> Option<&AppRule> {
        self.app_rules.iter().find(|rule| rule.matches(class, title))
    }

    pub fn command_for_key(&self, hotkey: &Hotkey) -> Option<&Command> {
        self.keys.iter().find(|(k, _)| k == hotkey).map(|(_, c)| c)
    }

    pub fn command_for_button(&self, binding: &ButtonBinding) -> Option<&Command> {
        self.buttons.iter().find(|(b, _)| b == binding).map(|(_, c)| c)
    }

    fn expand_modifier_combinations(key: &str, combinations: &FxHashMap<String, String>) -> String {
        if let Some(plus_pos) = key.find(" + ") {
            let potential_combo = &key[..plus_pos];
            if let Some(combo_value) = combinations.get(potential_combo) {
                let rest = &key[plus_pos + 3..];
                return format!("{} + {}", combo_value, rest);
            }
        }
        key.to_string()
    }

    fn parse(buf: &str) -> anyhow::Result<Config> {
        let c: ConfigFile = toml::from_str(buf)?;
        let mut keys = Vec::new();
        for (key, cmd) in c.keys {
            let expanded = Self::expand_modifier_combinations(&key, &c.modifier_combinations);
            let Ok(hotkey) = Hotkey::from_str(&expanded) else {
                bail!("Could not parse hotkey: {key}");
            };
            keys.push((hotkey, cmd));
        }
        let mut buttons = Vec::new();
        for (button, cmd) in c.buttons {
            let expanded = Self::expand_modifier_combinations(&button, &c.modifier_combinations);
            let Ok(binding) = ButtonBinding::from_str(&expanded) else {
                bail!("Could not parse button binding: {button}");
            };
            buttons.push((binding, cmd));
        }
        let app_rules = c
            .app_rules
            .into_iter()
            .enumerate()
            .map(|(i, rule)| AppRule::try_from(rule).map_err(|e| anyhow!("App rule {i}: {e}")))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Config {
            settings: c.settings,
            keys,
            buttons,
            app_rules,
        })
    }
}

impl Command {
    fn desktop_argument(&self) -> Option<usize> {
        match self {
            Command::Layout(
                LayoutCommand::SwitchDesktop(d)
                | LayoutCommand::MoveClientToDesktop(d)
                | LayoutCommand::FollowClientToDesktop(d),
            ) => Some(*d),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::actor::wm_controller::ExecCmd;
    use crate::sys::hotkey::{KeySym, Modifiers};

    #[test]
    fn default_config_parses() {
        let config = Config::default();
        assert_eq!(config.validate(), Vec::<String>::new());
        assert!(!config.keys.is_empty());
    }

    #[test]
    fn test_expand_modifier_combinations() {
        let mut combinations = FxHashMap::default();
        combinations.insert("mod".to_string(), "Super".to_string());
        combinations.insert("leader".to_string(), "Super + Shift".to_string());

        assert_eq!(Config::expand_modifier_combinations("mod + C", &combinations), "Super + C");
        assert_eq!(
            Config::expand_modifier_combinations("leader + Tab", &combinations),
            "Super + Shift + Tab"
        );
        assert_eq!(Config::expand_modifier_combinations("Alt + H", &combinations), "Alt + H");
        assert_eq!(
            Config::expand_modifier_combinations("unknown + X", &combinations),
            "unknown + X"
        );
    }

    #[test]
    fn parses_bindings_and_rules() {
        let config = Config::parse(
            r##"
            [settings]
            desktops = 4
            gap = 0

            [settings.colors]
            focused = "#ff0000"

            [modifier_combinations]
            mod = "Super"

            [keys]
            "mod + 2" = { switch_desktop = 1 }
            "mod + Shift + Return" = { exec = ["xterm", "-e", "top"] }
            "mod + Q" = "quit"
            "mod + L" = { grow = "right" }

            [buttons]
            "mod + Button2" = "toggle_floating"

            [[app_rules]]
            class = "^(Gimp|Inkscape)$"
            desktop = 3
            floating = true
            "##,
        )
        .unwrap();

        assert_eq!(config.settings.colors.focused, Color(0xff0000));
        assert_eq!(config.settings.colors.unfocused, default_unfocused_color());
        assert_eq!(
            config.command_for_key(&"Super + 2".parse().unwrap()),
            Some(&Command::Layout(LayoutCommand::SwitchDesktop(1)))
        );
        assert_eq!(
            config.command_for_key(&Hotkey::new(Modifiers::SUPER | Modifiers::SHIFT, KeySym(0xff0d))),
            Some(&Command::Wm(WmCmd::Exec(ExecCmd::Array(vec![
                "xterm".into(),
                "-e".into(),
                "top".into()
            ]))))
        );
        assert_eq!(
            config.command_for_key(&"Super + Q".parse().unwrap()),
            Some(&Command::Wm(WmCmd::Quit))
        );
        assert_eq!(
            config.command_for_key(&"Super + L".parse().unwrap()),
            Some(&Command::Layout(LayoutCommand::Grow(Direction::Right)))
        );
        assert_eq!(
            config.command_for_button(&"Super + Button2".parse().unwrap()),
            Some(&Command::Layout(LayoutCommand::ToggleFloating))
        );

        let rule = config.find_app_rule("Gimp", "GNU Image Manipulation Program").unwrap();
        assert_eq!((rule.desktop, rule.floating), (Some(3), true));
        assert!(config.find_app_rule("Gimp-2.10", "").is_none());
        assert_eq!(config.validate(), Vec::<String>::new());
    }

    #[test]
    fn bad_configs_are_rejected() {
        assert!(Config::parse("[keys]\n\"Super + Nope\" = \"quit\"").is_err());
        assert!(Config::parse("[settings.colors]\nurgent = \"red\"").is_err());
        assert!(Config::parse("[settings]\nanimate = true").is_err());
        assert!(Config::parse("[[app_rules]]\nclass = \"(\"").is_err());
        assert!(Config::parse("[[app_rules]]\nfloating = true").is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_empty());

        config.settings.gap = 500;
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("must lie between min_gap"));

        config.settings.gap = 4;
        config.settings.desktops = 2;
        config.keys.push((
            "Super + F9".parse().unwrap(),
            Command::Layout(LayoutCommand::SwitchDesktop(5)),
        ));
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("references desktop 5")));
    }

    #[test]
    fn reads_config_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[settings]\nborder_width = 5").unwrap();
        let config = Config::read(file.path()).unwrap();
        assert_eq!(config.settings.border_width, 5);
        assert!(Config::read(Path::new("/nonexistent/splitwm.toml")).is_err());
    }
}
