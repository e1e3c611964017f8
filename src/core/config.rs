//! Mod options with documented defaults
//!
//! Options are read from `PostMortemPossession_options.json` next to the
//! module. Loading never fails: every unreadable key keeps its default and
//! adds a warning, and the warnings are shown together once the UI is up.

use std::path::Path;

use serde_json::{json, Value};

use crate::core::error::{PossessionError, Result};
use crate::core::types::Rgb;
use crate::possession::category::CATEGORY_COUNT;
use crate::possession::input::{Key, Keymap};
use crate::possession::priority::PriorityTable;

pub const OPTIONS_FILE_NAME: &str = "PostMortemPossession_options.json";

pub const DEFAULT_MESSAGE_COLOR: Rgb = Rgb::new(128, 128, 128);
pub const DEFAULT_ERROR_COLOR: Rgb = Rgb::new(128, 0, 0);

/// Everything the options file controls
#[derive(Debug, Clone, PartialEq)]
pub struct PossessionConfig {
    /// Allow possessing units of allied (non-player) teams
    ///
    /// Applies to both the spectated-unit hotkey and the automatic search,
    /// which then falls back to the allied team's formation of a category.
    pub allow_control_allies: bool,

    /// Hand formations and the order controller to the possessed unit
    pub allow_control_formations: bool,

    /// Hide runtime fault notices (informational notices are unaffected)
    pub mute_exceptions: bool,

    /// Show informational notices and startup warnings
    pub verbose: bool,

    /// `hotKey` and `autoSelectPriorityHotKey`
    pub keymap: Keymap,

    pub message_color: Rgb,
    pub error_color: Rgb,

    /// `autoSelectPriority`, one weight per unit category
    pub priorities: PriorityTable,

    /// `autoSelectRandomWithinPriority`: shuffle categories of equal weight
    pub randomize_within_priority: bool,
}

impl Default for PossessionConfig {
    fn default() -> Self {
        Self {
            allow_control_allies: false,
            allow_control_formations: true,
            mute_exceptions: false,
            verbose: true,
            keymap: Keymap::default(),
            message_color: DEFAULT_MESSAGE_COLOR,
            error_color: DEFAULT_ERROR_COLOR,
            priorities: PriorityTable::default(),
            randomize_within_priority: false,
        }
    }
}

/// Result of loading: usable options plus warnings for the player
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: PossessionConfig,
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// All warnings as one message, `None` when loading was clean
    pub fn batched_warnings(&self) -> Option<String> {
        if self.warnings.is_empty() {
            None
        } else {
            Some(self.warnings.join("\n"))
        }
    }
}

impl PossessionConfig {
    /// Load an options file; `.toml` files are read as TOML, anything else as JSON
    pub fn load(path: &Path) -> LoadedConfig {
        if !path.is_file() {
            tracing::warn!("Options file missing: {}", path.display());
            return LoadedConfig {
                config: Self::default(),
                warnings: vec![format!(
                    "Unable to open (or find) options file: {}",
                    path.display()
                )],
            };
        }

        match read_document(path) {
            Ok(document) => Self::from_document(&document),
            Err(e) => unreadable(e),
        }
    }

    pub fn from_json_str(contents: &str) -> LoadedConfig {
        match serde_json::from_str::<Value>(contents) {
            Ok(document) => Self::from_document(&document),
            Err(e) => unreadable(e.into()),
        }
    }

    pub fn from_toml_str(contents: &str) -> LoadedConfig {
        match toml::from_str::<Value>(contents) {
            Ok(document) => Self::from_document(&document),
            Err(e) => unreadable(e.into()),
        }
    }

    /// Read each option independently from a parsed document
    pub fn from_document(document: &Value) -> LoadedConfig {
        let mut config = Self::default();
        let mut warnings = Vec::new();

        let Some(fields) = document.as_object() else {
            warnings.push("Unable to read content of options file: 'not an object'".to_string());
            return LoadedConfig { config, warnings };
        };

        let mut read_bool = |key: &str, target: &mut bool| match fields.get(key) {
            Some(Value::Bool(value)) => *target = *value,
            _ => warnings.push(format!(
                "Could not read '{}'. Using default value '{}' instead",
                key, target
            )),
        };
        read_bool("allowControlAllies", &mut config.allow_control_allies);
        read_bool("allowControlFormations", &mut config.allow_control_formations);
        read_bool("muteExceptions", &mut config.mute_exceptions);
        read_bool("verbose", &mut config.verbose);
        read_bool(
            "autoSelectRandomWithinPriority",
            &mut config.randomize_within_priority,
        );

        if let Some(warning) = read_key(fields.get("hotKey"), "hotKey", &mut config.keymap.manual) {
            warnings.push(warning);
        }
        if let Some(warning) = read_key(
            fields.get("autoSelectPriorityHotKey"),
            "autoSelectPriorityHotKey",
            &mut config.keymap.automatic,
        ) {
            warnings.push(warning);
        }

        for (key, target) in [
            ("messageColor", &mut config.message_color),
            ("errorColor", &mut config.error_color),
        ] {
            match fields.get(key).and_then(parse_color) {
                Some(color) => *target = color,
                None => warnings.push(format!(
                    "Could not read '{}'. Invalid format or values. Must follow this pattern \
                     '[R, G, B]' where R, G, & B are values 0 through 255",
                    key
                )),
            }
        }

        match fields
            .get("autoSelectPriority")
            .and_then(parse_weights)
            .and_then(|weights| PriorityTable::from_weights(&weights).ok())
        {
            Some(table) => config.priorities = table,
            None => warnings.push(format!(
                "Could not read 'autoSelectPriority'. Invalid format. Must be a list of {} \
                 whole numbers",
                CATEGORY_COUNT
            )),
        }

        for warning in &warnings {
            tracing::warn!("{}", warning);
        }
        LoadedConfig { config, warnings }
    }

    /// The options as a document in options-file layout
    pub fn to_document(&self) -> Value {
        let color = |c: Rgb| json!([c.r, c.g, c.b]);
        json!({
            "allowControlAllies": self.allow_control_allies,
            "allowControlFormations": self.allow_control_formations,
            "muteExceptions": self.mute_exceptions,
            "verbose": self.verbose,
            "hotKey": self.keymap.manual.name(),
            "autoSelectPriorityHotKey": self.keymap.automatic.name(),
            "messageColor": color(self.message_color),
            "errorColor": color(self.error_color),
            "autoSelectPriority": self.priorities.weights().to_vec(),
            "autoSelectRandomWithinPriority": self.randomize_within_priority,
        })
    }
}

fn read_document(path: &Path) -> Result<Value> {
    let contents = std::fs::read_to_string(path)?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        Ok(toml::from_str(&contents)?)
    } else {
        Ok(serde_json::from_str(&contents)?)
    }
}

fn unreadable(error: PossessionError) -> LoadedConfig {
    tracing::warn!("Options file unreadable: {}", error);
    LoadedConfig {
        config: PossessionConfig::default(),
        warnings: vec![format!("Unable to read content of options file: '{}'", error)],
    }
}

/// Empty or missing names keep the default silently
fn read_key(value: Option<&Value>, option: &str, target: &mut Key) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(name)) if name.trim().is_empty() => None,
        Some(Value::String(name)) => match name.parse::<Key>() {
            Ok(key) => {
                *target = key;
                None
            }
            Err(_) => Some(format!(
                "Could not read '{}'. Value '{}'\nUsing default key '{}' instead",
                option, name, target
            )),
        },
        Some(other) => Some(format!(
            "Could not read '{}'. Value '{}'\nUsing default key '{}' instead",
            option, other, target
        )),
    }
}

fn parse_color(value: &Value) -> Option<Rgb> {
    let components = value
        .as_array()?
        .iter()
        .map(Value::as_i64)
        .collect::<Option<Vec<i64>>>()?;
    Rgb::from_components(&components)
}

fn parse_weights(value: &Value) -> Option<Vec<i32>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_i64().and_then(|n| i32::try_from(n).ok()))
        .collect()
}
