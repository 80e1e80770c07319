use crate::frequency::DEFAULT_MAX_WORDS;
use crate::scale::{DEFAULT_MAX_FONT, DEFAULT_MIN_FONT, FontScale};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_QR_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Reading statistics shown in the poster's three-column band.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PosterStats {
    pub words_read: u64,
    pub minutes_practiced: u64,
    pub streak_days: u64,
}

/// Everything a single poster render needs besides the story text.
///
/// Every field has a default, so partial JSON/YAML documents are accepted. Keys are camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PosterConfig {
    pub width: f64,
    pub height: f64,
    pub background: String,
    pub accent: String,
    /// Color of every cloud word except the top-ranked one, and of body text.
    pub ink: String,
    pub muted: String,
    /// Draws a rounded inset card over the background.
    pub card: bool,
    pub card_color: String,
    pub title: String,
    pub subtitle: Option<String>,
    /// Small uppercase line above the title (e.g. `DAY 12 · THE LOST KITE`).
    pub meta: String,
    pub stats: PosterStats,
    /// Encoded into the footer QR code. No QR slot is drawn without it.
    pub share_url: Option<String>,
    /// URL or local path of the footer logo.
    pub logo: Option<String>,
    pub app_name: String,
    pub qr_endpoint: String,
    pub qr_size: u32,
    pub max_words: usize,
    pub min_font: f64,
    pub max_font: f64,
    pub font_family: String,
}

impl Default for PosterConfig {
    fn default() -> Self {
        Self {
            width: 1080.0,
            height: 1350.0,
            background: "#fdf6ec".to_string(),
            accent: "#e4572e".to_string(),
            ink: "#1f2937".to_string(),
            muted: "#6b7280".to_string(),
            card: true,
            card_color: "#ffffff".to_string(),
            title: "My Reading Story".to_string(),
            subtitle: None,
            meta: String::new(),
            stats: PosterStats::default(),
            share_url: None,
            logo: None,
            app_name: "Reading Practice".to_string(),
            qr_endpoint: DEFAULT_QR_ENDPOINT.to_string(),
            qr_size: 200,
            max_words: DEFAULT_MAX_WORDS,
            min_font: DEFAULT_MIN_FONT,
            max_font: DEFAULT_MAX_FONT,
            font_family: "Helvetica, Arial, sans-serif".to_string(),
        }
    }
}

impl PosterConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let mut layers = ConfigLayers::new();
        layers.merge_json_str(text)?;
        layers.build()
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let mut layers = ConfigLayers::new();
        layers.merge_yaml_str(text)?;
        layers.build()
    }

    pub fn font_scale(&self) -> Result<FontScale> {
        FontScale::new(self.min_font, self.max_font)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfig { message });

        for (name, v) in [("width", self.width), ("height", self.height)] {
            if !(v.is_finite() && v > 0.0) {
                return invalid(format!("{name} must be a positive number, got {v}"));
            }
        }
        if self.max_words == 0 {
            return invalid("maxWords must be at least 1".to_string());
        }
        if self.qr_size == 0 {
            return invalid("qrSize must be at least 1".to_string());
        }
        for (name, v) in [
            ("background", &self.background),
            ("accent", &self.accent),
            ("ink", &self.ink),
            ("muted", &self.muted),
            ("cardColor", &self.card_color),
        ] {
            if v.trim().is_empty() {
                return invalid(format!("{name} must not be empty"));
            }
        }
        self.font_scale()?;
        Ok(())
    }
}

/// Layered JSON view of a [`PosterConfig`]: defaults first, then files, then dotted overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigLayers(Value);

impl Default for ConfigLayers {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLayers {
    pub fn new() -> Self {
        // Serializing plain strings, numbers and bools cannot fail.
        let defaults = serde_json::to_value(PosterConfig::default())
            .unwrap_or_else(|_| Value::Object(Map::new()));
        Self(defaults)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn merge_value(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }

    pub fn merge_json_str(&mut self, text: &str) -> Result<()> {
        let v: Value = serde_json::from_str(text)?;
        self.merge_value(&v);
        Ok(())
    }

    pub fn merge_yaml_str(&mut self, text: &str) -> Result<()> {
        let v: Value = serde_yaml::from_str(text)?;
        if v.is_null() {
            return Ok(());
        }
        self.merge_value(&v);
        Ok(())
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        // Configs are objects; coerce anything else so this never panics on user input.
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    pub fn get_value(&self, dotted_path: &str) -> Option<&Value> {
        dotted_path
            .split('.')
            .try_fold(&self.0, |cur, seg| cur.as_object()?.get(seg))
    }

    /// Parses `key=value`.
    ///
    /// Text fields (currently a string or unset) take the raw value verbatim, so `title=1984`
    /// stays a title; only the literal `null` clears them. Other fields read the value as JSON
    /// when possible (`12`, `true`) and fall back to a plain string.
    pub fn set_assignment(&mut self, assignment: &str) -> Result<()> {
        let Some((key, raw)) = assignment.split_once('=') else {
            return Err(Error::InvalidConfig {
                message: format!("expected key=value, got `{assignment}`"),
            });
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::InvalidConfig {
                message: format!("missing key in `{assignment}`"),
            });
        }
        let text_field = matches!(
            self.get_value(key),
            Some(Value::String(_)) | Some(Value::Null)
        );
        let value = if text_field {
            if raw.trim() == "null" {
                Value::Null
            } else {
                Value::String(raw.to_string())
            }
        } else {
            serde_json::from_str::<Value>(raw.trim())
                .unwrap_or_else(|_| Value::String(raw.to_string()))
        };
        self.set_value(key, value);
        Ok(())
    }

    pub fn build(&self) -> Result<PosterConfig> {
        let config: PosterConfig = serde_json::from_value(self.0.clone())?;
        config.validate()?;
        Ok(config)
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
