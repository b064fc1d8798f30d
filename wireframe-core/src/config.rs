//! Widget options.
//!
//! Hosts hand in [`Settings`], a sparse set of overrides. Settings accumulate across
//! reconfigurations and are resolved into validated [`Options`] with defaults filled in.

use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;
use crate::off::{parse_float, parse_int};
use crate::projection::MIN_ZOOM;

pub const DEFAULT_ZOOM: f64 = 10000.0;
pub const DEFAULT_FPS: u32 = 37;
pub const DEFAULT_FILL: &str = "rgba(60, 60, 60, 0.1)";
pub const DEFAULT_STROKE: &str = "rgba(0, 0, 0, 1)";
pub const DEFAULT_LINE_WIDTH: f64 = 0.2;

/// A number given either directly or as text such as `"37"`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    /// Truncate to an integer, reading text by its integer prefix; NaN if unreadable
    pub fn to_integer(&self) -> f64 {
        match self {
            Self::Number(n) => n.trunc(),
            Self::Text(text) => parse_int(text).map_or(f64::NAN, |n| n as f64),
        }
    }

    /// Read as a real number, text by its longest numeric prefix; NaN if unreadable
    pub fn to_float(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(text) => parse_float(text),
        }
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for Numeric {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

/// Sparse option overrides; `None` leaves the current value in place
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub url: Option<String>,
    pub zoom: Option<Numeric>,
    pub fps: Option<Numeric>,
    /// `Some(None)` disables filling
    #[serde(deserialize_with = "style_override")]
    pub fill: Option<Option<String>>,
    /// `Some(None)` disables stroking
    #[serde(deserialize_with = "style_override")]
    pub stroke: Option<Option<String>>,
    pub line: Option<Numeric>,
}

impl Settings {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Parse settings from a JSON object
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        if json.trim().is_empty() || json.trim() == "null" {
            return Ok(Self::default());
        }
        serde_json::from_str(json).map_err(|e| ConfigError::InvalidOptions(e.to_string()))
    }

    /// Lay `self` over `base`: every key set here wins, every other key comes from `base`
    pub fn merged_over(self, base: &Settings) -> Settings {
        Settings {
            url: self.url.or_else(|| base.url.clone()),
            zoom: self.zoom.or_else(|| base.zoom.clone()),
            fps: self.fps.or_else(|| base.fps.clone()),
            fill: self.fill.or_else(|| base.fill.clone()),
            stroke: self.stroke.or_else(|| base.stroke.clone()),
            line: self.line.or_else(|| base.line.clone()),
        }
    }
}

/// A style key is either a style string or a falsy value that turns the pass off
#[derive(Deserialize)]
#[serde(untagged)]
enum RawStyle {
    Text(String),
    Flag(bool),
    Number(f64),
}

fn style_override<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawStyle> = Option::deserialize(deserializer)?;
    let style = match raw {
        None | Some(RawStyle::Flag(false)) => None,
        Some(RawStyle::Text(text)) if text.is_empty() => None,
        Some(RawStyle::Text(text)) => Some(text),
        Some(RawStyle::Number(n)) if n == 0.0 || n.is_nan() => None,
        Some(RawStyle::Flag(true) | RawStyle::Number(_)) => {
            return Err(serde::de::Error::custom(
                "expected a style string or a falsy value",
            ))
        }
    };
    Ok(Some(style))
}

/// Fully resolved options
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub url: String,
    pub zoom: f64,
    pub fps: u32,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub line_width: f64,
}

impl Options {
    /// Fill in defaults and validate
    pub fn resolve(settings: &Settings) -> Result<Self, ConfigError> {
        let url = settings
            .url
            .clone()
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingUrl)?;

        let zoom = settings.zoom.as_ref().map_or(DEFAULT_ZOOM, Numeric::to_integer);
        if zoom.is_nan() || zoom < MIN_ZOOM {
            return Err(ConfigError::InvalidZoom(zoom));
        }

        let fps = settings
            .fps
            .as_ref()
            .map_or(f64::from(DEFAULT_FPS), Numeric::to_integer);
        if fps.is_nan() || fps < 1.0 || fps > f64::from(u32::MAX) {
            return Err(ConfigError::InvalidFps(fps));
        }

        let line_width = settings
            .line
            .as_ref()
            .map_or(DEFAULT_LINE_WIDTH, Numeric::to_float);
        if !line_width.is_finite() || line_width < 0.0 {
            return Err(ConfigError::InvalidLineWidth(line_width));
        }

        Ok(Self {
            url,
            zoom,
            fps: fps as u32,
            fill: settings
                .fill
                .clone()
                .unwrap_or_else(|| Some(DEFAULT_FILL.to_owned())),
            stroke: settings
                .stroke
                .clone()
                .unwrap_or_else(|| Some(DEFAULT_STROKE.to_owned())),
            line_width,
        })
    }

    /// Delay between frames
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::resolve(&Settings::with_url("mesh.off")).unwrap();
        assert_eq!(options.url, "mesh.off");
        assert_eq!(options.zoom, DEFAULT_ZOOM);
        assert_eq!(options.fps, DEFAULT_FPS);
        assert_eq!(options.fill.as_deref(), Some(DEFAULT_FILL));
        assert_eq!(options.stroke.as_deref(), Some(DEFAULT_STROKE));
        assert_eq!(options.line_width, DEFAULT_LINE_WIDTH);
    }

    #[test]
    fn test_missing_url_fails() {
        assert_eq!(
            Options::resolve(&Settings::default()),
            Err(ConfigError::MissingUrl)
        );
        assert_eq!(
            Options::resolve(&Settings::with_url("")),
            Err(ConfigError::MissingUrl)
        );
    }

    #[test]
    fn test_json_numbers_and_strings() {
        let settings =
            Settings::from_json(r#"{"url": "a.off", "zoom": "250px", "fps": 24.9, "line": 1.5}"#)
                .unwrap();
        let options = Options::resolve(&settings).unwrap();
        assert_eq!(options.zoom, 250.0);
        assert_eq!(options.fps, 24);
        assert_eq!(options.line_width, 1.5);
    }

    #[test]
    fn test_line_width_from_text() {
        let settings = Settings::from_json(r#"{"url": "a.off", "line": "0.5"}"#).unwrap();
        assert_eq!(Options::resolve(&settings).unwrap().line_width, 0.5);

        let settings = Settings::from_json(r#"{"url": "a.off", "line": "wide"}"#).unwrap();
        assert!(matches!(
            Options::resolve(&settings),
            Err(ConfigError::InvalidLineWidth(w)) if w.is_nan()
        ));
    }

    #[test]
    fn test_falsy_styles_disable() {
        for falsy in ["false", "null", "\"\"", "0"] {
            let json = format!(r#"{{"url": "a.off", "fill": {falsy}, "stroke": "red"}}"#);
            let options = Options::resolve(&Settings::from_json(&json).unwrap()).unwrap();
            assert_eq!(options.fill, None, "fill {falsy}");
            assert_eq!(options.stroke.as_deref(), Some("red"));
        }
    }

    #[test]
    fn test_truthy_non_string_style_is_rejected() {
        let err = Settings::from_json(r#"{"url": "a.off", "fill": true}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOptions(_)));
    }

    #[test]
    fn test_invalid_numbers() {
        let mut settings = Settings::with_url("a.off");
        settings.fps = Some(Numeric::from(0u32));
        assert_eq!(Options::resolve(&settings), Err(ConfigError::InvalidFps(0.0)));

        settings.fps = None;
        settings.zoom = Some(Numeric::Text("big".into()));
        assert!(matches!(
            Options::resolve(&settings),
            Err(ConfigError::InvalidZoom(z)) if z.is_nan()
        ));
    }

    #[test]
    fn test_merge_keeps_earlier_keys() {
        let first = Settings::from_json(r#"{"url": "a.off", "fill": false, "fps": 10}"#).unwrap();
        let second = Settings::from_json(r#"{"zoom": 500}"#).unwrap();

        let merged = second.merged_over(&first);
        let options = Options::resolve(&merged).unwrap();
        assert_eq!(options.url, "a.off");
        assert_eq!(options.fill, None);
        assert_eq!(options.fps, 10);
        assert_eq!(options.zoom, 500.0);
    }

    #[test]
    fn test_frame_interval() {
        let mut settings = Settings::with_url("a.off");
        settings.fps = Some(Numeric::from(40u32));
        let options = Options::resolve(&settings).unwrap();
        assert_eq!(options.frame_interval(), Duration::from_millis(25));
    }
}
