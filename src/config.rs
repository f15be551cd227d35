use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

use crate::detect::SelectionPolicy;

const DEFAULT_BALL_LABEL: &str = "ball";
const DEFAULT_NET_LABEL: &str = "net";
const DEFAULT_NET_OVERLAP_THRESHOLD: f64 = 0.03;
const DEFAULT_BOUNCE_MIN_DROP: f64 = 0.01;
const DEFAULT_INSUFFICIENT_TRACK_CONFIDENCE: f64 = 0.2;
const DEFAULT_NET_BASE_CONFIDENCE: f64 = 0.6;
const DEFAULT_NET_CONFIDENCE_CAP: f64 = 0.95;
const DEFAULT_OUT_CONFIDENCE: f64 = 0.85;
const DEFAULT_IN_CONFIDENCE: f64 = 0.8;
const DEFAULT_NO_BOUNCE_CONFIDENCE: f64 = 0.35;

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct EngineConfigFile {
    labels: Option<LabelsConfigFile>,
    selection: Option<String>,
    thresholds: Option<ThresholdsConfigFile>,
    confidence: Option<ConfidenceConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct LabelsConfigFile {
    ball: Option<String>,
    net: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ThresholdsConfigFile {
    net_overlap: Option<f64>,
    bounce_min_drop: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfidenceConfigFile {
    insufficient_track: Option<f64>,
    net_base: Option<f64>,
    net_cap: Option<f64>,
    out: Option<f64>,
    #[serde(rename = "in")]
    inside: Option<f64>,
    no_bounce: Option<f64>,
}

/// Tunable thresholds and confidence bands for [`crate::LineCallEngine`].
///
/// `Default` carries the stock heuristic. Net confidence is the only band that
/// scales with evidence: `min(net_base + overlap, net_cap)`.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub ball_label: String,
    pub net_label: String,
    pub selection: SelectionPolicy,
    pub thresholds: Thresholds,
    pub confidence: ConfidenceBands,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Ball/net IoU strictly above this is a net call.
    pub net_overlap: f64,
    /// Descent strictly larger than this (normalized units) is needed for a bounce.
    pub bounce_min_drop: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceBands {
    pub insufficient_track: f64,
    pub net_base: f64,
    pub net_cap: f64,
    pub out: f64,
    pub inside: f64,
    pub no_bounce: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            net_overlap: DEFAULT_NET_OVERLAP_THRESHOLD,
            bounce_min_drop: DEFAULT_BOUNCE_MIN_DROP,
        }
    }
}

impl Default for ConfidenceBands {
    fn default() -> Self {
        Self {
            insufficient_track: DEFAULT_INSUFFICIENT_TRACK_CONFIDENCE,
            net_base: DEFAULT_NET_BASE_CONFIDENCE,
            net_cap: DEFAULT_NET_CONFIDENCE_CAP,
            out: DEFAULT_OUT_CONFIDENCE,
            inside: DEFAULT_IN_CONFIDENCE,
            no_bounce: DEFAULT_NO_BOUNCE_CONFIDENCE,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ball_label: DEFAULT_BALL_LABEL.to_string(),
            net_label: DEFAULT_NET_LABEL.to_string(),
            selection: SelectionPolicy::default(),
            thresholds: Thresholds::default(),
            confidence: ConfidenceBands::default(),
        }
    }
}

impl EngineConfig {
    /// Defaults, then the file named by `LINE_CALL_CONFIG` (if set), then env overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("LINE_CALL_CONFIG")
            .ok()
            .filter(|path| !path.trim().is_empty());
        Self::load_from(config_path.as_deref().map(Path::new))
    }

    /// Like [`EngineConfig::load`], with the config file given explicitly.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file_cfg = match path {
            Some(path) => Some(read_config_file(path)?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default())?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a config file without consulting the environment.
    pub fn from_path(path: &Path) -> Result<Self> {
        let cfg = Self::from_file(read_config_file(path)?)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: EngineConfigFile) -> Result<Self> {
        let selection = match file.selection.as_deref() {
            Some(raw) => parse_selection(raw)?,
            None => SelectionPolicy::default(),
        };
        let labels = file.labels.unwrap_or_default();
        let thresholds = file.thresholds.unwrap_or_default();
        let confidence = file.confidence.unwrap_or_default();
        Ok(Self {
            ball_label: labels
                .ball
                .unwrap_or_else(|| DEFAULT_BALL_LABEL.to_string()),
            net_label: labels.net.unwrap_or_else(|| DEFAULT_NET_LABEL.to_string()),
            selection,
            thresholds: Thresholds {
                net_overlap: thresholds
                    .net_overlap
                    .unwrap_or(DEFAULT_NET_OVERLAP_THRESHOLD),
                bounce_min_drop: thresholds
                    .bounce_min_drop
                    .unwrap_or(DEFAULT_BOUNCE_MIN_DROP),
            },
            confidence: ConfidenceBands {
                insufficient_track: confidence
                    .insufficient_track
                    .unwrap_or(DEFAULT_INSUFFICIENT_TRACK_CONFIDENCE),
                net_base: confidence.net_base.unwrap_or(DEFAULT_NET_BASE_CONFIDENCE),
                net_cap: confidence.net_cap.unwrap_or(DEFAULT_NET_CONFIDENCE_CAP),
                out: confidence.out.unwrap_or(DEFAULT_OUT_CONFIDENCE),
                inside: confidence.inside.unwrap_or(DEFAULT_IN_CONFIDENCE),
                no_bounce: confidence.no_bounce.unwrap_or(DEFAULT_NO_BOUNCE_CONFIDENCE),
            },
        })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(label) = std::env::var("LINE_CALL_BALL_LABEL") {
            if !label.trim().is_empty() {
                self.ball_label = label.trim().to_string();
            }
        }
        if let Ok(label) = std::env::var("LINE_CALL_NET_LABEL") {
            if !label.trim().is_empty() {
                self.net_label = label.trim().to_string();
            }
        }
        if let Ok(selection) = std::env::var("LINE_CALL_SELECTION") {
            if !selection.trim().is_empty() {
                self.selection = parse_selection(&selection)?;
            }
        }
        if let Ok(raw) = std::env::var("LINE_CALL_NET_THRESHOLD") {
            self.thresholds.net_overlap = parse_f64_env("LINE_CALL_NET_THRESHOLD", &raw)?;
        }
        if let Ok(raw) = std::env::var("LINE_CALL_BOUNCE_MIN_DROP") {
            self.thresholds.bounce_min_drop = parse_f64_env("LINE_CALL_BOUNCE_MIN_DROP", &raw)?;
        }
        Ok(())
    }

    /// Reject configurations that would produce out-of-range confidences.
    pub fn validate(&self) -> Result<()> {
        if self.ball_label.trim().is_empty() || self.net_label.trim().is_empty() {
            return Err(anyhow!("detection labels must not be empty"));
        }
        if self.ball_label == self.net_label {
            return Err(anyhow!(
                "ball and net labels must differ (both are '{}')",
                self.ball_label
            ));
        }
        ensure_unit("thresholds.net_overlap", self.thresholds.net_overlap)?;
        ensure_unit("thresholds.bounce_min_drop", self.thresholds.bounce_min_drop)?;

        let c = &self.confidence;
        for (name, value) in [
            ("confidence.insufficient_track", c.insufficient_track),
            ("confidence.net_base", c.net_base),
            ("confidence.net_cap", c.net_cap),
            ("confidence.out", c.out),
            ("confidence.in", c.inside),
            ("confidence.no_bounce", c.no_bounce),
        ] {
            ensure_unit(name, value)?;
        }
        if c.net_cap < c.net_base {
            return Err(anyhow!(
                "confidence.net_cap ({}) must be >= confidence.net_base ({})",
                c.net_cap,
                c.net_base
            ));
        }
        Ok(())
    }
}

fn ensure_unit(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(anyhow!("{} must be within [0, 1], got {}", name, value));
    }
    Ok(())
}

fn parse_selection(raw: &str) -> Result<SelectionPolicy> {
    SelectionPolicy::parse(raw).ok_or_else(|| {
        anyhow!(
            "unknown selection policy '{}' (expected first_match or highest_score)",
            raw
        )
    })
}

fn parse_f64_env(key: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse()
        .map_err(|_| anyhow!("{} must be a number, got '{}'", key, raw))
}

fn read_config_file(path: &Path) -> Result<EngineConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg: EngineConfigFile = if is_toml {
        toml::from_str(&raw).map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}
