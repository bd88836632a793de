use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::AUTO_EFFECT;
use crate::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EffectError {
    #[error("Unknown effect: {0}")]
    Unknown(String),
}

/// Identifier of a decorative effect. `None` means nothing is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectType {
    #[display(fmt = "snow")]
    Snow,
    #[display(fmt = "fireworks")]
    Fireworks,
    #[display(fmt = "petals")]
    Petals,
    #[display(fmt = "confetti")]
    Confetti,
    #[display(fmt = "leaves")]
    Leaves,
    #[display(fmt = "rain")]
    Rain,
    #[display(fmt = "stars")]
    Stars,
    #[default]
    #[display(fmt = "none")]
    None,
}

impl EffectType {
    pub const ALL: [Self; 8] = [
        Self::Snow,
        Self::Fireworks,
        Self::Petals,
        Self::Confetti,
        Self::Leaves,
        Self::Rain,
        Self::Stars,
        Self::None,
    ];

    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// Screen area covered by one particle, or a fixed count for burst effects.
    const fn density(self) -> Density {
        match self {
            Self::Snow => Density::PerArea(10_000),
            Self::Confetti => Density::PerArea(8_000),
            Self::Leaves => Density::PerArea(12_000),
            Self::Petals => Density::PerArea(15_000),
            Self::Fireworks => Density::Burst(100),
            Self::Rain | Self::Stars | Self::None => Density::Burst(0),
        }
    }
}

impl FromStr for EffectType {
    type Err = EffectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|effect| effect.to_string().eq_ignore_ascii_case(name))
            .ok_or_else(|| EffectError::Unknown(name.to_owned()))
    }
}

#[derive(Debug, Clone, Copy)]
enum Density {
    PerArea(u32),
    Burst(u32),
}

/// One allow-list entry: a concrete effect or the `"auto"` wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EffectFilter {
    Auto,
    Effect(EffectType),
}

impl FromStr for EffectFilter {
    type Err = EffectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(AUTO_EFFECT) {
            Ok(Self::Auto)
        } else {
            s.parse().map(Self::Effect)
        }
    }
}

impl TryFrom<String> for EffectFilter {
    type Error = EffectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EffectFilter> for String {
    fn from(filter: EffectFilter) -> Self {
        match filter {
            EffectFilter::Auto => AUTO_EFFECT.to_owned(),
            EffectFilter::Effect(effect) => effect.to_string(),
        }
    }
}

impl From<EffectType> for EffectFilter {
    fn from(effect: EffectType) -> Self {
        Self::Effect(effect)
    }
}

/// Whether `effect` may be shown under `allowed`. Empty lists and lists
/// containing `Auto` allow everything.
pub fn is_effect_allowed(allowed: &[EffectFilter], effect: EffectType) -> bool {
    allowed.is_empty()
        || allowed
            .iter()
            .any(|filter| matches!(filter, EffectFilter::Auto) || *filter == EffectFilter::Effect(effect))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectIntensity {
    #[display(fmt = "low")]
    Low,
    #[default]
    #[display(fmt = "medium")]
    Medium,
    #[display(fmt = "high")]
    High,
}

impl EffectIntensity {
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Low => 0.5,
            Self::Medium => 1.0,
            Self::High => 1.5,
        }
    }
}

/// Settings handed to a running effect by its host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectConfig {
    #[serde(default)]
    pub intensity: EffectIntensity,
    #[serde(default = "default_respect_reduced_motion")]
    pub respect_reduced_motion: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, serde_json::Value>,
}

const fn default_respect_reduced_motion() -> bool {
    true
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            intensity: EffectIntensity::default(),
            respect_reduced_motion: default_respect_reduced_motion(),
            colors: None,
            options: BTreeMap::new(),
        }
    }
}

/// Particles to seed for `effect` on a `width` x `height` surface.
pub fn particle_count(effect: EffectType, width: u32, height: u32, intensity: EffectIntensity) -> u32 {
    let base = match effect.density() {
        Density::PerArea(per) => f64::from(width) * f64::from(height) / f64::from(per),
        Density::Burst(count) => f64::from(count),
    };
    // non-negative and far below u32::MAX for any real surface
    (base * intensity.multiplier()).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_names_round_trip_through_display() {
        for effect in EffectType::ALL {
            assert_eq!(effect.to_string().parse::<EffectType>().unwrap(), effect);
        }
        assert!(matches!(
            "sparkles".parse::<EffectType>(),
            Err(EffectError::Unknown(_))
        ));
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("auto".parse::<EffectFilter>().unwrap(), EffectFilter::Auto);
        assert_eq!(
            "snow".parse::<EffectFilter>().unwrap(),
            EffectFilter::Effect(EffectType::Snow)
        );
        let parsed: Vec<EffectFilter> = serde_json::from_str(r#"["auto", "petals"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![EffectFilter::Auto, EffectFilter::Effect(EffectType::Petals)]
        );
        assert!(serde_json::from_str::<Vec<EffectFilter>>(r#"["glitter"]"#).is_err());
    }

    #[test]
    fn test_allow_list() {
        assert!(is_effect_allowed(&[], EffectType::Snow));
        assert!(is_effect_allowed(&[EffectFilter::Auto], EffectType::Snow));
        assert!(is_effect_allowed(
            &[EffectType::Leaves.into(), EffectFilter::Auto],
            EffectType::Snow
        ));
        assert!(is_effect_allowed(&[EffectType::Snow.into()], EffectType::Snow));
        assert!(!is_effect_allowed(&[EffectType::Leaves.into()], EffectType::Snow));
    }

    #[test]
    fn test_intensity_multiplier() {
        assert!((EffectIntensity::Low.multiplier() - 0.5).abs() < f64::EPSILON);
        assert!((EffectIntensity::Medium.multiplier() - 1.0).abs() < f64::EPSILON);
        assert!((EffectIntensity::High.multiplier() - 1.5).abs() < f64::EPSILON);
        assert_eq!(EffectIntensity::default(), EffectIntensity::Medium);
    }

    #[test]
    fn test_particle_count() {
        // 1920x1080 = 2_073_600 px²
        assert_eq!(particle_count(EffectType::Snow, 1920, 1080, EffectIntensity::Medium), 207);
        assert_eq!(particle_count(EffectType::Snow, 1920, 1080, EffectIntensity::Low), 103);
        assert_eq!(particle_count(EffectType::Confetti, 1920, 1080, EffectIntensity::High), 388);
        assert_eq!(particle_count(EffectType::Petals, 1920, 1080, EffectIntensity::Medium), 138);
        assert_eq!(particle_count(EffectType::Fireworks, 10, 10, EffectIntensity::High), 150);
        assert_eq!(particle_count(EffectType::None, 1920, 1080, EffectIntensity::High), 0);
    }

    #[test]
    fn test_effect_config_defaults_from_json() {
        let config: EffectConfig = serde_json::from_str(r#"{"intensity": "high"}"#).unwrap();
        assert_eq!(config.intensity, EffectIntensity::High);
        assert!(config.respect_reduced_motion);
        assert_eq!(config.colors, None);
        assert_eq!(config, EffectConfig { intensity: EffectIntensity::High, ..EffectConfig::default() });
    }
}
