//! Engine configuration.
//!
//! Hosts supply a [`PartialConfig`] (usually JSON) which is shallow-merged
//! over the documented defaults into a [`SeasonalEffectsConfig`]. The country
//! is resolved at merge time so a bad code fails here instead of during
//! season calculation.

use serde::{Deserialize, Deserializer, Serialize};

use crate::consts::DEFAULT_Z_INDEX;
use crate::country::{Country, CountryError};
use crate::date::CalendarDate;
use crate::effect::{EffectConfig, EffectFilter, EffectIntensity};
use crate::season::Season;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration has no country")]
    MissingCountry,
    #[error(transparent)]
    Country(#[from] CountryError),
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// How the engine picks an effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Holidays and seasons decide; the effect list acts as an allow-list.
    #[default]
    Auto,
    /// Falls back to the first listed effect when nothing else applies.
    Manual,
    /// Never shows anything.
    Disabled,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalEffectsConfig {
    pub country: Country,
    pub enable_holidays: bool,
    pub enable_seasons: bool,
    pub mode: SelectionMode,
    pub effects: Vec<EffectFilter>,
    pub intensity: EffectIntensity,
    pub disabled: bool,
    pub respect_reduced_motion: bool,
    pub season_override: Option<Season>,
    pub date_override: Option<CalendarDate>,
    pub z_index: i32,
    pub debug: bool,
}

/// Any subset of the configuration fields, as supplied by the host.
///
/// For the two overrides, an absent field leaves the value alone while an
/// explicit JSON `null` (`Some(None)`) clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PartialConfig {
    pub country: Option<String>,
    pub enable_holidays: Option<bool>,
    pub enable_seasons: Option<bool>,
    pub mode: Option<SelectionMode>,
    pub effects: Option<Vec<EffectFilter>>,
    pub intensity: Option<EffectIntensity>,
    pub disabled: Option<bool>,
    pub respect_reduced_motion: Option<bool>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub season_override: Option<Option<Season>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_override: Option<Option<CalendarDate>>,
    pub z_index: Option<i32>,
    pub debug: Option<bool>,
}

impl SeasonalEffectsConfig {
    /// Defaults for `country`.
    pub fn new(country: Country) -> Self {
        Self {
            country,
            enable_holidays: true,
            enable_seasons: true,
            mode: SelectionMode::Auto,
            effects: vec![EffectFilter::Auto],
            intensity: EffectIntensity::Medium,
            disabled: false,
            respect_reduced_motion: true,
            season_override: None,
            date_override: None,
            z_index: DEFAULT_Z_INDEX,
            debug: false,
        }
    }

    /// Merges `partial` over the defaults.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingCountry` or `ConfigError::Country` if the
    /// country is absent or not in the supported table.
    pub fn from_partial(partial: PartialConfig) -> Result<Self, ConfigError> {
        let country = partial
            .country
            .as_deref()
            .ok_or(ConfigError::MissingCountry)?
            .parse::<Country>()?;
        let mut config = Self::new(country);
        config.apply(partial)?;
        Ok(config)
    }

    /// Parses a JSON partial configuration and merges it over the defaults.
    ///
    /// # Errors
    /// Returns `ConfigError::Json` for malformed input, otherwise as
    /// [`SeasonalEffectsConfig::from_partial`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::from_partial(serde_json::from_str(json)?)
    }

    /// Shallow-merges `partial` into this configuration. Nothing changes if
    /// the country fails to resolve.
    ///
    /// # Errors
    /// Returns `ConfigError::Country` for an unknown country code.
    pub fn apply(&mut self, partial: PartialConfig) -> Result<(), ConfigError> {
        if let Some(code) = partial.country.as_deref() {
            self.country = code.parse()?;
        }

        let PartialConfig {
            country: _,
            enable_holidays,
            enable_seasons,
            mode,
            effects,
            intensity,
            disabled,
            respect_reduced_motion,
            season_override,
            date_override,
            z_index,
            debug,
        } = partial;

        merge(&mut self.enable_holidays, enable_holidays);
        merge(&mut self.enable_seasons, enable_seasons);
        merge(&mut self.mode, mode);
        merge(&mut self.effects, effects);
        merge(&mut self.intensity, intensity);
        merge(&mut self.disabled, disabled);
        merge(&mut self.respect_reduced_motion, respect_reduced_motion);
        merge(&mut self.z_index, z_index);
        merge(&mut self.debug, debug);
        merge(&mut self.season_override, season_override);
        merge(&mut self.date_override, date_override);

        Ok(())
    }

    /// True when the flag or the selection mode switches effects off.
    pub fn is_disabled(&self) -> bool {
        self.disabled || self.mode == SelectionMode::Disabled
    }

    /// Settings handed to a started effect.
    pub fn effect_config(&self) -> EffectConfig {
        EffectConfig {
            intensity: self.intensity,
            respect_reduced_motion: self.respect_reduced_motion,
            ..EffectConfig::default()
        }
    }
}

fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Marks a field that was present in the input, even as `null`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
