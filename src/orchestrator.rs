//! Combines holidays, seasons and configuration into one active effect.

use std::fmt;

use crate::config::{ConfigError, PartialConfig, SeasonalEffectsConfig, SelectionMode};
use crate::country::Country;
use crate::date::{CalendarDate, ParseError};
use crate::effect::{EffectFilter, EffectType, is_effect_allowed};
use crate::holiday::{Holiday, HolidayEngine, HolidayError};
use crate::lifecycle::{HostEnvironment, StaticHost};
use crate::season::{Season, SeasonCalculator, SeasonOverride};

/// Callback notified when the published effect changes.
pub type EffectObserver = Box<dyn FnMut(EffectType)>;

/// Effect shown for each season when no holiday applies.
pub const fn seasonal_effect(season: Season) -> EffectType {
    match season {
        Season::Winter => EffectType::Snow,
        Season::Spring => EffectType::Petals,
        Season::Summer => EffectType::None,
        Season::Autumn => EffectType::Leaves,
    }
}

/// Owns the holiday and season registries and publishes the active effect.
pub struct EffectOrchestrator<H = StaticHost> {
    config: SeasonalEffectsConfig,
    holidays: HolidayEngine,
    seasons: SeasonCalculator,
    host: H,
    active: EffectType,
    observers: Vec<EffectObserver>,
}

impl<H: HostEnvironment> EffectOrchestrator<H> {
    pub fn new(config: SeasonalEffectsConfig, host: H) -> Self {
        Self::with_registries(config, HolidayEngine::new(), SeasonCalculator::new(), host)
    }

    pub fn with_registries(
        config: SeasonalEffectsConfig,
        holidays: HolidayEngine,
        seasons: SeasonCalculator,
        host: H,
    ) -> Self {
        Self {
            config,
            holidays,
            seasons,
            host,
            active: EffectType::None,
            observers: Vec::new(),
        }
    }

    pub const fn config(&self) -> &SeasonalEffectsConfig {
        &self.config
    }

    /// Shallow-merges `partial` into the current configuration. Call
    /// [`EffectOrchestrator::update_effect`] afterwards to republish.
    ///
    /// # Errors
    /// Returns `ConfigError::Country` for an unknown country code.
    pub fn apply_config(&mut self, partial: PartialConfig) -> Result<(), ConfigError> {
        self.config.apply(partial)
    }

    pub const fn holidays(&self) -> &HolidayEngine {
        &self.holidays
    }

    pub const fn seasons(&self) -> &SeasonCalculator {
        &self.seasons
    }

    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Whether any effect may be shown at all.
    pub fn is_enabled(&self) -> bool {
        self.host.is_interactive() && !self.config.is_disabled()
    }

    /// The configured date override, or today on the local clock.
    ///
    /// # Errors
    /// Returns a `ParseError` if the local clock is outside the supported range.
    pub fn effective_date(&self) -> Result<CalendarDate, ParseError> {
        self.config.date_override.map_or_else(CalendarDate::today, Ok)
    }

    /// The effect that should be active now.
    pub fn determine(&self) -> EffectType {
        if !self.is_enabled() {
            return EffectType::None;
        }
        match self.effective_date() {
            Ok(date) => self.determine_on(&date),
            Err(err) => {
                log::warn!("cannot read the local date: {err}");
                EffectType::None
            }
        }
    }

    /// The effect for `date`: holiday, then season, then the manual fallback.
    pub fn determine_on(&self, date: &CalendarDate) -> EffectType {
        if !self.is_enabled() {
            return EffectType::None;
        }
        let config = &self.config;

        if config.enable_holidays {
            if let Some(top) = self.holidays.top_holiday(date, config.country) {
                if is_effect_allowed(&config.effects, top.effect) {
                    self.trace(format_args!("holiday '{}' on {date}", top.holiday.name), top.effect);
                    return top.effect;
                }
                log::debug!(
                    "holiday '{}' effect {} is not in the allow-list",
                    top.holiday.name,
                    top.effect
                );
            }
        }

        if config.enable_seasons {
            let detection = self
                .seasons
                .detect_season(config.country, *date, config.season_override);
            let effect = seasonal_effect(detection.season);
            if is_effect_allowed(&config.effects, effect) {
                self.trace(format_args!("season {} on {date}", detection.season), effect);
                return effect;
            }
        }

        // Only the first entry counts; a leading `auto` means no manual pick
        if config.mode == SelectionMode::Manual {
            if let Some(EffectFilter::Effect(effect)) = config.effects.first() {
                self.trace(format_args!("manual selection"), *effect);
                return *effect;
            }
        }

        EffectType::None
    }

    /// Recomputes the effect and notifies observers if it changed.
    pub fn update_effect(&mut self) -> EffectType {
        let effect = self.determine();
        if effect != self.active {
            log::debug!("active effect {} -> {effect}", self.active);
            self.active = effect;
            for observer in &mut self.observers {
                observer(effect);
            }
        }
        effect
    }

    /// Last published effect; `None` until the first update.
    pub const fn active_effect(&self) -> EffectType {
        self.active
    }

    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(EffectType) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// # Errors
    /// Returns `HolidayError::InvalidRule` if any holiday has an out-of-range rule.
    pub fn register_holidays(
        &mut self,
        country: Option<Country>,
        holidays: impl IntoIterator<Item = Holiday>,
    ) -> Result<(), HolidayError> {
        self.holidays.register_holidays(country, holidays)
    }

    pub fn clear_custom_holidays(&mut self) {
        self.holidays.clear_custom_holidays();
    }

    pub fn register_season_override(&mut self, country: Country, seasons: SeasonOverride) {
        self.seasons.register_season_override(country, seasons);
    }

    fn trace(&self, reason: fmt::Arguments<'_>, effect: EffectType) {
        if self.config.debug {
            log::info!("[seasonal-effects] {reason} -> {effect}");
        } else {
            log::debug!("{reason} -> {effect}");
        }
    }
}

impl<H: fmt::Debug> fmt::Debug for EffectOrchestrator<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectOrchestrator")
            .field("config", &self.config)
            .field("holidays", &self.holidays)
            .field("seasons", &self.seasons)
            .field("host", &self.host)
            .field("active", &self.active)
            .field("observers", &self.observers.len())
            .finish()
    }
}
