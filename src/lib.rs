//! Decides which decorative effect (snow, petals, fireworks, ...) is active
//! for a country on a given date.
//!
//! Holidays win over seasons, seasons win over a manual fallback, and the
//! configured effect list acts as an allow-list throughout. Drawing is left
//! to the host through the traits in [`lifecycle`].
//!
//! ```
//! use seasonal_effects::{CalendarDate, Country, EffectOrchestrator, EffectType,
//!     SeasonalEffectsConfig, StaticHost};
//!
//! let mut config = SeasonalEffectsConfig::new(Country::JP);
//! config.date_override = Some("2024-03-25".parse().unwrap());
//! let orchestrator = EffectOrchestrator::new(config, StaticHost::interactive());
//! assert_eq!(orchestrator.determine(), EffectType::Petals);
//! ```

mod builtin;
mod consts;
mod prelude;

pub mod config;
pub mod country;
pub mod date;
pub mod effect;
pub mod holiday;
pub mod lifecycle;
pub mod orchestrator;
pub mod registry;
pub mod rule;
pub mod season;

pub use builtin::built_in_holidays;
pub use config::{ConfigError, PartialConfig, SeasonalEffectsConfig, SelectionMode};
pub use consts::*;
pub use country::{Country, CountryError, Hemisphere};
pub use date::{CalendarDate, Day, Month, ParseError, Year, days_in_month, is_leap_year};
pub use effect::{
    EffectConfig, EffectError, EffectFilter, EffectIntensity, EffectType, is_effect_allowed,
    particle_count,
};
pub use holiday::{Holiday, HolidayEngine, HolidayError, HolidayMatch, HolidayRegistration};
pub use lifecycle::{
    DrawingSurface, EffectLifecycle, FrameHandle, FrameScheduler, HostEnvironment, LifecycleError,
    LifecycleState, SeasonalEffect, StaticHost,
};
pub use orchestrator::{EffectObserver, EffectOrchestrator, seasonal_effect};
pub use registry::{EffectFactory, EffectRegistry};
pub use rule::{CustomPredicate, HolidayPredicate, HolidayRule, RuleError, easter_sunday};
pub use season::{
    NORTHERN_HEMISPHERE_SEASONS, SOUTHERN_HEMISPHERE_SEASONS, Season, SeasonCalculator,
    SeasonConfig, SeasonDetection, SeasonOverride, SeasonRange,
};
