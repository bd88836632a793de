//! Hemisphere-aware season detection.
//!
//! Each country resolves to a [`SeasonConfig`]: the default table for its
//! hemisphere, with any registered per-country [`SeasonOverride`] merged in
//! range by range.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_MONTH, MID_MONTH_DAY};
use crate::country::{Country, Hemisphere};
use crate::date::{CalendarDate, Month, ParseError};
use crate::prelude::*;

/// Meteorological season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    #[display(fmt = "winter")]
    Winter,
    #[display(fmt = "spring")]
    Spring,
    #[display(fmt = "summer")]
    Summer,
    #[display(fmt = "autumn")]
    Autumn,
}

impl Season {
    /// Order in which ranges are tested; the first match wins.
    pub const ORDER: [Self; 4] = [Self::Winter, Self::Spring, Self::Summer, Self::Autumn];

    /// Returned when no range matches a month.
    pub const FALLBACK: Self = Self::Summer;
}

/// Inclusive month span. `start > end` wraps across the year end (e.g. Dec-Feb).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeasonRange {
    pub start: Month,
    pub end: Month,
}

impl SeasonRange {
    /// # Errors
    /// Returns `ParseError::InvalidMonth` if either bound is outside 1-12.
    pub fn new(start: u8, end: u8) -> Result<Self, ParseError> {
        Ok(Self {
            start: Month::new(start)?,
            end: Month::new(end)?,
        })
    }

    const fn from_table(start: u8, end: u8) -> Self {
        Self {
            start: Month::from_table(start),
            end: Month::from_table(end),
        }
    }

    pub const fn contains(&self, month: u8) -> bool {
        let (start, end) = (self.start.get(), self.end.get());
        if start <= end {
            month >= start && month <= end
        } else {
            month >= start || month <= end
        }
    }
}

/// One range per season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonConfig {
    pub winter: SeasonRange,
    pub spring: SeasonRange,
    pub summer: SeasonRange,
    pub autumn: SeasonRange,
}

impl SeasonConfig {
    pub const fn range(&self, season: Season) -> SeasonRange {
        match season {
            Season::Winter => self.winter,
            Season::Spring => self.spring,
            Season::Summer => self.summer,
            Season::Autumn => self.autumn,
        }
    }

    pub const fn for_hemisphere(hemisphere: Hemisphere) -> Self {
        match hemisphere {
            Hemisphere::Northern => NORTHERN_HEMISPHERE_SEASONS,
            Hemisphere::Southern => SOUTHERN_HEMISPHERE_SEASONS,
        }
    }

    /// Replaces only the ranges the override sets.
    pub fn merged_with(mut self, seasons: &SeasonOverride) -> Self {
        if let Some(range) = seasons.winter {
            self.winter = range;
        }
        if let Some(range) = seasons.spring {
            self.spring = range;
        }
        if let Some(range) = seasons.summer {
            self.summer = range;
        }
        if let Some(range) = seasons.autumn {
            self.autumn = range;
        }
        self
    }

    /// Season for a 1-based month; overlapping ranges resolve in [`Season::ORDER`].
    pub fn season_for_month(&self, month: u8) -> Season {
        Season::ORDER
            .into_iter()
            .find(|season| self.range(*season).contains(month))
            .unwrap_or(Season::FALLBACK)
    }
}

/// Dec-Feb winter, Mar-May spring, Jun-Aug summer, Sep-Nov autumn
pub const NORTHERN_HEMISPHERE_SEASONS: SeasonConfig = SeasonConfig {
    winter: SeasonRange::from_table(12, 2),
    spring: SeasonRange::from_table(3, 5),
    summer: SeasonRange::from_table(6, 8),
    autumn: SeasonRange::from_table(9, 11),
};

/// Jun-Aug winter, Sep-Nov spring, Dec-Feb summer, Mar-May autumn
pub const SOUTHERN_HEMISPHERE_SEASONS: SeasonConfig = SeasonConfig {
    winter: SeasonRange::from_table(6, 8),
    spring: SeasonRange::from_table(9, 11),
    summer: SeasonRange::from_table(12, 2),
    autumn: SeasonRange::from_table(3, 5),
};

/// Partial replacement of a country's season table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonOverride {
    pub winter: Option<SeasonRange>,
    pub spring: Option<SeasonRange>,
    pub summer: Option<SeasonRange>,
    pub autumn: Option<SeasonRange>,
}

impl SeasonOverride {
    /// Layers `newer` over `self`; unset fields in `newer` keep the current value.
    fn merge(&mut self, newer: &Self) {
        self.winter = newer.winter.or(self.winter);
        self.spring = newer.spring.or(self.spring);
        self.summer = newer.summer.or(self.summer);
        self.autumn = newer.autumn.or(self.autumn);
    }
}

/// Outcome of a season lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeasonDetection {
    pub season: Season,
    pub is_overridden: bool,
    pub date: CalendarDate,
    pub country: Country,
}

/// Season lookups plus the per-country override registry.
///
/// Not synchronized; hosts sharing one across threads wrap it themselves.
#[derive(Debug, Clone, Default)]
pub struct SeasonCalculator {
    overrides: HashMap<Country, SeasonOverride>,
}

impl SeasonCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detect_season(
        &self,
        country: Country,
        date: CalendarDate,
        season_override: Option<Season>,
    ) -> SeasonDetection {
        if let Some(season) = season_override {
            return SeasonDetection {
                season,
                is_overridden: true,
                date,
                country,
            };
        }

        let season = self.season_config_for(country).season_for_month(date.month());
        SeasonDetection {
            season,
            is_overridden: false,
            date,
            country,
        }
    }

    /// Merges `seasons` into any override already registered for `country`.
    pub fn register_season_override(&mut self, country: Country, seasons: SeasonOverride) {
        log::debug!("registering season override for {country}: {seasons:?}");
        self.overrides.entry(country).or_default().merge(&seasons);
    }

    pub fn clear_season_overrides(&mut self) {
        self.overrides.clear();
    }

    /// Hemisphere defaults with this country's overrides applied.
    pub fn season_config_for(&self, country: Country) -> SeasonConfig {
        let defaults = SeasonConfig::for_hemisphere(country.hemisphere());
        match self.overrides.get(&country) {
            Some(seasons) => defaults.merged_with(seasons),
            None => defaults,
        }
    }

    /// Season of each month in `year`, sampled on the 15th.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` if `year` is outside the supported range.
    pub fn season_timeline(
        &self,
        country: Country,
        year: u16,
    ) -> Result<Vec<(u8, Season)>, ParseError> {
        (1..=MAX_MONTH)
            .map(|month| {
                let date = CalendarDate::from_ymd(year, month, MID_MONTH_DAY)?;
                Ok((month, self.detect_season(country, date, None).season))
            })
            .collect()
    }
}
