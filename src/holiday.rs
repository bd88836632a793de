//! Holiday lookup.
//!
//! [`HolidayEngine`] searches the built-in seed table followed by any
//! holidays registered at runtime, and orders matches by priority. Built-ins
//! can't be removed or shadowed; a custom holiday only beats a built-in by
//! declaring a strictly higher priority.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::builtin::built_in_holidays;
use crate::country::Country;
use crate::date::CalendarDate;
use crate::effect::EffectType;
use crate::rule::{HolidayRule, RuleError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HolidayError {
    #[error("Invalid rule for holiday '{holiday}': {source}")]
    InvalidRule {
        holiday: String,
        #[source]
        source: RuleError,
    },
}

/// A named holiday and the effect it triggers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holiday {
    pub name: String,
    pub rule: HolidayRule,
    pub effect: EffectType,
    /// `None` or an empty list applies everywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub countries: Option<Vec<Country>>,
    /// Higher wins; missing counts as 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

impl Holiday {
    pub fn new(name: impl Into<String>, rule: HolidayRule, effect: EffectType) -> Self {
        Self {
            name: name.into(),
            rule,
            effect,
            countries: None,
            priority: None,
        }
    }

    #[must_use]
    pub fn with_countries(mut self, countries: impl IntoIterator<Item = Country>) -> Self {
        self.countries = Some(countries.into_iter().collect());
        self
    }

    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn priority(&self) -> i32 {
        self.priority.unwrap_or_default()
    }

    pub fn applies_to(&self, country: Country) -> bool {
        match &self.countries {
            Some(countries) if !countries.is_empty() => countries.contains(&country),
            _ => true,
        }
    }

    fn add_country(&mut self, country: Country) {
        let countries = self.countries.get_or_insert_with(Vec::new);
        if !countries.contains(&country) {
            countries.push(country);
        }
    }
}

/// A holiday that fired for a date and country.
#[derive(Debug, Clone, Copy)]
pub struct HolidayMatch<'a> {
    pub holiday: &'a Holiday,
    pub country: Country,
    pub effect: EffectType,
}

/// A batch of custom holidays, optionally scoped to one country.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HolidayRegistration {
    #[serde(default)]
    pub country: Option<Country>,
    pub holidays: Vec<Holiday>,
}

/// Built-in plus runtime-registered holidays.
///
/// Not synchronized; hosts sharing one across threads wrap it themselves.
#[derive(Debug, Clone, Default)]
pub struct HolidayEngine {
    custom: Vec<Holiday>,
}

impl HolidayEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-ins first, then custom holidays in registration order.
    pub fn all_holidays(&self) -> impl Iterator<Item = &Holiday> {
        built_in_holidays().iter().chain(&self.custom)
    }

    pub fn custom_holidays(&self) -> &[Holiday] {
        &self.custom
    }

    pub fn holidays_for_country(&self, country: Country) -> Vec<&Holiday> {
        self.all_holidays()
            .filter(|holiday| holiday.applies_to(country))
            .collect()
    }

    /// Every holiday matching `date` in `country`, highest priority first.
    /// Equal priorities keep table order.
    pub fn find_holidays(&self, date: &CalendarDate, country: Country) -> Vec<HolidayMatch<'_>> {
        let mut matches: Vec<HolidayMatch<'_>> = self
            .all_holidays()
            .filter(|holiday| holiday.applies_to(country))
            .filter(|holiday| holiday.rule.matches(date, country))
            .map(|holiday| HolidayMatch {
                holiday,
                country,
                effect: holiday.effect,
            })
            .collect();

        // sort_by_key is stable
        matches.sort_by_key(|m| Reverse(m.holiday.priority()));
        matches
    }

    pub fn top_holiday(&self, date: &CalendarDate, country: Country) -> Option<HolidayMatch<'_>> {
        self.find_holidays(date, country).into_iter().next()
    }

    /// Appends custom holidays. A registration-level `country` is added to
    /// each holiday's country list. Nothing is registered if any rule is
    /// out of range.
    ///
    /// # Errors
    /// Returns `HolidayError::InvalidRule` for the first invalid holiday.
    pub fn register_holidays(
        &mut self,
        country: Option<Country>,
        holidays: impl IntoIterator<Item = Holiday>,
    ) -> Result<(), HolidayError> {
        let mut holidays: Vec<Holiday> = holidays.into_iter().collect();

        for holiday in &holidays {
            holiday.rule.validate().map_err(|source| {
                log::warn!("rejecting holiday registration '{}': {source}", holiday.name);
                HolidayError::InvalidRule {
                    holiday: holiday.name.clone(),
                    source,
                }
            })?;
        }

        if let Some(country) = country {
            for holiday in &mut holidays {
                holiday.add_country(country);
            }
        }

        log::debug!(
            "registered {} custom holiday(s){}",
            holidays.len(),
            country.map(|c| format!(" for {c}")).unwrap_or_default()
        );
        self.custom.append(&mut holidays);
        Ok(())
    }

    /// # Errors
    /// See [`HolidayEngine::register_holidays`].
    pub fn register(&mut self, registration: HolidayRegistration) -> Result<(), HolidayError> {
        self.register_holidays(registration.country, registration.holidays)
    }

    /// Drops every runtime registration; the built-in table is untouched.
    pub fn clear_custom_holidays(&mut self) {
        self.custom.clear();
    }
}
