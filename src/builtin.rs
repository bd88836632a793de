use std::sync::LazyLock;

use crate::country::Country::{self, *};
use crate::effect::EffectType::{self, Confetti, Fireworks, Leaves, Petals, Snow};
use crate::holiday::Holiday;
use crate::rule::HolidayRule;

static BUILT_IN_HOLIDAYS: LazyLock<Vec<Holiday>> = LazyLock::new(|| {
    vec![
        // Global
        global("New Year's Day", HolidayRule::fixed(1, 1), Fireworks, 100),
        global("New Year's Eve", HolidayRule::fixed(12, 31), Fireworks, 100),
        // United States
        local("Independence Day", HolidayRule::fixed(7, 4), Fireworks, &[US], 90),
        // 4th Thursday of November
        local("Thanksgiving", HolidayRule::relative(11, 4, 4), Leaves, &[US], 80),
        local("Halloween", HolidayRule::fixed(10, 31), Leaves, &[US, GB, CA, IE], 70),
        // France
        local("Bastille Day", HolidayRule::fixed(7, 14), Fireworks, &[FR], 90),
        // Japan
        local(
            "Hanami (Cherry Blossom Season)",
            HolidayRule::range(3, 20, 4, 15),
            Petals,
            &[JP],
            85,
        ),
        local("Golden Week", HolidayRule::range(4, 29, 5, 5), Confetti, &[JP], 80),
        // Germany
        local(
            "Oktoberfest Period",
            HolidayRule::range(9, 15, 10, 5),
            Leaves,
            &[DE],
            75,
        ),
        local("German Unity Day", HolidayRule::fixed(10, 3), Confetti, &[DE], 80),
        // Canada
        local("Canada Day", HolidayRule::fixed(7, 1), Fireworks, &[CA], 90),
        // Mexico
        local(
            "Día de los Muertos",
            HolidayRule::range(11, 1, 11, 2),
            Petals,
            &[MX],
            90,
        ),
        local(
            "Independence Day (Mexico)",
            HolidayRule::fixed(9, 16),
            Fireworks,
            &[MX],
            90,
        ),
        // Brazil
        local("Carnival", HolidayRule::easter(-47), Confetti, &[BR], 95),
        local(
            "Independence Day (Brazil)",
            HolidayRule::fixed(9, 7),
            Fireworks,
            &[BR],
            90,
        ),
        // Australia
        local("Australia Day", HolidayRule::fixed(1, 26), Fireworks, &[AU], 90),
        // India
        local(
            "Holi (approximate)",
            HolidayRule::range(3, 1, 3, 15),
            Confetti,
            &[IN],
            90,
        ),
        local(
            "Independence Day (India)",
            HolidayRule::fixed(8, 15),
            Fireworks,
            &[IN],
            90,
        ),
        // China
        local("National Day", HolidayRule::fixed(10, 1), Fireworks, &[CN], 90),
        // Easter
        local(
            "Easter Sunday",
            HolidayRule::easter(0),
            Petals,
            &[US, GB, FR, DE, IT, ES, PL, IE, AU, NZ, CA, BR, AR, CL],
            85,
        ),
        // Christmas season
        global(
            "Christmas Season",
            HolidayRule::range(12, 20, 12, 26),
            Snow,
            95,
        ),
    ]
});

/// The bundled seed table, in declaration order.
pub fn built_in_holidays() -> &'static [Holiday] {
    &BUILT_IN_HOLIDAYS
}

fn global(name: &str, rule: HolidayRule, effect: EffectType, priority: i32) -> Holiday {
    Holiday::new(name, rule, effect).with_priority(priority)
}

fn local(
    name: &str,
    rule: HolidayRule,
    effect: EffectType,
    countries: &[Country],
    priority: i32,
) -> Holiday {
    global(name, rule, effect, priority).with_countries(countries.iter().copied())
}
