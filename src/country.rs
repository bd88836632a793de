use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error for country codes outside the supported table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CountryError {
    #[error("Unknown country code: {0}")]
    Unknown(String),
}

/// Which half of the globe a country sits in; decides whether seasons are inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    Northern,
    Southern,
}

macro_rules! countries {
    ($($variant:ident => ($name:literal, $hemisphere:ident)),+ $(,)?) => {
        /// Supported ISO 3166-1 alpha-2 country codes.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum Country {
            $($variant),+
        }

        impl Country {
            /// Every supported country, in table order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Two-letter upper-case code.
            pub const fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }

            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }

            pub const fn hemisphere(self) -> Hemisphere {
                match self {
                    $(Self::$variant => Hemisphere::$hemisphere),+
                }
            }
        }
    };
}

countries! {
    US => ("United States", Northern),
    GB => ("United Kingdom", Northern),
    FR => ("France", Northern),
    DE => ("Germany", Northern),
    IT => ("Italy", Northern),
    ES => ("Spain", Northern),
    JP => ("Japan", Northern),
    CN => ("China", Northern),
    KR => ("South Korea", Northern),
    IN => ("India", Northern),
    BR => ("Brazil", Southern),
    AU => ("Australia", Southern),
    NZ => ("New Zealand", Southern),
    CA => ("Canada", Northern),
    MX => ("Mexico", Northern),
    AR => ("Argentina", Southern),
    CL => ("Chile", Southern),
    ZA => ("South Africa", Southern),
    RU => ("Russia", Northern),
    PL => ("Poland", Northern),
    NL => ("Netherlands", Northern),
    BE => ("Belgium", Northern),
    SE => ("Sweden", Northern),
    NO => ("Norway", Northern),
    DK => ("Denmark", Northern),
    FI => ("Finland", Northern),
    IE => ("Ireland", Northern),
    CH => ("Switzerland", Northern),
    AT => ("Austria", Northern),
    PT => ("Portugal", Northern),
    GR => ("Greece", Northern),
    TR => ("Turkey", Northern),
    IL => ("Israel", Northern),
    EG => ("Egypt", Northern),
    SA => ("Saudi Arabia", Northern),
    AE => ("United Arab Emirates", Northern),
    TH => ("Thailand", Northern),
    VN => ("Vietnam", Northern),
    ID => ("Indonesia", Southern),
    MY => ("Malaysia", Northern),
    SG => ("Singapore", Northern),
    PH => ("Philippines", Northern),
}

impl FromStr for Country {
    type Err = CountryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|country| country.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| CountryError::Unknown(code.to_owned()))
    }
}

impl TryFrom<String> for Country {
    type Error = CountryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Country> for String {
    fn from(country: Country) -> Self {
        country.code().to_owned()
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
