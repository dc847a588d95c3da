//! Versioned reference tables for rule evaluation.
//!
//! Poverty guidelines, area median income, and expansion-state membership
//! are annually revised data. The engine takes the applicable table set as
//! a parameter so multiple vintages can coexist during a transition period.

use std::sync::OnceLock;

/// Federal poverty guideline annual thresholds by household size.
#[derive(Debug, Clone, PartialEq)]
pub struct PovertyGuidelines {
    pub year: u16,
    /// Thresholds for household sizes 1 through 8.
    base: [u32; 8],
    /// Increment per household member beyond 8.
    per_additional: u32,
}

impl PovertyGuidelines {
    /// 2024 HHS poverty guidelines (contiguous states and DC).
    pub fn for_2024() -> Self {
        Self {
            year: 2024,
            base: [
                15_060, 20_440, 25_820, 31_200, 36_580, 41_960, 47_340, 52_720,
            ],
            per_additional: 5_380,
        }
    }

    /// Annual guideline dollar figure for a household of the given size.
    ///
    /// Sizes beyond 8 extrapolate linearly. A size of zero returns the
    /// one-person figure; callers validate size before lookup.
    pub fn guideline(&self, household_size: u32) -> u32 {
        match household_size {
            0 | 1 => self.base[0],
            2..=8 => self.base[(household_size - 1) as usize],
            n => self.base[7] + (n - 8) * self.per_additional,
        }
    }
}

/// Area median income for a four-person family, by state.
///
/// Adjusted for household size with the standard schedule: 70% for one
/// person, +10 points per person up to four, +8 points per person beyond.
#[derive(Debug, Clone, PartialEq)]
pub struct AmiTable {
    pub year: u16,
    national_median4: u32,
    by_state: &'static [(&'static str, u32)],
}

/// 2024 four-person median family income by state, rounded to the nearest
/// hundred. States absent from the list fall back to the national figure.
static AMI_2024: &[(&str, u32)] = &[
    ("AK", 112_800),
    ("AL", 83_300),
    ("AR", 78_600),
    ("AZ", 94_300),
    ("CA", 109_500),
    ("CO", 117_800),
    ("CT", 125_300),
    ("DC", 154_700),
    ("DE", 104_300),
    ("FL", 89_000),
    ("GA", 91_200),
    ("HI", 116_700),
    ("IA", 98_000),
    ("ID", 88_900),
    ("IL", 103_600),
    ("IN", 91_600),
    ("KS", 94_100),
    ("KY", 83_000),
    ("LA", 79_700),
    ("MA", 130_600),
    ("MD", 124_800),
    ("ME", 96_100),
    ("MI", 95_900),
    ("MN", 113_700),
    ("MO", 90_300),
    ("MS", 73_700),
    ("MT", 91_700),
    ("NC", 90_000),
    ("ND", 102_100),
    ("NE", 98_700),
    ("NH", 125_000),
    ("NJ", 122_300),
    ("NM", 77_800),
    ("NV", 92_000),
    ("NY", 104_300),
    ("OH", 93_800),
    ("OK", 81_800),
    ("OR", 102_700),
    ("PA", 99_500),
    ("RI", 110_300),
    ("SC", 86_500),
    ("SD", 95_300),
    ("TN", 86_600),
    ("TX", 91_700),
    ("UT", 105_200),
    ("VA", 110_700),
    ("VT", 103_800),
    ("WA", 115_600),
    ("WI", 98_700),
    ("WV", 76_400),
    ("WY", 95_000),
];

impl AmiTable {
    pub fn for_2024() -> Self {
        Self {
            year: 2024,
            national_median4: 97_800,
            by_state: AMI_2024,
        }
    }

    /// Area median income for the given state and household size.
    pub fn median_income(&self, state_abbr: &str, household_size: u32) -> u32 {
        let median4 = self
            .by_state
            .iter()
            .find(|(abbr, _)| *abbr == state_abbr)
            .map(|(_, v)| *v)
            .unwrap_or(self.national_median4);
        let factor = size_adjustment(household_size);
        (median4 as f64 * factor).round() as u32
    }
}

/// HUD family-size adjustment factor relative to a four-person household.
fn size_adjustment(household_size: u32) -> f64 {
    match household_size {
        0 | 1 => 0.70,
        2 => 0.80,
        3 => 0.90,
        4 => 1.00,
        n => 1.00 + 0.08 * (n - 4) as f64,
    }
}

/// States (plus DC) that adopted the ACA Medicaid expansion.
static EXPANSION_STATES_2024: &[&str] = &[
    "AK", "AL", "AR", "AZ", "CA", "CO", "CT", "DC", "DE", "HI", "IA", "ID", "IL", "IN", "KY",
    "LA", "MA", "MD", "ME", "MI", "MN", "MO", "MS", "MT", "ND", "NE", "NH", "NJ", "NM", "NV",
    "NY", "OH", "OK", "OR", "PA", "RI", "SD", "UT", "VA", "VT", "WA", "WI", "WV",
];

/// The complete table set for one reference-data vintage.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTables {
    pub fpl: PovertyGuidelines,
    pub ami: AmiTable,
    expansion_states: &'static [&'static str],
}

impl ReferenceTables {
    /// Tables for a specific vintage year, if available.
    pub fn for_year(year: u16) -> Option<Self> {
        match year {
            2024 => Some(Self {
                fpl: PovertyGuidelines::for_2024(),
                ami: AmiTable::for_2024(),
                expansion_states: EXPANSION_STATES_2024,
            }),
            _ => None,
        }
    }

    /// The current default vintage, loaded once per process.
    pub fn default_2024() -> &'static Self {
        static TABLES: OnceLock<ReferenceTables> = OnceLock::new();
        TABLES.get_or_init(|| Self::for_year(2024).unwrap_or_else(|| unreachable!()))
    }

    /// True when the state adopted the Medicaid expansion.
    pub fn is_expansion_state(&self, state_abbr: &str) -> bool {
        self.expansion_states.contains(&state_abbr)
    }
}

/// Normalize a state name or abbreviation to a two-letter code.
///
/// Accepts full names in any case ("California", "new york") and two-letter
/// abbreviations. Returns None for strings that match neither.
pub fn normalize_state(state: &str) -> Option<String> {
    static NAMES: &[(&str, &str)] = &[
        ("ALABAMA", "AL"),
        ("ALASKA", "AK"),
        ("ARIZONA", "AZ"),
        ("ARKANSAS", "AR"),
        ("CALIFORNIA", "CA"),
        ("COLORADO", "CO"),
        ("CONNECTICUT", "CT"),
        ("DELAWARE", "DE"),
        ("DISTRICT OF COLUMBIA", "DC"),
        ("FLORIDA", "FL"),
        ("GEORGIA", "GA"),
        ("HAWAII", "HI"),
        ("IDAHO", "ID"),
        ("ILLINOIS", "IL"),
        ("INDIANA", "IN"),
        ("IOWA", "IA"),
        ("KANSAS", "KS"),
        ("KENTUCKY", "KY"),
        ("LOUISIANA", "LA"),
        ("MAINE", "ME"),
        ("MARYLAND", "MD"),
        ("MASSACHUSETTS", "MA"),
        ("MICHIGAN", "MI"),
        ("MINNESOTA", "MN"),
        ("MISSISSIPPI", "MS"),
        ("MISSOURI", "MO"),
        ("MONTANA", "MT"),
        ("NEBRASKA", "NE"),
        ("NEVADA", "NV"),
        ("NEW HAMPSHIRE", "NH"),
        ("NEW JERSEY", "NJ"),
        ("NEW MEXICO", "NM"),
        ("NEW YORK", "NY"),
        ("NORTH CAROLINA", "NC"),
        ("NORTH DAKOTA", "ND"),
        ("OHIO", "OH"),
        ("OKLAHOMA", "OK"),
        ("OREGON", "OR"),
        ("PENNSYLVANIA", "PA"),
        ("RHODE ISLAND", "RI"),
        ("SOUTH CAROLINA", "SC"),
        ("SOUTH DAKOTA", "SD"),
        ("TENNESSEE", "TN"),
        ("TEXAS", "TX"),
        ("UTAH", "UT"),
        ("VERMONT", "VT"),
        ("VIRGINIA", "VA"),
        ("WASHINGTON", "WA"),
        ("WEST VIRGINIA", "WV"),
        ("WISCONSIN", "WI"),
        ("WYOMING", "WY"),
    ];

    let upper = state.trim().to_uppercase();
    if let Some((_, abbr)) = NAMES.iter().find(|(name, _)| *name == upper) {
        return Some((*abbr).to_string());
    }
    if upper.len() == 2
        && upper.chars().all(|c| c.is_ascii_alphabetic())
        && NAMES.iter().any(|(_, abbr)| *abbr == upper)
    {
        return Some(upper);
    }
    None
}
