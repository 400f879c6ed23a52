//! Centralized balance and tuning constants for the King John 1205 engine.
//!
//! These values define the deterministic rules of the simulated year.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through save data
//! or event content.

// Calendar -----------------------------------------------------------------
pub const GAME_YEAR: i32 = 1205;
pub(crate) const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
pub(crate) const DAYS_IN_YEAR: u32 = 365;
pub(crate) const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Fixed-date feasts: `(month, day, name)`.
///
/// Easter and its dependents are moveable; the 1205 dates are baked in.
pub(crate) const FEAST_DAYS: [(u8, u8, &str); 18] = [
    (1, 1, "Circumcision of Christ / New Year"),
    (1, 6, "Epiphany"),
    (2, 2, "Candlemas / Purification of Mary"),
    (3, 25, "Annunciation / Lady Day"),
    (4, 17, "Easter Sunday"),
    (5, 26, "Ascension Day"),
    (6, 5, "Pentecost / Whitsunday"),
    (6, 24, "Nativity of St. John the Baptist / Midsummer"),
    (8, 15, "Assumption of Mary"),
    (9, 29, "Michaelmas / Feast of St. Michael"),
    (10, 28, "Feast of St. Simon and St. Jude"),
    (11, 1, "All Saints' Day"),
    (11, 11, "Feast of St. Martin"),
    (11, 30, "Feast of St. Andrew"),
    (12, 25, "Christmas / Nativity of Christ"),
    (12, 26, "St. Stephen's Day"),
    (12, 27, "Feast of St. John the Evangelist"),
    (12, 28, "Feast of the Holy Innocents"),
];

// Starting kingdom ---------------------------------------------------------
pub const STARTING_LOCATION: &str = "winchester";
pub const STARTING_TREASURY: i64 = 8_000;
pub const STARTING_AUTHORITY: i32 = 65;
pub const STARTING_MILITARY: i32 = 60;
pub const STARTING_PAPAL: i32 = 40;

pub const STARTING_BARONS: [(&str, i32); 8] = [
    ("william_marshal", 70),
    ("william_longespee", 75),
    ("william_de_braose", 60),
    ("geoffrey_fitzpeter", 70),
    ("roger_de_lacy", 60),
    ("robert_de_vieuxpont", 60),
    ("william_de_stuteville", 55),
    ("hugh_de_neville", 65),
];

pub const STARTING_REGIONS: [(&str, i32); 6] = [
    ("southern_england", 75),
    ("northern_england", 60),
    ("welsh_marches", 55),
    ("scotland_border", 60),
    ("ireland", 55),
    ("continental", 50),
];

/// Weights for the kingdom stability aggregate. The royal heartland counts
/// double; the distant holdings count half.
pub(crate) const REGION_WEIGHTS: [(&str, f64); 6] = [
    ("southern_england", 2.0),
    ("northern_england", 1.0),
    ("welsh_marches", 1.0),
    ("scotland_border", 0.5),
    ("ireland", 0.5),
    ("continental", 1.0),
];

// Clamp ranges -------------------------------------------------------------
pub(crate) const SCORE_MIN: i32 = 0;
pub(crate) const SCORE_MAX: i32 = 100;
pub(crate) const PAPAL_MIN: i32 = -100;
pub(crate) const PAPAL_MAX: i32 = 100;

// Termination thresholds ---------------------------------------------------
pub(crate) const BANKRUPTCY_GRACE_DAYS: u32 = 30;
pub(crate) const CIVIL_WAR_AUTHORITY: i32 = 10;
pub(crate) const MASS_REBELLION_LOYALTY: f64 = 15.0;
pub(crate) const COLLAPSE_STABILITY: i32 = 25;

// Travel -------------------------------------------------------------------
pub(crate) const UNKNOWN_ROUTE_DAYS: u32 = 3;

// Persistence --------------------------------------------------------------
pub const SNAPSHOT_VERSION: &str = "1.0";
pub const SAVE_VERSION: &str = "1.0";
pub const GAME_VERSION: &str = env!("CARGO_PKG_VERSION");
pub(crate) const DEFAULT_SAVE_DIR: &str = "saves";
pub(crate) const DEFAULT_MANUAL_SLOTS: u8 = 5;
pub(crate) const AUTOSAVE_FILE: &str = "autosave.json";

#[cfg(test)]
pub(crate) const FLOAT_EPSILON: f64 = 1e-9;
