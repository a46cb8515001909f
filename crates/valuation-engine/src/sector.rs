//! Sector baseline P/E multiples.

/// Base P/E for sectors missing from the table, including "unknown"
pub const DEFAULT_SECTOR_PE: f64 = 18.0;

const SECTOR_BASE_PE: &[(&str, f64)] = &[
    ("Technology", 25.0),
    ("Healthcare", 22.0),
    ("Consumer Cyclical", 18.0),
    ("Consumer Defensive", 16.0),
    ("Financial Services", 14.0),
    ("Industrials", 17.0),
    ("Energy", 12.0),
    ("Utilities", 15.0),
    ("Real Estate", 20.0),
    ("Materials", 15.0),
    ("Communication Services", 20.0),
];

/// Baseline P/E for a sector name; lookup ignores case and surrounding whitespace.
pub fn sector_base_pe(sector: &str) -> f64 {
    let sector = sector.trim();
    SECTOR_BASE_PE
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(sector))
        .map_or(DEFAULT_SECTOR_PE, |(_, pe)| *pe)
}
