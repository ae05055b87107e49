//! Fixed country catalog.
//!
//! One coefficient profile per supported country, compiled in at build time.
//! The TUI only ever offers these six entries, but the CLI accepts free-form
//! names, so `lookup` still guards against unknown selections.

use crate::domain::{Country, CountryProfile};
use crate::error::AppError;

/// The compiled-in coefficient table.
pub const CATALOG: [CountryProfile; 6] = [
    CountryProfile { country: Country::Spain, a: 1.2, b: 0.45, c: 3.0 },
    CountryProfile { country: Country::Italy, a: 1.0, b: 0.30, c: 4.5 },
    CountryProfile { country: Country::UnitedStates, a: 1.5, b: 0.35, c: 6.0 },
    CountryProfile { country: Country::Mexico, a: 1.1, b: 0.50, c: 2.5 },
    CountryProfile { country: Country::Japan, a: 0.9, b: 0.25, c: 5.0 },
    CountryProfile { country: Country::Brazil, a: 1.3, b: 0.55, c: 3.0 },
];

/// Profile for a known country (total over the closed enum).
pub fn profile(country: Country) -> CountryProfile {
    // The table has exactly one row per `Country` variant.
    CATALOG
        .iter()
        .copied()
        .find(|p| p.country == country)
        .unwrap_or(CATALOG[0])
}

/// Resolve a free-form country name against the catalog.
///
/// Matching ignores case and space/hyphen/underscore separators, so
/// `united states`, `United-States`, and `UNITEDSTATES` all resolve.
pub fn lookup(name: &str) -> Result<CountryProfile, AppError> {
    let wanted = normalize(name);
    for p in &CATALOG {
        if normalize(p.country.display_name()) == wanted {
            return Ok(*p);
        }
    }
    let known: Vec<&str> = CATALOG.iter().map(|p| p.country.display_name()).collect();
    Err(AppError::unknown_country(name, &known))
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}
