//! `City, Country` and `City, ST, USA` address rules.

use crate::validation::countries::{self, CountryMatch, USA};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressCheck {
    /// Already in canonical form.
    Valid,
    /// Acceptable, but `canonical` is the preferred spelling.
    Rename { canonical: String, reason: String },
    Invalid(String),
}

impl AddressCheck {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Invalid(_))
    }
}

pub fn check_address(address: &str) -> AddressCheck {
    let parts: Vec<&str> = address.split(',').map(str::trim).collect();
    if parts.iter().any(|part| part.is_empty()) || !(2..=3).contains(&parts.len()) {
        return AddressCheck::Invalid(format!(
            "address '{address}' should look like 'City, Country' or 'City, ST, USA'."
        ));
    }

    let written_country = parts[parts.len() - 1];
    if written_country == "Czechia" {
        return AddressCheck::Invalid(format!(
            "address '{address}' should use 'Czech Republic' instead of 'Czechia'."
        ));
    }

    let (country, renamed) = match countries::lookup(written_country) {
        CountryMatch::Canonical(name) => (name, false),
        CountryMatch::Alias(name) => (name, true),
        CountryMatch::Unknown => {
            let hint = countries::closest(written_country)
                .map(|name| format!(" Did you mean '{name}'?"))
                .unwrap_or_default();
            return AddressCheck::Invalid(format!(
                "unknown country '{written_country}' in address '{address}'.{hint}"
            ));
        }
    };

    match (parts.len(), country == USA) {
        (2, true) => {
            return AddressCheck::Invalid(format!(
                "US address '{address}' should look like 'City, ST, USA'."
            ));
        }
        (3, true) if !countries::is_us_state(parts[1]) => {
            return AddressCheck::Invalid(format!(
                "'{}' in address '{address}' is not a USPS state code.",
                parts[1]
            ));
        }
        (3, false) => {
            return AddressCheck::Invalid(format!(
                "address '{address}' should look like 'City, {country}'."
            ));
        }
        _ => {}
    }

    let mut canonical_parts = parts[..parts.len() - 1].to_vec();
    canonical_parts.push(country);
    let canonical = canonical_parts.join(", ");

    if renamed {
        AddressCheck::Rename {
            reason: format!("country '{written_country}' should be written as '{country}'."),
            canonical,
        }
    } else if canonical != address {
        AddressCheck::Rename {
            reason: format!("address '{address}' should be written as '{canonical}'."),
            canonical,
        }
    } else {
        AddressCheck::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renamed_to(address: &str) -> Option<String> {
        match check_address(address) {
            AddressCheck::Rename { canonical, .. } => Some(canonical),
            _ => None,
        }
    }

    #[test]
    fn canonical_addresses() {
        assert_eq!(check_address("Prague, Czech Republic"), AddressCheck::Valid);
        assert_eq!(check_address("Seattle, WA, USA"), AddressCheck::Valid);
        assert_eq!(check_address("Washington, D.C., USA"), AddressCheck::Valid);
    }

    #[test]
    fn czechia_is_rejected() {
        let verdict = check_address("Prague, Czechia");
        assert!(matches!(verdict, AddressCheck::Invalid(ref msg) if msg.contains("Czech Republic")));
    }

    #[test]
    fn us_needs_a_state() {
        assert!(!check_address("Seattle, USA").is_accepted());
        assert!(!check_address("Seattle, XX, USA").is_accepted());
        assert_eq!(
            renamed_to("Seattle, WA, United States").as_deref(),
            Some("Seattle, WA, USA")
        );
    }

    #[test]
    fn non_canonical_country_is_a_rename() {
        assert_eq!(renamed_to("Berlin, DEU").as_deref(), Some("Berlin, Germany"));
        assert_eq!(
            renamed_to("Moscow, Russian Federation").as_deref(),
            Some("Moscow, Russia")
        );
        assert!(check_address("Berlin, DEU").is_accepted());
    }

    #[test]
    fn whitespace_is_tolerated_and_canonicalized() {
        assert_eq!(renamed_to("Prague ,Czech Republic").as_deref(), Some("Prague, Czech Republic"));
    }

    #[test]
    fn unknown_country_gets_a_hint() {
        let verdict = check_address("Berlin, Germnay");
        assert!(matches!(verdict, AddressCheck::Invalid(ref msg) if msg.contains("'Germany'")));
    }

    #[test]
    fn malformed_shapes() {
        assert!(!check_address("Prague").is_accepted());
        assert!(!check_address("Prague, , Czech Republic").is_accepted());
        assert!(!check_address("Vancouver, BC, Canada").is_accepted());
    }
}
