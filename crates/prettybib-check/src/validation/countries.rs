//! Country names as written in the `address` field.
//!
//! Each row is `(alpha-2, alpha-3, canonical name, other accepted spellings)`.
//! Codes and other spellings are recognized but reported as renames.

pub struct Country {
    pub alpha2: &'static str,
    pub alpha3: &'static str,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

macro_rules! countries {
    ($(($a2:literal, $a3:literal, $name:literal $(, [$($alias:literal),* $(,)?])?)),* $(,)?) => {
        &[$(Country {
            alpha2: $a2,
            alpha3: $a3,
            name: $name,
            aliases: &[$($($alias),*)?],
        }),*]
    };
}

pub const USA: &str = "USA";

pub static COUNTRIES: &[Country] = countries![
    ("AF", "AFG", "Afghanistan"),
    ("AL", "ALB", "Albania"),
    ("DZ", "DZA", "Algeria"),
    ("AD", "AND", "Andorra"),
    ("AO", "AGO", "Angola"),
    ("AG", "ATG", "Antigua and Barbuda"),
    ("AR", "ARG", "Argentina", ["Argentine Republic"]),
    ("AM", "ARM", "Armenia"),
    ("AU", "AUS", "Australia", ["Commonwealth of Australia"]),
    ("AT", "AUT", "Austria", ["Republic of Austria"]),
    ("AZ", "AZE", "Azerbaijan"),
    ("BS", "BHS", "Bahamas", ["The Bahamas"]),
    ("BH", "BHR", "Bahrain"),
    ("BD", "BGD", "Bangladesh"),
    ("BB", "BRB", "Barbados"),
    ("BY", "BLR", "Belarus"),
    ("BE", "BEL", "Belgium", ["Kingdom of Belgium"]),
    ("BZ", "BLZ", "Belize"),
    ("BJ", "BEN", "Benin"),
    ("BT", "BTN", "Bhutan"),
    ("BO", "BOL", "Bolivia", ["Plurinational State of Bolivia"]),
    ("BA", "BIH", "Bosnia and Herzegovina"),
    ("BW", "BWA", "Botswana"),
    ("BR", "BRA", "Brazil", ["Brasil", "Federative Republic of Brazil"]),
    ("BN", "BRN", "Brunei", ["Brunei Darussalam"]),
    ("BG", "BGR", "Bulgaria"),
    ("BF", "BFA", "Burkina Faso"),
    ("BI", "BDI", "Burundi"),
    ("CV", "CPV", "Cabo Verde", ["Cape Verde"]),
    ("KH", "KHM", "Cambodia"),
    ("CM", "CMR", "Cameroon"),
    ("CA", "CAN", "Canada"),
    ("CF", "CAF", "Central African Republic"),
    ("TD", "TCD", "Chad"),
    ("CL", "CHL", "Chile"),
    ("CN", "CHN", "China", ["People's Republic of China", "PR China", "P.R. China", "PRC"]),
    ("CO", "COL", "Colombia"),
    ("KM", "COM", "Comoros"),
    ("CG", "COG", "Congo", ["Republic of the Congo"]),
    ("CD", "COD", "Democratic Republic of the Congo", ["DR Congo"]),
    ("CR", "CRI", "Costa Rica"),
    ("CI", "CIV", "Côte d'Ivoire", ["Cote d'Ivoire", "Ivory Coast"]),
    ("HR", "HRV", "Croatia"),
    ("CU", "CUB", "Cuba"),
    ("CY", "CYP", "Cyprus"),
    ("CZ", "CZE", "Czech Republic"),
    ("DK", "DNK", "Denmark", ["Kingdom of Denmark"]),
    ("DJ", "DJI", "Djibouti"),
    ("DM", "DMA", "Dominica"),
    ("DO", "DOM", "Dominican Republic"),
    ("EC", "ECU", "Ecuador"),
    ("EG", "EGY", "Egypt", ["Arab Republic of Egypt"]),
    ("SV", "SLV", "El Salvador"),
    ("GQ", "GNQ", "Equatorial Guinea"),
    ("ER", "ERI", "Eritrea"),
    ("EE", "EST", "Estonia"),
    ("SZ", "SWZ", "Eswatini", ["Swaziland"]),
    ("ET", "ETH", "Ethiopia"),
    ("FJ", "FJI", "Fiji"),
    ("FI", "FIN", "Finland", ["Suomi"]),
    ("FR", "FRA", "France", ["French Republic"]),
    ("GA", "GAB", "Gabon"),
    ("GM", "GMB", "Gambia", ["The Gambia"]),
    ("GE", "GEO", "Georgia"),
    ("DE", "DEU", "Germany", ["Federal Republic of Germany", "Deutschland"]),
    ("GH", "GHA", "Ghana"),
    ("GR", "GRC", "Greece", ["Hellenic Republic"]),
    ("GD", "GRD", "Grenada"),
    ("GT", "GTM", "Guatemala"),
    ("GN", "GIN", "Guinea"),
    ("GW", "GNB", "Guinea-Bissau"),
    ("GY", "GUY", "Guyana"),
    ("HT", "HTI", "Haiti"),
    ("HN", "HND", "Honduras"),
    ("HK", "HKG", "Hong Kong", ["Hong Kong SAR", "HKSAR"]),
    ("HU", "HUN", "Hungary"),
    ("IS", "ISL", "Iceland"),
    ("IN", "IND", "India", ["Republic of India"]),
    ("ID", "IDN", "Indonesia", ["Republic of Indonesia"]),
    ("IR", "IRN", "Iran", ["Islamic Republic of Iran"]),
    ("IQ", "IRQ", "Iraq"),
    ("IE", "IRL", "Ireland", ["Republic of Ireland", "Eire"]),
    ("IL", "ISR", "Israel", ["State of Israel"]),
    ("IT", "ITA", "Italy", ["Italia", "Italian Republic"]),
    ("JM", "JAM", "Jamaica"),
    ("JP", "JPN", "Japan"),
    ("JO", "JOR", "Jordan"),
    ("KZ", "KAZ", "Kazakhstan"),
    ("KE", "KEN", "Kenya"),
    ("KI", "KIR", "Kiribati"),
    ("KP", "PRK", "North Korea", ["Democratic People's Republic of Korea", "DPRK"]),
    ("KR", "KOR", "South Korea", ["Korea", "Republic of Korea"]),
    ("KW", "KWT", "Kuwait"),
    ("KG", "KGZ", "Kyrgyzstan"),
    ("LA", "LAO", "Laos", ["Lao People's Democratic Republic"]),
    ("LV", "LVA", "Latvia"),
    ("LB", "LBN", "Lebanon"),
    ("LS", "LSO", "Lesotho"),
    ("LR", "LBR", "Liberia"),
    ("LY", "LBY", "Libya"),
    ("LI", "LIE", "Liechtenstein"),
    ("LT", "LTU", "Lithuania"),
    ("LU", "LUX", "Luxembourg"),
    ("MO", "MAC", "Macao", ["Macau"]),
    ("MG", "MDG", "Madagascar"),
    ("MW", "MWI", "Malawi"),
    ("MY", "MYS", "Malaysia"),
    ("MV", "MDV", "Maldives"),
    ("ML", "MLI", "Mali"),
    ("MT", "MLT", "Malta"),
    ("MH", "MHL", "Marshall Islands"),
    ("MR", "MRT", "Mauritania"),
    ("MU", "MUS", "Mauritius"),
    ("MX", "MEX", "Mexico", ["México", "United Mexican States"]),
    ("FM", "FSM", "Micronesia", ["Federated States of Micronesia"]),
    ("MD", "MDA", "Moldova", ["Republic of Moldova"]),
    ("MC", "MCO", "Monaco"),
    ("MN", "MNG", "Mongolia"),
    ("ME", "MNE", "Montenegro"),
    ("MA", "MAR", "Morocco", ["Kingdom of Morocco"]),
    ("MZ", "MOZ", "Mozambique"),
    ("MM", "MMR", "Myanmar", ["Burma"]),
    ("NA", "NAM", "Namibia"),
    ("NR", "NRU", "Nauru"),
    ("NP", "NPL", "Nepal"),
    ("NL", "NLD", "Netherlands", ["The Netherlands", "Holland", "Kingdom of the Netherlands"]),
    ("NZ", "NZL", "New Zealand", ["Aotearoa"]),
    ("NI", "NIC", "Nicaragua"),
    ("NE", "NER", "Niger"),
    ("NG", "NGA", "Nigeria"),
    ("MK", "MKD", "North Macedonia", ["Macedonia"]),
    ("NO", "NOR", "Norway", ["Kingdom of Norway", "Norge"]),
    ("OM", "OMN", "Oman"),
    ("PK", "PAK", "Pakistan"),
    ("PW", "PLW", "Palau"),
    ("PS", "PSE", "Palestine", ["State of Palestine"]),
    ("PA", "PAN", "Panama"),
    ("PG", "PNG", "Papua New Guinea"),
    ("PY", "PRY", "Paraguay"),
    ("PE", "PER", "Peru"),
    ("PH", "PHL", "Philippines", ["The Philippines"]),
    ("PL", "POL", "Poland", ["Polska", "Republic of Poland"]),
    ("PT", "PRT", "Portugal", ["Portuguese Republic"]),
    ("PR", "PRI", "Puerto Rico"),
    ("QA", "QAT", "Qatar"),
    ("RO", "ROU", "Romania"),
    ("RU", "RUS", "Russia", ["Russian Federation"]),
    ("RW", "RWA", "Rwanda"),
    ("KN", "KNA", "Saint Kitts and Nevis"),
    ("LC", "LCA", "Saint Lucia"),
    ("VC", "VCT", "Saint Vincent and the Grenadines"),
    ("WS", "WSM", "Samoa"),
    ("SM", "SMR", "San Marino"),
    ("ST", "STP", "Sao Tome and Principe"),
    ("SA", "SAU", "Saudi Arabia", ["Kingdom of Saudi Arabia", "KSA"]),
    ("SN", "SEN", "Senegal"),
    ("RS", "SRB", "Serbia"),
    ("SC", "SYC", "Seychelles"),
    ("SL", "SLE", "Sierra Leone"),
    ("SG", "SGP", "Singapore", ["Republic of Singapore"]),
    ("SK", "SVK", "Slovakia", ["Slovak Republic"]),
    ("SI", "SVN", "Slovenia"),
    ("SB", "SLB", "Solomon Islands"),
    ("SO", "SOM", "Somalia"),
    ("ZA", "ZAF", "South Africa", ["Republic of South Africa", "RSA"]),
    ("SS", "SSD", "South Sudan"),
    ("ES", "ESP", "Spain", ["España", "Kingdom of Spain"]),
    ("LK", "LKA", "Sri Lanka"),
    ("SD", "SDN", "Sudan"),
    ("SR", "SUR", "Suriname"),
    ("SE", "SWE", "Sweden", ["Kingdom of Sweden", "Sverige"]),
    ("CH", "CHE", "Switzerland", ["Swiss Confederation", "Schweiz", "Suisse"]),
    ("SY", "SYR", "Syria", ["Syrian Arab Republic"]),
    ("TW", "TWN", "Taiwan", ["Republic of China", "Chinese Taipei"]),
    ("TJ", "TJK", "Tajikistan"),
    ("TZ", "TZA", "Tanzania", ["United Republic of Tanzania"]),
    ("TH", "THA", "Thailand", ["Kingdom of Thailand"]),
    ("TL", "TLS", "Timor-Leste", ["East Timor"]),
    ("TG", "TGO", "Togo"),
    ("TO", "TON", "Tonga"),
    ("TT", "TTO", "Trinidad and Tobago"),
    ("TN", "TUN", "Tunisia"),
    ("TR", "TUR", "Turkey", ["Türkiye", "Turkiye", "Republic of Turkey"]),
    ("TM", "TKM", "Turkmenistan"),
    ("TV", "TUV", "Tuvalu"),
    ("UG", "UGA", "Uganda"),
    ("UA", "UKR", "Ukraine"),
    ("AE", "ARE", "United Arab Emirates", ["UAE"]),
    ("GB", "GBR", "United Kingdom", [
        "UK",
        "U.K.",
        "Great Britain",
        "Britain",
        "England",
        "Scotland",
        "Wales",
        "Northern Ireland",
        "United Kingdom of Great Britain and Northern Ireland",
    ]),
    ("US", "USA", "USA", [
        "US",
        "U.S.",
        "U.S.A.",
        "United States",
        "United States of America",
    ]),
    ("UY", "URY", "Uruguay"),
    ("UZ", "UZB", "Uzbekistan"),
    ("VU", "VUT", "Vanuatu"),
    ("VA", "VAT", "Vatican City", ["Holy See"]),
    ("VE", "VEN", "Venezuela", ["Bolivarian Republic of Venezuela"]),
    ("VN", "VNM", "Vietnam", ["Viet Nam", "Socialist Republic of Vietnam"]),
    ("YE", "YEM", "Yemen"),
    ("ZM", "ZMB", "Zambia"),
    ("ZW", "ZWE", "Zimbabwe"),
];

/// Two-letter USPS codes of states, the capital district and territories.
pub static USPS_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC", "AS", "GU", "MP", "PR", "VI",
];

pub fn is_us_state(code: &str) -> bool {
    code == "D.C." || USPS_CODES.contains(&code)
}

/// How a written country name relates to the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountryMatch {
    Canonical(&'static str),
    Alias(&'static str),
    Unknown,
}

pub fn lookup(name: &str) -> CountryMatch {
    if let Some(country) = COUNTRIES.iter().find(|c| c.name == name) {
        return CountryMatch::Canonical(country.name);
    }
    let folded = name.to_lowercase();
    let found = COUNTRIES.iter().find(|c| {
        c.alpha2 == name
            || c.alpha3 == name
            || c.name.to_lowercase() == folded
            || c.aliases.iter().any(|alias| alias.to_lowercase() == folded)
    });
    match found {
        Some(country) => CountryMatch::Alias(country.name),
        None => CountryMatch::Unknown,
    }
}

/// Closest canonical name, for hints on unknown countries.
pub fn closest(name: &str) -> Option<&'static str> {
    COUNTRIES
        .iter()
        .map(|c| (c.name, strsim::jaro_winkler(&name.to_lowercase(), &c.name.to_lowercase())))
        .filter(|(_, score)| *score >= 0.85)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_codes_and_aliases() {
        assert_eq!(lookup("Germany"), CountryMatch::Canonical("Germany"));
        assert_eq!(lookup("DEU"), CountryMatch::Alias("Germany"));
        assert_eq!(lookup("Russian Federation"), CountryMatch::Alias("Russia"));
        assert_eq!(lookup("united kingdom"), CountryMatch::Alias("United Kingdom"));
        assert_eq!(lookup("United States"), CountryMatch::Alias("USA"));
        assert_eq!(lookup("Czechia"), CountryMatch::Unknown);
        assert_eq!(lookup("Atlantis"), CountryMatch::Unknown);
    }

    #[test]
    fn hints_for_typos() {
        assert_eq!(closest("Germnay"), Some("Germany"));
        assert_eq!(closest("Qwxyz"), None);
    }

    #[test]
    fn states() {
        assert!(is_us_state("WA"));
        assert!(is_us_state("D.C."));
        assert!(!is_us_state("XX"));
        assert!(!is_us_state("wa"));
    }
}
