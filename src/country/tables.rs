//! Built-in country identity tables.
//!
//! `OFFICIAL_NAMES` follows the `official_name_en` column of the ISO-3166
//! country-codes dataset. `MANUAL_OVERRIDES` covers what that column cannot:
//! short forms, endonyms and names whose official form changed.

/// English official name -> ISO-3166 alpha-3.
pub const OFFICIAL_NAMES: &[(&str, &str)] = &[
    ("Albania", "ALB"),
    ("Andorra", "AND"),
    ("Argentina", "ARG"),
    ("Armenia", "ARM"),
    ("Australia", "AUS"),
    ("Austria", "AUT"),
    ("Azerbaijan", "AZE"),
    ("Bangladesh", "BGD"),
    ("Belarus", "BLR"),
    ("Belgium", "BEL"),
    ("Bosnia and Herzegovina", "BIH"),
    ("Brazil", "BRA"),
    ("Bulgaria", "BGR"),
    ("Canada", "CAN"),
    ("Chile", "CHL"),
    ("China", "CHN"),
    ("Colombia", "COL"),
    ("Croatia", "HRV"),
    ("Cyprus", "CYP"),
    ("Czechia", "CZE"),
    ("Denmark", "DNK"),
    ("Egypt", "EGY"),
    ("Estonia", "EST"),
    ("Finland", "FIN"),
    ("France", "FRA"),
    ("Georgia", "GEO"),
    ("Germany", "DEU"),
    ("Greece", "GRC"),
    ("Hungary", "HUN"),
    ("Iceland", "ISL"),
    ("India", "IND"),
    ("Indonesia", "IDN"),
    ("Iran (Islamic Republic of)", "IRN"),
    ("Ireland", "IRL"),
    ("Israel", "ISR"),
    ("Italy", "ITA"),
    ("Japan", "JPN"),
    ("Kenya", "KEN"),
    ("Latvia", "LVA"),
    ("Liechtenstein", "LIE"),
    ("Lithuania", "LTU"),
    ("Luxembourg", "LUX"),
    ("Malaysia", "MYS"),
    ("Malta", "MLT"),
    ("Mexico", "MEX"),
    ("Monaco", "MCO"),
    ("Montenegro", "MNE"),
    ("Morocco", "MAR"),
    ("Netherlands", "NLD"),
    ("Netherlands (Kingdom of the)", "NLD"),
    ("New Zealand", "NZL"),
    ("Nigeria", "NGA"),
    ("North Macedonia", "MKD"),
    ("Norway", "NOR"),
    ("Pakistan", "PAK"),
    ("Philippines", "PHL"),
    ("Poland", "POL"),
    ("Portugal", "PRT"),
    ("Republic of Korea", "KOR"),
    ("Republic of Moldova", "MDA"),
    ("Romania", "ROU"),
    ("Russian Federation", "RUS"),
    ("San Marino", "SMR"),
    ("Saudi Arabia", "SAU"),
    ("Serbia", "SRB"),
    ("Singapore", "SGP"),
    ("Slovakia", "SVK"),
    ("Slovenia", "SVN"),
    ("South Africa", "ZAF"),
    ("Spain", "ESP"),
    ("Sweden", "SWE"),
    ("Switzerland", "CHE"),
    ("Thailand", "THA"),
    ("Türkiye", "TUR"),
    ("Ukraine", "UKR"),
    ("United Arab Emirates", "ARE"),
    ("United Kingdom of Great Britain and Northern Ireland", "GBR"),
    ("United States of America", "USA"),
    ("Viet Nam", "VNM"),
];

/// Colloquial names, short forms and endonyms -> ISO-3166 alpha-3.
pub const MANUAL_OVERRIDES: &[(&str, &str)] = &[
    ("United States", "USA"),
    ("US", "USA"),
    ("U.S.", "USA"),
    ("United Kingdom", "GBR"),
    ("UK", "GBR"),
    ("Great Britain", "GBR"),
    ("Britain", "GBR"),
    ("Turkey", "TUR"),
    ("Türkiye", "TUR"),
    ("Czechia", "CZE"),
    ("Czech Republic", "CZE"),
    ("Česko", "CZE"),
    ("Deutschland", "DEU"),
    ("Österreich", "AUT"),
    ("België", "BEL"),
    ("Belgique", "BEL"),
    ("България", "BGR"),
    ("Hrvatska", "HRV"),
    ("Κύπρος", "CYP"),
    ("Danmark", "DNK"),
    ("Eesti", "EST"),
    ("Suomi", "FIN"),
    ("Ελλάδα", "GRC"),
    ("Hellas", "GRC"),
    ("Magyarország", "HUN"),
    ("Ísland", "ISL"),
    ("Éire", "IRL"),
    ("Italia", "ITA"),
    ("Latvija", "LVA"),
    ("Lietuva", "LTU"),
    ("Lëtzebuerg", "LUX"),
    ("Nederland", "NLD"),
    ("Holland", "NLD"),
    ("Norge", "NOR"),
    ("Polska", "POL"),
    ("România", "ROU"),
    ("Slovensko", "SVK"),
    ("Slovenija", "SVN"),
    ("España", "ESP"),
    ("Sverige", "SWE"),
    ("Schweiz", "CHE"),
    ("Suisse", "CHE"),
    ("Svizzera", "CHE"),
    ("Kosovo", "XKX"),
    ("Moldova", "MDA"),
    ("Macedonia", "MKD"),
    ("Russia", "RUS"),
    ("South Korea", "KOR"),
    ("Korea", "KOR"),
    ("Vietnam", "VNM"),
    ("Iran", "IRN"),
];
