//! ISO code books backing the currency, country and region rules.
//!
//! Each book is built once on first use and is read-only afterwards.

use std::collections::HashSet;
use std::sync::OnceLock;

/// ISO 4217 active currencies: (alphabetic, numeric).
const CURRENCIES: &[(&str, &str)] = &[
    ("AED", "784"), ("AFN", "971"), ("ALL", "008"), ("AMD", "051"), ("ANG", "532"),
    ("AOA", "973"), ("ARS", "032"), ("AUD", "036"), ("AWG", "533"), ("AZN", "944"),
    ("BAM", "977"), ("BBD", "052"), ("BDT", "050"), ("BGN", "975"), ("BHD", "048"),
    ("BIF", "108"), ("BMD", "060"), ("BND", "096"), ("BOB", "068"), ("BOV", "984"),
    ("BRL", "986"), ("BSD", "044"), ("BTN", "064"), ("BWP", "072"), ("BYN", "933"),
    ("BZD", "084"), ("CAD", "124"), ("CDF", "976"), ("CHE", "947"), ("CHF", "756"),
    ("CHW", "948"), ("CLF", "990"), ("CLP", "152"), ("CNY", "156"), ("COP", "170"),
    ("COU", "970"), ("CRC", "188"), ("CUC", "931"), ("CUP", "192"), ("CVE", "132"),
    ("CZK", "203"), ("DJF", "262"), ("DKK", "208"), ("DOP", "214"), ("DZD", "012"),
    ("EGP", "818"), ("ERN", "232"), ("ETB", "230"), ("EUR", "978"), ("FJD", "242"),
    ("FKP", "238"), ("GBP", "826"), ("GEL", "981"), ("GHS", "936"), ("GIP", "292"),
    ("GMD", "270"), ("GNF", "324"), ("GTQ", "320"), ("GYD", "328"), ("HKD", "344"),
    ("HNL", "340"), ("HTG", "332"), ("HUF", "348"), ("IDR", "360"), ("ILS", "376"),
    ("INR", "356"), ("IQD", "368"), ("IRR", "364"), ("ISK", "352"), ("JMD", "388"),
    ("JOD", "400"), ("JPY", "392"), ("KES", "404"), ("KGS", "417"), ("KHR", "116"),
    ("KMF", "174"), ("KPW", "408"), ("KRW", "410"), ("KWD", "414"), ("KYD", "136"),
    ("KZT", "398"), ("LAK", "418"), ("LBP", "422"), ("LKR", "144"), ("LRD", "430"),
    ("LSL", "426"), ("LYD", "434"), ("MAD", "504"), ("MDL", "498"), ("MGA", "969"),
    ("MKD", "807"), ("MMK", "104"), ("MNT", "496"), ("MOP", "446"), ("MRU", "929"),
    ("MUR", "480"), ("MVR", "462"), ("MWK", "454"), ("MXN", "484"), ("MXV", "979"),
    ("MYR", "458"), ("MZN", "943"), ("NAD", "516"), ("NGN", "566"), ("NIO", "558"),
    ("NOK", "578"), ("NPR", "524"), ("NZD", "554"), ("OMR", "512"), ("PAB", "590"),
    ("PEN", "604"), ("PGK", "598"), ("PHP", "608"), ("PKR", "586"), ("PLN", "985"),
    ("PYG", "600"), ("QAR", "634"), ("RON", "946"), ("RSD", "941"), ("RUB", "643"),
    ("RWF", "646"), ("SAR", "682"), ("SBD", "090"), ("SCR", "690"), ("SDG", "938"),
    ("SEK", "752"), ("SGD", "702"), ("SHP", "654"), ("SLE", "925"), ("SOS", "706"),
    ("SRD", "968"), ("SSP", "728"), ("STN", "930"), ("SVC", "222"), ("SYP", "760"),
    ("SZL", "748"), ("THB", "764"), ("TJS", "972"), ("TMT", "934"), ("TND", "788"),
    ("TOP", "776"), ("TRY", "949"), ("TTD", "780"), ("TWD", "901"), ("TZS", "834"),
    ("UAH", "980"), ("UGX", "800"), ("USD", "840"), ("USN", "997"), ("UYI", "940"),
    ("UYU", "858"), ("UYW", "927"), ("UZS", "860"), ("VED", "926"), ("VES", "928"),
    ("VND", "704"), ("VUV", "548"), ("WST", "882"), ("XAF", "950"), ("XAG", "961"),
    ("XAU", "959"), ("XBA", "955"), ("XBB", "956"), ("XBC", "957"), ("XBD", "958"),
    ("XCD", "951"), ("XCG", "532"), ("XDR", "960"), ("XOF", "952"), ("XPD", "964"),
    ("XPF", "953"), ("XPT", "962"), ("XSU", "994"), ("XTS", "963"), ("XUA", "965"),
    ("XXX", "999"), ("YER", "886"), ("ZAR", "710"), ("ZMW", "967"), ("ZWG", "924"),
];

/// Withdrawn ISO 4217 currencies.
const HISTORICAL_CURRENCIES: &[&str] = &[
    "ADP", "AFA", "ALK", "AOK", "AON", "AOR", "ARA", "ARP", "ATS", "AZM", "BEF", "BGL",
    "BOP", "BRB", "BRC", "BRE", "BRN", "BRR", "BYB", "BYR", "CSD", "CSK", "CYP", "DDM",
    "DEM", "ECS", "ECV", "EEK", "ESP", "FIM", "FRF", "GHC", "GRD", "GWP", "HRK", "IEP",
    "ITL", "LTL", "LUF", "LVL", "MGF", "MRO", "MTL", "MXP", "MZM", "NLG", "PEI", "PLZ",
    "PTE", "ROL", "RUR", "SDD", "SIT", "SKK", "SLL", "SRG", "STD", "SUR", "TMM", "TPE",
    "TRL", "UAK", "VEB", "VEF", "XEU", "YUM", "ZMK", "ZRN", "ZWD", "ZWL", "ZWN", "ZWR",
];

/// Widely used crypto-currency tickers (not part of ISO 4217).
const CRYPTO_CURRENCIES: &[&str] = &[
    "ADA", "BCH", "BNB", "BTC", "DOGE", "DOT", "ETH", "LTC", "SOL", "TRX", "USDC", "USDT",
    "XBT", "XLM", "XMR", "XRP",
];

/// ISO 3166-1 countries: (alpha-2, alpha-3, numeric).
const COUNTRIES: &[(&str, &str, &str)] = &[
    ("AD", "AND", "020"), ("AE", "ARE", "784"), ("AF", "AFG", "004"), ("AG", "ATG", "028"),
    ("AI", "AIA", "660"), ("AL", "ALB", "008"), ("AM", "ARM", "051"), ("AO", "AGO", "024"),
    ("AQ", "ATA", "010"), ("AR", "ARG", "032"), ("AS", "ASM", "016"), ("AT", "AUT", "040"),
    ("AU", "AUS", "036"), ("AW", "ABW", "533"), ("AX", "ALA", "248"), ("AZ", "AZE", "031"),
    ("BA", "BIH", "070"), ("BB", "BRB", "052"), ("BD", "BGD", "050"), ("BE", "BEL", "056"),
    ("BF", "BFA", "854"), ("BG", "BGR", "100"), ("BH", "BHR", "048"), ("BI", "BDI", "108"),
    ("BJ", "BEN", "204"), ("BL", "BLM", "652"), ("BM", "BMU", "060"), ("BN", "BRN", "096"),
    ("BO", "BOL", "068"), ("BQ", "BES", "535"), ("BR", "BRA", "076"), ("BS", "BHS", "044"),
    ("BT", "BTN", "064"), ("BV", "BVT", "074"), ("BW", "BWA", "072"), ("BY", "BLR", "112"),
    ("BZ", "BLZ", "084"), ("CA", "CAN", "124"), ("CC", "CCK", "166"), ("CD", "COD", "180"),
    ("CF", "CAF", "140"), ("CG", "COG", "178"), ("CH", "CHE", "756"), ("CI", "CIV", "384"),
    ("CK", "COK", "184"), ("CL", "CHL", "152"), ("CM", "CMR", "120"), ("CN", "CHN", "156"),
    ("CO", "COL", "170"), ("CR", "CRI", "188"), ("CU", "CUB", "192"), ("CV", "CPV", "132"),
    ("CW", "CUW", "531"), ("CX", "CXR", "162"), ("CY", "CYP", "196"), ("CZ", "CZE", "203"),
    ("DE", "DEU", "276"), ("DJ", "DJI", "262"), ("DK", "DNK", "208"), ("DM", "DMA", "212"),
    ("DO", "DOM", "214"), ("DZ", "DZA", "012"), ("EC", "ECU", "218"), ("EE", "EST", "233"),
    ("EG", "EGY", "818"), ("EH", "ESH", "732"), ("ER", "ERI", "232"), ("ES", "ESP", "724"),
    ("ET", "ETH", "231"), ("FI", "FIN", "246"), ("FJ", "FJI", "242"), ("FK", "FLK", "238"),
    ("FM", "FSM", "583"), ("FO", "FRO", "234"), ("FR", "FRA", "250"), ("GA", "GAB", "266"),
    ("GB", "GBR", "826"), ("GD", "GRD", "308"), ("GE", "GEO", "268"), ("GF", "GUF", "254"),
    ("GG", "GGY", "831"), ("GH", "GHA", "288"), ("GI", "GIB", "292"), ("GL", "GRL", "304"),
    ("GM", "GMB", "270"), ("GN", "GIN", "324"), ("GP", "GLP", "312"), ("GQ", "GNQ", "226"),
    ("GR", "GRC", "300"), ("GS", "SGS", "239"), ("GT", "GTM", "320"), ("GU", "GUM", "316"),
    ("GW", "GNB", "624"), ("GY", "GUY", "328"), ("HK", "HKG", "344"), ("HM", "HMD", "334"),
    ("HN", "HND", "340"), ("HR", "HRV", "191"), ("HT", "HTI", "332"), ("HU", "HUN", "348"),
    ("ID", "IDN", "360"), ("IE", "IRL", "372"), ("IL", "ISR", "376"), ("IM", "IMN", "833"),
    ("IN", "IND", "356"), ("IO", "IOT", "086"), ("IQ", "IRQ", "368"), ("IR", "IRN", "364"),
    ("IS", "ISL", "352"), ("IT", "ITA", "380"), ("JE", "JEY", "832"), ("JM", "JAM", "388"),
    ("JO", "JOR", "400"), ("JP", "JPN", "392"), ("KE", "KEN", "404"), ("KG", "KGZ", "417"),
    ("KH", "KHM", "116"), ("KI", "KIR", "296"), ("KM", "COM", "174"), ("KN", "KNA", "659"),
    ("KP", "PRK", "408"), ("KR", "KOR", "410"), ("KW", "KWT", "414"), ("KY", "CYM", "136"),
    ("KZ", "KAZ", "398"), ("LA", "LAO", "418"), ("LB", "LBN", "422"), ("LC", "LCA", "662"),
    ("LI", "LIE", "438"), ("LK", "LKA", "144"), ("LR", "LBR", "430"), ("LS", "LSO", "426"),
    ("LT", "LTU", "440"), ("LU", "LUX", "442"), ("LV", "LVA", "428"), ("LY", "LBY", "434"),
    ("MA", "MAR", "504"), ("MC", "MCO", "492"), ("MD", "MDA", "498"), ("ME", "MNE", "499"),
    ("MF", "MAF", "663"), ("MG", "MDG", "450"), ("MH", "MHL", "584"), ("MK", "MKD", "807"),
    ("ML", "MLI", "466"), ("MM", "MMR", "104"), ("MN", "MNG", "496"), ("MO", "MAC", "446"),
    ("MP", "MNP", "580"), ("MQ", "MTQ", "474"), ("MR", "MRT", "478"), ("MS", "MSR", "500"),
    ("MT", "MLT", "470"), ("MU", "MUS", "480"), ("MV", "MDV", "462"), ("MW", "MWI", "454"),
    ("MX", "MEX", "484"), ("MY", "MYS", "458"), ("MZ", "MOZ", "508"), ("NA", "NAM", "516"),
    ("NC", "NCL", "540"), ("NE", "NER", "562"), ("NF", "NFK", "574"), ("NG", "NGA", "566"),
    ("NI", "NIC", "558"), ("NL", "NLD", "528"), ("NO", "NOR", "578"), ("NP", "NPL", "524"),
    ("NR", "NRU", "520"), ("NU", "NIU", "570"), ("NZ", "NZL", "554"), ("OM", "OMN", "512"),
    ("PA", "PAN", "591"), ("PE", "PER", "604"), ("PF", "PYF", "258"), ("PG", "PNG", "598"),
    ("PH", "PHL", "608"), ("PK", "PAK", "586"), ("PL", "POL", "616"), ("PM", "SPM", "666"),
    ("PN", "PCN", "612"), ("PR", "PRI", "630"), ("PS", "PSE", "275"), ("PT", "PRT", "620"),
    ("PW", "PLW", "585"), ("PY", "PRY", "600"), ("QA", "QAT", "634"), ("RE", "REU", "638"),
    ("RO", "ROU", "642"), ("RS", "SRB", "688"), ("RU", "RUS", "643"), ("RW", "RWA", "646"),
    ("SA", "SAU", "682"), ("SB", "SLB", "090"), ("SC", "SYC", "690"), ("SD", "SDN", "729"),
    ("SE", "SWE", "752"), ("SG", "SGP", "702"), ("SH", "SHN", "654"), ("SI", "SVN", "705"),
    ("SJ", "SJM", "744"), ("SK", "SVK", "703"), ("SL", "SLE", "694"), ("SM", "SMR", "674"),
    ("SN", "SEN", "686"), ("SO", "SOM", "706"), ("SR", "SUR", "740"), ("SS", "SSD", "728"),
    ("ST", "STP", "678"), ("SV", "SLV", "222"), ("SX", "SXM", "534"), ("SY", "SYR", "760"),
    ("SZ", "SWZ", "748"), ("TC", "TCA", "796"), ("TD", "TCD", "148"), ("TF", "ATF", "260"),
    ("TG", "TGO", "768"), ("TH", "THA", "764"), ("TJ", "TJK", "762"), ("TK", "TKL", "772"),
    ("TL", "TLS", "626"), ("TM", "TKM", "795"), ("TN", "TUN", "788"), ("TO", "TON", "776"),
    ("TR", "TUR", "792"), ("TT", "TTO", "780"), ("TV", "TUV", "798"), ("TW", "TWN", "158"),
    ("TZ", "TZA", "834"), ("UA", "UKR", "804"), ("UG", "UGA", "800"), ("UM", "UMI", "581"),
    ("US", "USA", "840"), ("UY", "URY", "858"), ("UZ", "UZB", "860"), ("VA", "VAT", "336"),
    ("VC", "VCT", "670"), ("VE", "VEN", "862"), ("VG", "VGB", "092"), ("VI", "VIR", "850"),
    ("VN", "VNM", "704"), ("VU", "VUT", "548"), ("WF", "WLF", "876"), ("WS", "WSM", "882"),
    ("YE", "YEM", "887"), ("YT", "MYT", "175"), ("ZA", "ZAF", "710"), ("ZM", "ZMB", "894"),
    ("ZW", "ZWE", "716"),
];

/// ISO 3166-2 subdivisions, for a subset of countries only. Codes of other
/// countries never match.
const REGIONS: &[(&str, &[&str])] = &[
    ("AT", &["1", "2", "3", "4", "5", "6", "7", "8", "9"]),
    ("AU", &["ACT", "NSW", "NT", "QLD", "SA", "TAS", "VIC", "WA"]),
    (
        "BE",
        &[
            "BRU", "VAN", "VBR", "VLG", "VLI", "VOV", "VWV", "WAL", "WBR", "WHT", "WLG", "WLX",
            "WNA",
        ],
    ),
    (
        "BR",
        &[
            "AC", "AL", "AM", "AP", "BA", "CE", "DF", "ES", "GO", "MA", "MG", "MS", "MT", "PA",
            "PB", "PE", "PI", "PR", "RJ", "RN", "RO", "RR", "RS", "SC", "SE", "SP", "TO",
        ],
    ),
    (
        "CA",
        &["AB", "BC", "MB", "NB", "NL", "NS", "NT", "NU", "ON", "PE", "QC", "SK", "YT"],
    ),
    (
        "CH",
        &[
            "AG", "AI", "AR", "BE", "BL", "BS", "FR", "GE", "GL", "GR", "JU", "LU", "NE", "NW",
            "OW", "SG", "SH", "SO", "SZ", "TG", "TI", "UR", "VD", "VS", "ZG", "ZH",
        ],
    ),
    (
        "DE",
        &[
            "BB", "BE", "BW", "BY", "HB", "HE", "HH", "MV", "NI", "NW", "RP", "SH", "SL", "SN",
            "ST", "TH",
        ],
    ),
    (
        "FR",
        &[
            "20R", "ARA", "BFC", "BRE", "CVL", "GES", "HDF", "IDF", "NAQ", "NOR", "OCC", "PAC",
            "PDL",
        ],
    ),
    (
        "JP",
        &[
            "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12", "13", "14",
            "15", "16", "17", "18", "19", "20", "21", "22", "23", "24", "25", "26", "27", "28",
            "29", "30", "31", "32", "33", "34", "35", "36", "37", "38", "39", "40", "41", "42",
            "43", "44", "45", "46", "47",
        ],
    ),
    (
        "MX",
        &[
            "AGU", "BCN", "BCS", "CAM", "CHH", "CHP", "CMX", "COA", "COL", "DUR", "GRO", "GUA",
            "HID", "JAL", "MEX", "MIC", "MOR", "NAY", "NLE", "OAX", "PUE", "QUE", "ROO", "SIN",
            "SLP", "SON", "TAB", "TAM", "TLA", "VER", "YUC", "ZAC",
        ],
    ),
    (
        "NL",
        &[
            "AW", "BQ1", "BQ2", "BQ3", "CW", "DR", "FL", "FR", "GE", "GR", "LI", "NB", "NH",
            "OV", "SX", "UT", "ZE", "ZH",
        ],
    ),
    (
        "NZ",
        &[
            "AUK", "BOP", "CAN", "CIT", "GIS", "HKB", "MBH", "MWT", "NSN", "NTL", "OTA", "STL",
            "TAS", "TKI", "WGN", "WKO", "WTC",
        ],
    ),
    (
        "PL",
        &[
            "DS", "KP", "LB", "LD", "LU", "MA", "MZ", "OP", "PD", "PK", "PM", "SK", "SL", "WN",
            "WP", "ZP",
        ],
    ),
    (
        "SE",
        &[
            "AB", "AC", "BD", "C", "D", "E", "F", "G", "H", "I", "K", "M", "N", "O", "S", "T",
            "U", "W", "X", "Y", "Z",
        ],
    ),
    (
        "US",
        &[
            "AK", "AL", "AR", "AS", "AZ", "CA", "CO", "CT", "DC", "DE", "FL", "GA", "GU", "HI",
            "IA", "ID", "IL", "IN", "KS", "KY", "LA", "MA", "MD", "ME", "MI", "MN", "MO", "MP",
            "MS", "MT", "NC", "ND", "NE", "NH", "NJ", "NM", "NV", "NY", "OH", "OK", "OR", "PA",
            "PR", "RI", "SC", "SD", "TN", "TX", "UM", "UT", "VA", "VI", "VT", "WA", "WI", "WV",
            "WY",
        ],
    ),
];

static CURRENCY_ALPHA: OnceLock<HashSet<&'static str>> = OnceLock::new();
static CURRENCY_NUMERIC: OnceLock<HashSet<&'static str>> = OnceLock::new();
static CURRENCY_HISTORICAL: OnceLock<HashSet<&'static str>> = OnceLock::new();
static CURRENCY_CRYPTO: OnceLock<HashSet<&'static str>> = OnceLock::new();
static COUNTRY_ALPHA2: OnceLock<HashSet<&'static str>> = OnceLock::new();
static COUNTRY_ALPHA3: OnceLock<HashSet<&'static str>> = OnceLock::new();
static COUNTRY_NUMERIC: OnceLock<HashSet<&'static str>> = OnceLock::new();
static REGION_CODES: OnceLock<HashSet<String>> = OnceLock::new();

/// Active ISO 4217 alphabetic code.
pub fn is_currency(code: &str) -> bool {
    CURRENCY_ALPHA
        .get_or_init(|| CURRENCIES.iter().map(|(alpha, _)| *alpha).collect())
        .contains(code)
}

/// Active ISO 4217 numeric code (three digits, zero padded).
pub fn is_currency_numeric(code: &str) -> bool {
    CURRENCY_NUMERIC
        .get_or_init(|| CURRENCIES.iter().map(|(_, numeric)| *numeric).collect())
        .contains(code)
}

/// Withdrawn ISO 4217 alphabetic code.
pub fn is_historical_currency(code: &str) -> bool {
    CURRENCY_HISTORICAL
        .get_or_init(|| HISTORICAL_CURRENCIES.iter().copied().collect())
        .contains(code)
}

pub fn is_crypto_currency(code: &str) -> bool {
    CURRENCY_CRYPTO
        .get_or_init(|| CRYPTO_CURRENCIES.iter().copied().collect())
        .contains(code)
}

pub fn is_country_alpha2(code: &str) -> bool {
    COUNTRY_ALPHA2
        .get_or_init(|| COUNTRIES.iter().map(|(a2, _, _)| *a2).collect())
        .contains(code)
}

pub fn is_country_alpha3(code: &str) -> bool {
    COUNTRY_ALPHA3
        .get_or_init(|| COUNTRIES.iter().map(|(_, a3, _)| *a3).collect())
        .contains(code)
}

pub fn is_country_numeric(code: &str) -> bool {
    COUNTRY_NUMERIC
        .get_or_init(|| COUNTRIES.iter().map(|(_, _, n)| *n).collect())
        .contains(code)
}

/// ISO 3166-2 code in `CC-SUB` form, e.g. `US-CA`.
///
/// Covers the countries in [`region_countries`]; a well-formed code of any
/// other country is rejected.
pub fn is_region_code(code: &str) -> bool {
    REGION_CODES
        .get_or_init(|| {
            REGIONS
                .iter()
                .flat_map(|(country, subs)| subs.iter().map(move |sub| format!("{country}-{sub}")))
                .collect()
        })
        .contains(code)
}

/// Alpha-2 codes of the countries whose subdivisions [`is_region_code`] knows.
pub fn region_countries() -> impl Iterator<Item = &'static str> {
    REGIONS.iter().map(|(country, _)| *country)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currencies() {
        assert!(is_currency("EUR"));
        assert!(is_currency("USD"));
        assert!(!is_currency("usd"));
        assert!(!is_currency("DEM"));
        assert!(is_historical_currency("DEM"));
        assert!(is_currency_numeric("978"));
        assert!(is_currency_numeric("008"));
        assert!(!is_currency_numeric("8"));
        assert!(is_crypto_currency("BTC"));
    }

    #[test]
    fn countries() {
        assert!(is_country_alpha2("GB"));
        assert!(is_country_alpha3("GBR"));
        assert!(is_country_numeric("826"));
        assert!(!is_country_alpha2("UK"));
        assert_eq!(COUNTRIES.len(), 249);
    }

    #[test]
    fn tables_have_no_duplicates() {
        let alpha: HashSet<_> = CURRENCIES.iter().map(|(a, _)| a).collect();
        assert_eq!(alpha.len(), CURRENCIES.len());
        let a2: HashSet<_> = COUNTRIES.iter().map(|(a, _, _)| a).collect();
        let a3: HashSet<_> = COUNTRIES.iter().map(|(_, a, _)| a).collect();
        let num: HashSet<_> = COUNTRIES.iter().map(|(_, _, n)| n).collect();
        assert_eq!(a2.len(), COUNTRIES.len());
        assert_eq!(a3.len(), COUNTRIES.len());
        assert_eq!(num.len(), COUNTRIES.len());
    }

    #[test]
    fn regions() {
        assert!(is_region_code("US-CA"));
        assert!(is_region_code("CA-QC"));
        assert!(is_region_code("DE-BY"));
        assert!(!is_region_code("US-XX"));
        assert!(!is_region_code("CA"));
        assert!(is_region_code("JP-13"));
        assert!(is_region_code("MX-CMX"));
        assert!(is_region_code("SE-AB"));
        assert!(is_region_code("AT-9"));
        assert!(!is_region_code("JP-48"));
        // countries outside the book are rejected even when well-formed
        assert!(!is_region_code("GB-LND"));
    }

    #[test]
    fn region_book_is_keyed_by_known_countries() {
        let countries: Vec<_> = region_countries().collect();
        let mut sorted = countries.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted, countries);
        assert!(countries.iter().all(|c| is_country_alpha2(c)));
        assert!(REGIONS.iter().all(|(_, subs)| !subs.is_empty()));
    }
}
