/// ISO 3166-1 numeric code used when the billing address carries no usable
/// country: the gateway's home market, France.
pub const DEFAULT_COUNTRY_NUMERIC: u16 = 250;

/// Map an ISO 3166-1 alpha-2 code to its numeric code
///
/// Covers the markets a French storefront realistically bills to; the
/// billing XML falls back to France for anything else.
pub fn numeric_code(alpha2: &str) -> Option<u16> {
    match alpha2 {
        "AT" => Some(40),
        "AU" => Some(36),
        "BE" => Some(56),
        "BR" => Some(76),
        "CA" => Some(124),
        "CH" => Some(756),
        "CN" => Some(156),
        "CZ" => Some(203),
        "DE" => Some(276),
        "DK" => Some(208),
        "ES" => Some(724),
        "FI" => Some(246),
        "FR" => Some(250),
        "GB" => Some(826),
        "GF" => Some(254),
        "GP" => Some(312),
        "GR" => Some(300),
        "HR" => Some(191),
        "HU" => Some(348),
        "IE" => Some(372),
        "IT" => Some(380),
        "JP" => Some(392),
        "KR" => Some(410),
        "LU" => Some(442),
        "MA" => Some(504),
        "MC" => Some(492),
        "MQ" => Some(474),
        "MX" => Some(484),
        "NC" => Some(540),
        "NL" => Some(528),
        "NO" => Some(578),
        "NZ" => Some(554),
        "PF" => Some(258),
        "PL" => Some(616),
        "PT" => Some(620),
        "RE" => Some(638),
        "RO" => Some(642),
        "SE" => Some(752),
        "SG" => Some(702),
        "SN" => Some(686),
        "TR" => Some(792),
        "TW" => Some(158),
        "US" => Some(840),
        "YT" => Some(175),
        _ => None,
    }
}

/// Numeric code for a possibly-absent alpha-2 code, defaulting to France
pub fn numeric_or_default(alpha2: Option<&str>) -> u16 {
    alpha2
        .and_then(numeric_code)
        .unwrap_or(DEFAULT_COUNTRY_NUMERIC)
}
