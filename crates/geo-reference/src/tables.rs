//! Compiled-in coordinate and region lookup tables.
//!
//! Keys are lowercase; callers lowercase their input before lookup. The city
//! table favors metros where incident feeds actually report free-text
//! locations, not completeness.

use crate::CanonicalRegion;

/// City name (lowercase) to approximate center coordinates.
pub const CITY_COORDS: &[(&str, f64, f64)] = &[
    ("austin", 30.2672, -97.7431),
    ("round rock", 30.5083, -97.6788),
    ("dallas", 32.7767, -96.797),
    ("houston", 29.7604, -95.3698),
    ("new york", 40.7128, -74.006),
    ("boston", 42.3601, -71.0589),
    ("chicago", 41.8781, -87.6298),
    ("los angeles", 34.0522, -118.2437),
    ("san francisco", 37.7749, -122.4194),
    ("seattle", 47.6062, -122.3321),
    ("washington", 38.9072, -77.0369),
    ("miami", 25.7617, -80.1918),
    ("nashville", 36.1627, -86.7816),
    ("toronto", 43.6532, -79.3832),
    ("mexico city", 19.4326, -99.1332),
    ("sao paulo", -23.5505, -46.6333),
    ("rio de janeiro", -22.9068, -43.1729),
    ("buenos aires", -34.6037, -58.3816),
    ("santiago", -33.4489, -70.6693),
    ("bogota", 4.711, -74.0721),
    ("lima", -12.0464, -77.0428),
    ("panama city", 8.9824, -79.5199),
    ("london", 51.5074, -0.1278),
    ("dublin", 53.3498, -6.2603),
    ("limerick", 52.6638, -8.6267),
    ("paris", 48.8566, 2.3522),
    ("frankfurt", 50.1109, 8.6821),
    ("berlin", 52.52, 13.405),
    ("amsterdam", 52.3676, 4.9041),
    ("madrid", 40.4168, -3.7038),
    ("bratislava", 48.1486, 17.1077),
    ("warsaw", 52.2297, 21.0122),
    ("cairo", 30.0444, 31.2357),
    ("johannesburg", -26.2041, 28.0473),
    ("dubai", 25.2048, 55.2708),
    ("tel aviv", 32.0853, 34.7818),
    ("istanbul", 41.0082, 28.9784),
    ("bangalore", 12.9716, 77.5946),
    ("bengaluru", 12.9716, 77.5946),
    ("hyderabad", 17.385, 78.4867),
    ("mumbai", 19.076, 72.8777),
    ("delhi", 28.7041, 77.1025),
    ("singapore", 1.3521, 103.8198),
    ("kuala lumpur", 3.139, 101.6869),
    ("penang", 5.4164, 100.3327),
    ("hong kong", 22.3193, 114.1694),
    ("shanghai", 31.2304, 121.4737),
    ("beijing", 39.9042, 116.4074),
    ("xiamen", 24.4798, 118.0894),
    ("chengdu", 30.5728, 104.0668),
    ("tokyo", 35.6762, 139.6503),
    ("seoul", 37.5665, 126.978),
    ("taipei", 25.033, 121.5654),
    ("manila", 14.5995, 120.9842),
    ("bangkok", 13.7563, 100.5018),
    ("jakarta", -6.2088, 106.8456),
    ("sydney", -33.8688, 151.2093),
    ("melbourne", -37.8136, 144.9631),
    ("auckland", -36.8485, 174.7633),
];

/// Country name (lowercase) to approximate centroid coordinates.
pub const COUNTRY_COORDS: &[(&str, f64, f64)] = &[
    ("united states", 39.8283, -98.5795),
    ("canada", 56.1304, -106.3468),
    ("mexico", 23.6345, -102.5528),
    ("brazil", -14.235, -51.9253),
    ("argentina", -38.4161, -63.6167),
    ("chile", -35.6751, -71.543),
    ("colombia", 4.5709, -74.2973),
    ("peru", -9.19, -75.0152),
    ("panama", 8.538, -80.7821),
    ("el salvador", 13.7942, -88.8965),
    ("united kingdom", 55.3781, -3.436),
    ("ireland", 53.4129, -8.2439),
    ("france", 46.2276, 2.2137),
    ("germany", 51.1657, 10.4515),
    ("netherlands", 52.1326, 5.2913),
    ("spain", 40.4637, -3.7492),
    ("italy", 41.8719, 12.5674),
    ("poland", 51.9194, 19.1451),
    ("slovakia", 48.669, 19.699),
    ("ukraine", 48.3794, 31.1656),
    ("turkey", 38.9637, 35.2433),
    ("israel", 31.0461, 34.8516),
    ("egypt", 26.8206, 30.8025),
    ("saudi arabia", 23.8859, 45.0792),
    ("united arab emirates", 23.4241, 53.8478),
    ("south africa", -30.5595, 22.9375),
    ("nigeria", 9.082, 8.6753),
    ("kenya", -0.0236, 37.9062),
    ("russia", 61.524, 105.3188),
    ("india", 20.5937, 78.9629),
    ("pakistan", 30.3753, 69.3451),
    ("china", 35.8617, 104.1954),
    ("japan", 36.2048, 138.2529),
    ("south korea", 35.9078, 127.7669),
    ("taiwan", 23.6978, 120.9605),
    ("singapore", 1.3521, 103.8198),
    ("malaysia", 4.2105, 101.9758),
    ("thailand", 15.87, 100.9925),
    ("vietnam", 14.0583, 108.2772),
    ("philippines", 12.8797, 121.774),
    ("indonesia", -0.7893, 113.9213),
    ("australia", -25.2744, 133.7751),
    ("new zealand", -40.9006, 174.886),
];

/// ISO alpha-2 code, lowercase country name, canonical region.
pub const COUNTRY_REGIONS: &[(&str, &str, CanonicalRegion)] = &[
    ("us", "united states", CanonicalRegion::Amer),
    ("ca", "canada", CanonicalRegion::Amer),
    ("mx", "mexico", CanonicalRegion::Latam),
    ("br", "brazil", CanonicalRegion::Latam),
    ("ar", "argentina", CanonicalRegion::Latam),
    ("cl", "chile", CanonicalRegion::Latam),
    ("co", "colombia", CanonicalRegion::Latam),
    ("pe", "peru", CanonicalRegion::Latam),
    ("pa", "panama", CanonicalRegion::Latam),
    ("sv", "el salvador", CanonicalRegion::Latam),
    ("cr", "costa rica", CanonicalRegion::Latam),
    ("gt", "guatemala", CanonicalRegion::Latam),
    ("ec", "ecuador", CanonicalRegion::Latam),
    ("uy", "uruguay", CanonicalRegion::Latam),
    ("ve", "venezuela", CanonicalRegion::Latam),
    ("gb", "united kingdom", CanonicalRegion::Emea),
    ("ie", "ireland", CanonicalRegion::Emea),
    ("fr", "france", CanonicalRegion::Emea),
    ("de", "germany", CanonicalRegion::Emea),
    ("nl", "netherlands", CanonicalRegion::Emea),
    ("be", "belgium", CanonicalRegion::Emea),
    ("es", "spain", CanonicalRegion::Emea),
    ("pt", "portugal", CanonicalRegion::Emea),
    ("it", "italy", CanonicalRegion::Emea),
    ("ch", "switzerland", CanonicalRegion::Emea),
    ("at", "austria", CanonicalRegion::Emea),
    ("pl", "poland", CanonicalRegion::Emea),
    ("cz", "czechia", CanonicalRegion::Emea),
    ("sk", "slovakia", CanonicalRegion::Emea),
    ("hu", "hungary", CanonicalRegion::Emea),
    ("ro", "romania", CanonicalRegion::Emea),
    ("ua", "ukraine", CanonicalRegion::Emea),
    ("se", "sweden", CanonicalRegion::Emea),
    ("no", "norway", CanonicalRegion::Emea),
    ("dk", "denmark", CanonicalRegion::Emea),
    ("fi", "finland", CanonicalRegion::Emea),
    ("gr", "greece", CanonicalRegion::Emea),
    ("tr", "turkey", CanonicalRegion::Emea),
    ("il", "israel", CanonicalRegion::Emea),
    ("eg", "egypt", CanonicalRegion::Emea),
    ("sa", "saudi arabia", CanonicalRegion::Emea),
    ("ae", "united arab emirates", CanonicalRegion::Emea),
    ("za", "south africa", CanonicalRegion::Emea),
    ("ng", "nigeria", CanonicalRegion::Emea),
    ("ke", "kenya", CanonicalRegion::Emea),
    ("ru", "russia", CanonicalRegion::Emea),
    ("in", "india", CanonicalRegion::Apjc),
    ("pk", "pakistan", CanonicalRegion::Apjc),
    ("bd", "bangladesh", CanonicalRegion::Apjc),
    ("lk", "sri lanka", CanonicalRegion::Apjc),
    ("cn", "china", CanonicalRegion::Apjc),
    ("jp", "japan", CanonicalRegion::Apjc),
    ("kr", "south korea", CanonicalRegion::Apjc),
    ("tw", "taiwan", CanonicalRegion::Apjc),
    ("hk", "hong kong", CanonicalRegion::Apjc),
    ("sg", "singapore", CanonicalRegion::Apjc),
    ("my", "malaysia", CanonicalRegion::Apjc),
    ("th", "thailand", CanonicalRegion::Apjc),
    ("vn", "vietnam", CanonicalRegion::Apjc),
    ("ph", "philippines", CanonicalRegion::Apjc),
    ("id", "indonesia", CanonicalRegion::Apjc),
    ("au", "australia", CanonicalRegion::Apjc),
    ("nz", "new zealand", CanonicalRegion::Apjc),
];

/// Exact city lookup. Input must already be lowercased and trimmed.
pub fn city_coordinates(city: &str) -> Option<(f64, f64)> {
    CITY_COORDS
        .iter()
        .find(|(name, _, _)| *name == city)
        .map(|(_, lat, lng)| (*lat, *lng))
}

/// Exact country-name lookup. Input must already be lowercased and trimmed.
pub fn country_coordinates(country: &str) -> Option<(f64, f64)> {
    COUNTRY_COORDS
        .iter()
        .find(|(name, _, _)| *name == country)
        .map(|(_, lat, lng)| (*lat, *lng))
}

/// Region for an ISO alpha-2 code (lowercase).
pub fn region_for_country_code(code: &str) -> Option<CanonicalRegion> {
    COUNTRY_REGIONS
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, _, region)| *region)
}

/// Region for a full country name (lowercase).
pub fn region_for_country_name(name: &str) -> Option<CanonicalRegion> {
    COUNTRY_REGIONS
        .iter()
        .find(|(_, n, _)| *n == name)
        .map(|(_, _, region)| *region)
}
