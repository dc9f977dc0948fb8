//! Local coordinate-to-zone heuristic
//!
//! Approximate by construction: each zone is represented by one or more
//! reference points (usually its principal city) and a coordinate maps to the
//! zone of the nearest reference point, provided that point lies within
//! `max_distance_meters`. There are no zone polygons, so coordinates near a
//! zone border can land in the neighbouring zone. Points far from every
//! reference (open ocean, polar regions) yield no match and fall through to
//! the next resolution tier.

use chrono_tz::Tz;
use shiftclock_domain::constants::DEFAULT_ZONE_MATCH_DISTANCE_KM;
use shiftclock_domain::Coordinate;
use tracing::warn;

/// Reference points: (zone, latitude, longitude).
const BUILTIN_ZONES: &[(&str, f64, f64)] = &[
    // North America
    ("America/New_York", 40.7128, -74.0060),
    ("America/Chicago", 41.8781, -87.6298),
    ("America/Denver", 39.7392, -104.9903),
    ("America/Phoenix", 33.4484, -112.0740),
    ("America/Los_Angeles", 34.0522, -118.2437),
    ("America/Anchorage", 61.2181, -149.9003),
    ("America/Toronto", 43.6532, -79.3832),
    ("America/Vancouver", 49.2827, -123.1207),
    ("America/Edmonton", 53.5461, -113.4938),
    ("America/Winnipeg", 49.8951, -97.1384),
    ("America/Halifax", 44.6488, -63.5752),
    ("America/St_Johns", 47.5615, -52.7126),
    ("America/Mexico_City", 19.4326, -99.1332),
    ("America/Guatemala", 14.6349, -90.5069),
    ("America/Panama", 8.9824, -79.5199),
    ("America/Havana", 23.1136, -82.3666),
    ("America/Nuuk", 64.1814, -51.6941),
    ("Pacific/Honolulu", 21.3069, -157.8583),
    // South America
    ("America/Bogota", 4.7110, -74.0721),
    ("America/Caracas", 10.4806, -66.9036),
    ("America/Lima", -12.0464, -77.0428),
    ("America/La_Paz", -16.4897, -68.1193),
    ("America/Santiago", -33.4489, -70.6693),
    ("America/Argentina/Buenos_Aires", -34.6037, -58.3816),
    ("America/Sao_Paulo", -23.5505, -46.6333),
    ("America/Manaus", -3.1190, -60.0217),
    ("Pacific/Galapagos", -0.9017, -89.6100),
    // Atlantic
    ("Atlantic/Reykjavik", 64.1466, -21.9426),
    ("Atlantic/Azores", 37.7412, -25.6756),
    ("Atlantic/Canary", 28.1235, -15.4363),
    // Europe
    ("Europe/London", 51.5074, -0.1278),
    ("Europe/Dublin", 53.3498, -6.2603),
    ("Europe/Lisbon", 38.7223, -9.1393),
    ("Europe/Madrid", 40.4168, -3.7038),
    ("Europe/Paris", 48.8566, 2.3522),
    ("Europe/Berlin", 52.5200, 13.4050),
    ("Europe/Rome", 41.9028, 12.4964),
    ("Europe/Stockholm", 59.3293, 18.0686),
    ("Europe/Warsaw", 52.2297, 21.0122),
    ("Europe/Athens", 37.9838, 23.7275),
    ("Europe/Kyiv", 50.4501, 30.5234),
    ("Europe/Istanbul", 41.0082, 28.9784),
    ("Europe/Moscow", 55.7558, 37.6173),
    // Africa
    ("Africa/Casablanca", 33.5731, -7.5898),
    ("Africa/Algiers", 36.7538, 3.0588),
    ("Africa/Dakar", 14.7167, -17.4677),
    ("Africa/Lagos", 6.5244, 3.3792),
    ("Africa/Kinshasa", -4.4419, 15.2663),
    ("Africa/Cairo", 30.0444, 31.2357),
    ("Africa/Khartoum", 15.5007, 32.5599),
    ("Africa/Nairobi", -1.2921, 36.8219),
    ("Africa/Johannesburg", -26.2041, 28.0473),
    // Asia
    ("Asia/Dubai", 25.2048, 55.2708),
    ("Asia/Riyadh", 24.7136, 46.6753),
    ("Asia/Tehran", 35.6892, 51.3890),
    ("Asia/Karachi", 24.8607, 67.0011),
    ("Asia/Tashkent", 41.2995, 69.2401),
    ("Asia/Almaty", 43.2220, 76.8512),
    ("Asia/Kolkata", 28.6139, 77.2090),
    ("Asia/Kolkata", 19.0760, 72.8777),
    ("Asia/Kolkata", 22.5726, 88.3639),
    ("Asia/Kathmandu", 27.7172, 85.3240),
    ("Asia/Dhaka", 23.8103, 90.4125),
    ("Asia/Yekaterinburg", 56.8389, 60.6057),
    ("Asia/Novosibirsk", 55.0084, 82.9357),
    ("Asia/Krasnoyarsk", 56.0153, 92.8932),
    ("Asia/Irkutsk", 52.2870, 104.3050),
    ("Asia/Yakutsk", 62.0355, 129.6755),
    ("Asia/Vladivostok", 43.1198, 131.8869),
    ("Asia/Magadan", 59.5612, 150.8301),
    ("Asia/Kamchatka", 53.0452, 158.6483),
    ("Asia/Urumqi", 43.8256, 87.6168),
    ("Asia/Ulaanbaatar", 47.8864, 106.9057),
    ("Asia/Bangkok", 13.7563, 100.5018),
    ("Asia/Singapore", 1.3521, 103.8198),
    ("Asia/Jakarta", -6.2088, 106.8456),
    ("Asia/Manila", 14.5995, 120.9842),
    ("Asia/Hong_Kong", 22.3193, 114.1694),
    ("Asia/Shanghai", 31.2304, 121.4737),
    ("Asia/Shanghai", 39.9042, 116.4074),
    ("Asia/Seoul", 37.5665, 126.9780),
    ("Asia/Tokyo", 35.6762, 139.6503),
    ("Asia/Jayapura", -2.5337, 140.7181),
    // Indian Ocean
    ("Indian/Maldives", 4.1755, 73.5093),
    ("Indian/Mauritius", -20.1609, 57.5012),
    // Oceania
    ("Australia/Perth", -31.9505, 115.8605),
    ("Australia/Darwin", -12.4634, 130.8456),
    ("Australia/Adelaide", -34.9285, 138.6007),
    ("Australia/Brisbane", -27.4698, 153.0251),
    ("Australia/Sydney", -33.8688, 151.2093),
    ("Australia/Hobart", -42.8821, 147.3272),
    ("Pacific/Port_Moresby", -9.4438, 147.1803),
    ("Pacific/Guam", 13.4443, 144.7937),
    ("Pacific/Noumea", -22.2558, 166.4505),
    ("Pacific/Auckland", -36.8485, 174.7633),
    ("Pacific/Chatham", -43.9535, -176.5597),
    ("Pacific/Fiji", -18.1248, 178.4501),
    ("Pacific/Tongatapu", -21.1394, -175.2049),
    ("Pacific/Apia", -13.8333, -171.7667),
    ("Pacific/Tahiti", -17.5516, -149.5585),
    ("Pacific/Easter", -27.1127, -109.3497),
    // Antarctica
    ("Antarctica/McMurdo", -77.8419, 166.6863),
];

/// Best catalog match for a coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneMatch {
    pub zone: Tz,
    pub distance_meters: f64,
}

/// Fixed set of reference points with a match radius
#[derive(Debug, Clone)]
pub struct ZoneCatalog {
    entries: Vec<(Tz, Coordinate)>,
    max_distance_meters: f64,
}

impl ZoneCatalog {
    /// Catalog over the built-in reference points with the default match
    /// radius.
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_ZONES.iter().map(|(zone, lat, lng)| (*zone, Coordinate::new(*lat, *lng))),
        )
    }

    /// Catalog over caller-supplied reference points. Identifiers that are
    /// not known IANA zones are skipped.
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, Coordinate)>) -> Self {
        let entries = entries
            .into_iter()
            .filter_map(|(zone, coordinate)| match zone.parse::<Tz>() {
                Ok(tz) => Some((tz, coordinate)),
                Err(_) => {
                    warn!(zone, "skipping unknown timezone in catalog");
                    None
                }
            })
            .collect();

        Self { entries, max_distance_meters: DEFAULT_ZONE_MATCH_DISTANCE_KM * 1_000.0 }
    }

    /// A catalog that never matches.
    pub fn empty() -> Self {
        Self { entries: Vec::new(), max_distance_meters: 0.0 }
    }

    pub fn with_max_distance_km(mut self, km: f64) -> Self {
        self.max_distance_meters = km.max(0.0) * 1_000.0;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nearest reference point within the match radius.
    pub fn nearest(&self, coordinate: &Coordinate) -> Option<ZoneMatch> {
        self.entries
            .iter()
            .map(|(zone, reference)| ZoneMatch {
                zone: *zone,
                distance_meters: reference.distance_to(coordinate),
            })
            .filter(|candidate| candidate.distance_meters <= self.max_distance_meters)
            .min_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters))
    }
}

impl Default for ZoneCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone_at(lat: f64, lng: f64) -> Option<String> {
        ZoneCatalog::builtin()
            .nearest(&Coordinate::new(lat, lng))
            .map(|m| m.zone.name().to_string())
    }

    #[test]
    fn builtin_entries_are_all_known_zones() {
        assert_eq!(ZoneCatalog::builtin().len(), BUILTIN_ZONES.len());
    }

    #[test]
    fn matches_nearby_cities() {
        assert_eq!(zone_at(40.0, -75.0).as_deref(), Some("America/New_York"));
        assert_eq!(zone_at(48.1351, 11.5820).as_deref(), Some("Europe/Berlin"));
        assert_eq!(zone_at(-35.2809, 149.1300).as_deref(), Some("Australia/Sydney"));
        assert_eq!(zone_at(12.9716, 77.5946).as_deref(), Some("Asia/Kolkata"));
    }

    #[test]
    fn matches_across_the_antimeridian() {
        // East of 180 degrees, closest to Suva on the other side.
        assert_eq!(zone_at(-17.8, -179.9).as_deref(), Some("Pacific/Fiji"));
    }

    #[test]
    fn open_ocean_has_no_match() {
        // Point Nemo, the oceanic pole of inaccessibility.
        assert_eq!(zone_at(-48.8767, -123.3933), None);
    }

    #[test]
    fn match_radius_is_respected() {
        let catalog = ZoneCatalog::builtin().with_max_distance_km(50.0);
        // Philadelphia is ~130 km from the New York reference point.
        assert!(catalog.nearest(&Coordinate::new(39.9526, -75.1652)).is_none());
        assert!(catalog.nearest(&Coordinate::new(40.73, -73.99)).is_some());
    }

    #[test]
    fn unknown_zones_are_skipped() {
        let catalog = ZoneCatalog::new([
            ("Europe/Paris", Coordinate::new(48.8566, 2.3522)),
            ("Atlantis/Central", Coordinate::new(0.0, 0.0)),
        ]);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn empty_catalog_never_matches() {
        let catalog = ZoneCatalog::empty();
        assert!(catalog.is_empty());
        assert!(catalog.nearest(&Coordinate::new(40.7128, -74.0060)).is_none());
    }
}
