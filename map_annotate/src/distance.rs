//! Great-circle distance over sequences of geographic coordinates.

use crate::geometry::LngLat;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinates in kilometres.
pub fn haversine_km(a: LngLat, b: LngLat) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lng - a.lng).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Cumulative distance along `points` in kilometres. Zero for fewer than two
/// points.
pub fn path_length_km(points: &[LngLat]) -> f64 {
    points.windows(2).map(|w| haversine_km(w[0], w[1])).sum()
}

/// Formats a distance for display: whole metres below one kilometre,
/// otherwise kilometres with two decimals.
pub fn format_distance(km: f64) -> String {
    if km >= 1.0 {
        format!("{:.2} km", km)
    } else {
        format!("{:.0} m", km * 1000.0)
    }
}

/// Pointer readout shown while hovering the map.
pub fn format_lng_lat(coord: LngLat) -> String {
    format!("Lng: {:.5}, Lat: {:.5}", coord.lng, coord.lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_degree_of_latitude() {
        let d = haversine_km(LngLat::new(0.0, 0.0), LngLat::new(0.0, 1.0));
        assert!((d - 111.19).abs() < 111.19 * 0.005, "got {d}");
    }

    #[test]
    fn fewer_than_two_points_is_zero() {
        assert_eq!(path_length_km(&[]), 0.0);
        assert_eq!(path_length_km(&[LngLat::new(3.0, 4.0)]), 0.0);
    }

    #[test]
    fn display_threshold() {
        assert_eq!(format_distance(0.999), "999 m");
        assert_eq!(format_distance(1.0), "1.00 km");
        assert_eq!(format_distance(12.346), "12.35 km");
        assert_eq!(format_distance(0.0), "0 m");
    }

    #[test]
    fn readout_has_five_decimals() {
        assert_eq!(
            format_lng_lat(LngLat::new(-2.5, 51.5)),
            "Lng: -2.50000, Lat: 51.50000"
        );
    }
}
