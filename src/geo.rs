use crate::data::models::Coordinates;

pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Distance in miles between two points, by the spherical law of cosines.
///
/// Identical points are exactly `0.0` apart. Rounding can push the cosine of
/// the central angle just outside `[-1, 1]` for identical or antipodal
/// points, so it is clamped before `acos`.
pub fn distance(from: Coordinates, to: Coordinates) -> f64 {
    if from == to {
        return 0.0;
    }

    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lon = to.longitude.to_radians() - from.longitude.to_radians();

    let cosine = lat1.cos() * lat2.cos() * delta_lon.cos() + lat1.sin() * lat2.sin();
    EARTH_RADIUS_MILES * arc_cosine(cosine)
}

fn arc_cosine(cosine: f64) -> f64 {
    cosine.clamp(-1.0, 1.0).acos()
}
