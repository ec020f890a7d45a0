use crate::error::AllotError;

/// Mean Earth radius in meters, matching the reference the rest of the system
/// uses for containment decisions.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters per degree of latitude.
pub const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Latitude beyond which the longitude-offset cosine term is clamped rather
/// than allowed to diverge. Catchments this close to a pole are outside the
/// supported operating region; the sampler's attempt budget bounds the damage.
pub const MAX_WORKING_LATITUDE_DEG: f64 = 85.0;

/// A bare lat/lon pair in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        GeoPoint { lat, lon }
    }
}

/// Arithmetic mean of latitudes and longitudes.
pub fn centroid(points: &[GeoPoint]) -> Result<GeoPoint, AllotError> {
    if points.is_empty() {
        return Err(AllotError::EmptyInput("centroid of zero points"));
    }
    let sum_lat: f64 = points.iter().map(|p| p.lat).sum();
    let sum_lon: f64 = points.iter().map(|p| p.lon).sum();
    let n = points.len() as f64;
    Ok(GeoPoint::new(sum_lat / n, sum_lon / n))
}

/// Great-circle distance in meters (haversine). Accurate at the tens-of-
/// kilometers scale catchments operate on; radius and containment decisions
/// must all go through this one function.
pub fn planar_distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Degree offsets `(lat_offset, lon_offset)` such that a box built from them
/// around a point at `at_latitude_deg` contains a circle of `radius_m`.
///
/// The longitude offset scales by `1 / cos(latitude)` for meridian
/// convergence. The cosine term is evaluated at most at
/// [`MAX_WORKING_LATITUDE_DEG`]: beyond that the offset is a clamped
/// approximation and the box is no longer guaranteed to contain the circle.
pub fn degree_offset_for_radius(radius_m: f64, at_latitude_deg: f64) -> (f64, f64) {
    let lat_offset = radius_m / METERS_PER_DEGREE_LAT;
    let clamped_lat = at_latitude_deg
        .abs()
        .min(MAX_WORKING_LATITUDE_DEG)
        .to_radians();
    let lon_offset = radius_m / (METERS_PER_DEGREE_LAT * clamped_lat.cos());
    (lat_offset, lon_offset)
}
