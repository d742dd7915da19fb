//! Geographic helpers
//!
//! Everything here is pure and synchronous: distance between coordinates,
//! ordering cities by distance from the user, and parsing/framing of city
//! boundary polygons.

use crate::error::ParseError;
use crate::types::{City, GeoPoint};

/// WGS84 semi-major axis in metres
const WGS84_A: f64 = 6_378_137.0;
/// WGS84 semi-minor axis in metres
const WGS84_B: f64 = 6_356_752.3142;
/// Mean earth radius in metres, used by the haversine fallback
const MEAN_EARTH_RADIUS: f64 = 6_371_008.8;

const MAX_ITERATIONS: usize = 20;
const CONVERGENCE_THRESHOLD: f64 = 1.0e-12;

/// Distance in metres between two coordinates on the WGS84 ellipsoid
///
/// Uses Vincenty's inverse formula. Identical coordinates are zero metres
/// apart. Nearly antipodal points, where the iteration does not converge,
/// fall back to the great-circle distance.
pub fn distance_between(from: GeoPoint, to: GeoPoint) -> f64 {
    let flattening = (WGS84_A - WGS84_B) / WGS84_A;
    let second_eccentricity_sq = (WGS84_A * WGS84_A - WGS84_B * WGS84_B) / (WGS84_B * WGS84_B);

    let l = (to.longitude - from.longitude).to_radians();
    let u1 = ((1.0 - flattening) * from.latitude.to_radians().tan()).atan();
    let u2 = ((1.0 - flattening) * to.latitude.to_radians().tan()).atan();

    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();
    let sin_u1_sin_u2 = sin_u1 * sin_u2;
    let cos_u1_cos_u2 = cos_u1 * cos_u2;

    let mut lambda = l;

    for _ in 0..MAX_ITERATIONS {
        let previous_lambda = lambda;
        let (sin_lambda, cos_lambda) = lambda.sin_cos();

        let t1 = cos_u2 * sin_lambda;
        let t2 = cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda;
        let sin_sigma = (t1 * t1 + t2 * t2).sqrt();
        let cos_sigma = sin_u1_sin_u2 + cos_u1_cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);

        let sin_alpha = if sin_sigma == 0.0 {
            0.0
        } else {
            cos_u1_cos_u2 * sin_lambda / sin_sigma
        };
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        let cos_2sm = if cos_sq_alpha == 0.0 {
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1_sin_u2 / cos_sq_alpha
        };
        let cos_2sm_sq = cos_2sm * cos_2sm;

        let u_sq = cos_sq_alpha * second_eccentricity_sq;
        let a_coef = 1.0
            + (u_sq / 16384.0) * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
        let b_coef = (u_sq / 1024.0) * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
        let c = (flattening / 16.0) * cos_sq_alpha * (4.0 + flattening * (4.0 - 3.0 * cos_sq_alpha));

        let delta_sigma = b_coef
            * sin_sigma
            * (cos_2sm
                + (b_coef / 4.0)
                    * (cos_sigma * (-1.0 + 2.0 * cos_2sm_sq)
                        - (b_coef / 6.0)
                            * cos_2sm
                            * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                            * (-3.0 + 4.0 * cos_2sm_sq)));

        lambda = l
            + (1.0 - c)
                * flattening
                * sin_alpha
                * (sigma + c * sin_sigma * (cos_2sm + c * cos_sigma * (-1.0 + 2.0 * cos_2sm_sq)));

        if (lambda - previous_lambda).abs() < CONVERGENCE_THRESHOLD {
            return WGS84_B * a_coef * (sigma - delta_sigma);
        }
    }

    tracing::trace!(?from, ?to, "Vincenty did not converge, using haversine");
    haversine(from, to)
}

/// Great-circle distance in metres on a spherical earth
fn haversine(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    MEAN_EARTH_RADIUS * c
}

/// Order cities by ascending distance from the user
///
/// Without a location the input order is returned as is. With one, the sort
/// is stable: cities at equal distance keep their relative input order.
pub fn sort_by_distance(cities: &[City], user_location: Option<GeoPoint>) -> Vec<City> {
    let Some(origin) = user_location else {
        return cities.to_vec();
    };

    rank_by_distance(cities, origin)
        .into_iter()
        .map(|(_, city)| city.clone())
        .collect()
}

/// Pair each city with its distance from `origin`, nearest first
///
/// Same ordering as [`sort_by_distance`], keeping the computed distances.
pub fn rank_by_distance(cities: &[City], origin: GeoPoint) -> Vec<(f64, &City)> {
    let mut ranked: Vec<(f64, &City)> = cities
        .iter()
        .map(|city| (distance_between(origin, city.location()), city))
        .collect();
    ranked.sort_by(|(a, _), (b, _)| a.total_cmp(b));
    ranked
}

/// Parse a boundary polygon
///
/// The input is a comma-separated list of `"lon lat"` pairs. The returned
/// points keep input order; the closing edge back to the first point is
/// implicit and nothing checks the polygon for self-intersections.
///
/// # Errors
///
/// Returns `ParseError::BadPair` when a pair does not have exactly two
/// whitespace-separated tokens, and `ParseError::BadNumber` when a token is
/// not a floating-point number.
///
/// # Examples
///
/// ```
/// use libcities::geo::parse_boundary;
/// use libcities::GeoPoint;
///
/// let points = parse_boundary("10.0 20.0, 30.0 40.0").unwrap();
/// assert_eq!(points, vec![GeoPoint::new(20.0, 10.0), GeoPoint::new(40.0, 30.0)]);
/// ```
pub fn parse_boundary(points: &str) -> std::result::Result<Vec<GeoPoint>, ParseError> {
    points.split(',').map(parse_pair).collect()
}

fn parse_pair(pair: &str) -> std::result::Result<GeoPoint, ParseError> {
    let tokens: Vec<&str> = pair.split_whitespace().collect();
    let [lon, lat] = tokens.as_slice() else {
        return Err(ParseError::BadPair(pair.trim().to_string()));
    };

    Ok(GeoPoint::new(parse_coordinate(lat)?, parse_coordinate(lon)?))
}

fn parse_coordinate(token: &str) -> std::result::Result<f64, ParseError> {
    token
        .parse()
        .map_err(|_| ParseError::BadNumber(token.to_string()))
}

/// Axis-aligned bounding box of a set of points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: GeoPoint,
    pub north_east: GeoPoint,
}

impl Bounds {
    /// Smallest box containing every point, or `None` for no points
    pub fn of(points: &[GeoPoint]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let init = Bounds {
            south_west: *first,
            north_east: *first,
        };

        Some(rest.iter().fold(init, |bounds, point| Bounds {
            south_west: GeoPoint::new(
                bounds.south_west.latitude.min(point.latitude),
                bounds.south_west.longitude.min(point.longitude),
            ),
            north_east: GeoPoint::new(
                bounds.north_east.latitude.max(point.latitude),
                bounds.north_east.longitude.max(point.longitude),
            ),
        }))
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.south_west.latitude + self.north_east.latitude) / 2.0,
            (self.south_west.longitude + self.north_east.longitude) / 2.0,
        )
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.south_west.latitude..=self.north_east.latitude).contains(&point.latitude)
            && (self.south_west.longitude..=self.north_east.longitude).contains(&point.longitude)
    }
}
