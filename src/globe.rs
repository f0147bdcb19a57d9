use crate::error::InvalidArgument;

/// WGS84 ellipsoid semi-major axis in meters
pub const WGS84_EQUATORIAL_RADIUS: f64 = 6_378_137.0;
/// WGS84 inverse flattening
pub const WGS84_INVERSE_FLATTENING: f64 = 298.257_223_563;

/// Ellipsoidal globe model
///
/// The frame-orchestration core treats this as an opaque value object: it is
/// stored on the host, stamped into the frame context every frame, and read
/// by viewpoints and drawing pipelines. Position conversion and terrain math
/// live with those collaborators, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Globe {
    equatorial_radius: f64,
    polar_radius: f64,
}

impl Globe {
    /// Globe with the WGS84 reference ellipsoid
    pub fn wgs84() -> Self {
        Self {
            equatorial_radius: WGS84_EQUATORIAL_RADIUS,
            polar_radius: WGS84_EQUATORIAL_RADIUS * (1.0 - 1.0 / WGS84_INVERSE_FLATTENING),
        }
    }

    /// Globe with a custom ellipsoid
    ///
    /// Fails when either radius is not a positive finite number.
    pub fn new(equatorial_radius: f64, inverse_flattening: f64) -> Result<Self, InvalidArgument> {
        if !equatorial_radius.is_finite() || equatorial_radius <= 0.0 {
            return Err(InvalidArgument::new(
                "equatorial_radius",
                "must be a positive finite number",
            ));
        }
        if !inverse_flattening.is_finite() || inverse_flattening <= 1.0 {
            return Err(InvalidArgument::new(
                "inverse_flattening",
                "must be a finite number greater than 1",
            ));
        }

        Ok(Self {
            equatorial_radius,
            polar_radius: equatorial_radius * (1.0 - 1.0 / inverse_flattening),
        })
    }

    pub fn equatorial_radius(&self) -> f64 {
        self.equatorial_radius
    }

    pub fn polar_radius(&self) -> f64 {
        self.polar_radius
    }

    /// Square of the ellipsoid's first eccentricity
    pub fn eccentricity_squared(&self) -> f64 {
        let ratio = self.polar_radius / self.equatorial_radius;
        1.0 - ratio * ratio
    }
}

impl Default for Globe {
    fn default() -> Self {
        Self::wgs84()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wgs84_radii() {
        let globe = Globe::wgs84();
        assert_eq!(globe.equatorial_radius(), 6_378_137.0);
        // Derived polar radius of the WGS84 ellipsoid
        assert!((globe.polar_radius() - 6_356_752.314_245).abs() < 1e-3);
    }

    #[test]
    fn test_default_is_wgs84() {
        assert_eq!(Globe::default(), Globe::wgs84());
    }

    #[test]
    fn test_custom_ellipsoid() {
        let globe = Globe::new(1000.0, 100.0).unwrap();
        assert_eq!(globe.equatorial_radius(), 1000.0);
        assert_eq!(globe.polar_radius(), 990.0);
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        assert!(Globe::new(0.0, 298.0).is_err());
        assert!(Globe::new(-1.0, 298.0).is_err());
        assert!(Globe::new(f64::NAN, 298.0).is_err());
    }

    #[test]
    fn test_rejects_degenerate_flattening() {
        assert!(Globe::new(6_378_137.0, 1.0).is_err());
        assert!(Globe::new(6_378_137.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_eccentricity_squared() {
        let globe = Globe::wgs84();
        assert!((globe.eccentricity_squared() - 0.006_694_379_990_14).abs() < 1e-9);
    }
}
