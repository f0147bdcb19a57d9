use glam::{DVec3, Mat4, Vec3};

use crate::frame::FrameContext;

/// Viewpoint - camera/eye state projected onto the frame context
///
/// `apply_state` is an idempotent read: calling it any number of times with
/// the same internal state stamps the same matrices. The remaining accessors
/// exist so viewpoint controllers can steer the camera through the trait
/// object without knowing the concrete type.
pub trait Viewpoint {
    /// Geographic latitude of the eye in degrees
    fn latitude(&self) -> f64;
    fn set_latitude(&mut self, degrees: f64);

    /// Geographic longitude of the eye in degrees
    fn longitude(&self) -> f64;
    fn set_longitude(&mut self, degrees: f64);

    /// Eye height above the ellipsoid in meters
    fn altitude(&self) -> f64;
    fn set_altitude(&mut self, meters: f64);

    /// Azimuth clockwise from north in degrees
    fn heading(&self) -> f64;
    fn set_heading(&mut self, degrees: f64);

    /// Angle between the view axis and the local vertical in degrees
    fn tilt(&self) -> f64;
    fn set_tilt(&mut self, degrees: f64);

    /// Rotation about the view axis in degrees
    fn roll(&self) -> f64;
    fn set_roll(&mut self, degrees: f64);

    /// Stamp this viewpoint's modelview/projection matrices and eye position
    /// into the frame context
    fn apply_state(&self, context: &mut FrameContext);
}

/// Default orbital viewpoint looking at the globe's center
pub struct BasicViewpoint {
    latitude: f64,
    longitude: f64,
    altitude: f64,
    heading: f64,
    tilt: f64,
    roll: f64,
    field_of_view: f64,
}

/// Initial eye height showing the whole globe, in meters
const DEFAULT_ALTITUDE: f64 = 2.0e7;
const DEFAULT_FIELD_OF_VIEW: f64 = 45.0;
const MIN_ALTITUDE: f64 = 1.0;

fn wrap_degrees(degrees: f64) -> f64 {
    (degrees + 180.0).rem_euclid(360.0) - 180.0
}

impl BasicViewpoint {
    pub fn new() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            altitude: DEFAULT_ALTITUDE,
            heading: 0.0,
            tilt: 0.0,
            roll: 0.0,
            field_of_view: DEFAULT_FIELD_OF_VIEW,
        }
    }

    /// Vertical field of view in degrees
    pub fn field_of_view(&self) -> f64 {
        self.field_of_view
    }

    pub fn set_field_of_view(&mut self, degrees: f64) {
        self.field_of_view = degrees.clamp(1.0, 179.0);
    }

    /// Eye point in geocentric cartesian coordinates (y up, meters)
    fn eye_point(&self, globe_radius: f64) -> DVec3 {
        let lat = self.latitude.to_radians();
        let lon = self.longitude.to_radians();
        let r = globe_radius + self.altitude;
        DVec3::new(
            r * lat.cos() * lon.sin(),
            r * lat.sin(),
            r * lat.cos() * lon.cos(),
        )
    }
}

impl Default for BasicViewpoint {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewpoint for BasicViewpoint {
    fn latitude(&self) -> f64 {
        self.latitude
    }

    fn set_latitude(&mut self, degrees: f64) {
        self.latitude = degrees.clamp(-90.0, 90.0);
    }

    fn longitude(&self) -> f64 {
        self.longitude
    }

    fn set_longitude(&mut self, degrees: f64) {
        self.longitude = wrap_degrees(degrees);
    }

    fn altitude(&self) -> f64 {
        self.altitude
    }

    fn set_altitude(&mut self, meters: f64) {
        self.altitude = meters.max(MIN_ALTITUDE);
    }

    fn heading(&self) -> f64 {
        self.heading
    }

    fn set_heading(&mut self, degrees: f64) {
        self.heading = wrap_degrees(degrees);
    }

    fn tilt(&self) -> f64 {
        self.tilt
    }

    fn set_tilt(&mut self, degrees: f64) {
        self.tilt = degrees.clamp(0.0, 90.0);
    }

    fn roll(&self) -> f64 {
        self.roll
    }

    fn set_roll(&mut self, degrees: f64) {
        self.roll = wrap_degrees(degrees);
    }

    fn apply_state(&self, context: &mut FrameContext) {
        let radius = context.globe().equatorial_radius();
        let eye = self.eye_point(radius);
        let eye32 = eye.as_vec3();

        // The world up axis degenerates when the eye sits on a pole
        let up = if self.latitude.abs() >= 89.99 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        let look_at = Mat4::look_at_rh(eye32, Vec3::ZERO, up);

        // Looking toward the globe center the view axis coincides with the
        // local vertical: heading and roll turn about eye-space z, tilt
        // pitches about eye-space x.
        let modelview = Mat4::from_rotation_z(self.roll.to_radians() as f32)
            * Mat4::from_rotation_x(self.tilt.to_radians() as f32)
            * Mat4::from_rotation_z(-self.heading.to_radians() as f32)
            * look_at;

        // Near/far bracket the eye's distance to the far side of the globe
        let near = (self.altitude * 1.0e-3).max(1.0) as f32;
        let far = (self.altitude + 2.0 * radius) as f32;
        let projection = Mat4::perspective_rh(
            (self.field_of_view.to_radians()) as f32,
            context.viewport().aspect_ratio(),
            near,
            far,
        );

        context.set_view_state(modelview, projection, eye32);
    }
}
