use rand::Rng;

/// A clickable circular region on the play surface.
///
/// Hit testing is pure geometry; whether a target is currently eligible to be
/// hit is tracked in `active` and enforced by the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub active: bool,
}

impl Target {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            x,
            y,
            radius,
            active: true,
        }
    }

    /// Euclidean containment test against the circle, border inclusive.
    pub fn is_hit(&self, x: f64, y: f64) -> bool {
        let dx = x - self.x;
        let dy = y - self.y;
        (dx * dx + dy * dy).sqrt() <= self.radius
    }

    /// Marks the target unhittable until it is repositioned.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Draws a new uniform position within `[padding, bound - padding]` on
    /// each axis and reactivates the target. A surface smaller than twice the
    /// padding parks the target at the surface center instead.
    pub fn move_to_random_position(
        &mut self,
        width: f64,
        height: f64,
        padding: f64,
        rng: &mut impl Rng,
    ) {
        self.x = random_axis(width, padding, rng);
        self.y = random_axis(height, padding, rng);
        self.active = true;
    }
}

fn random_axis(bound: f64, padding: f64, rng: &mut impl Rng) -> f64 {
    if bound - padding * 2.0 > 0.0 {
        rng.gen_range(padding..bound - padding)
    } else {
        bound / 2.0
    }
}
