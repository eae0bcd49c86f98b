use colorburst_core::ConfettiOptions;
use palette::Srgb;
use rand::Rng;
use std::f64::consts::PI;

const OVAL_SCALAR: f64 = 0.6;
const ELLIPSE_SEGMENTS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Square,
    Circle,
}

pub const SHAPES: [Shape; 2] = [Shape::Square, Shape::Circle];

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub shape: Shape,
    wobble: f64,
    wobble_speed: f64,
    velocity: f64,
    angle_2d: f64,
    tilt_angle: f64,
    pub color: Srgb<u8>,
    tick: u32,
    total_ticks: u32,
    decay: f64,
    drift: f64,
    random: f64,
    tilt_sin: f64,
    tilt_cos: f64,
    wobble_x: f64,
    wobble_y: f64,
    gravity: f64,
    scalar: f64,
    opacity: f64,
}

impl Particle {
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        options: &ConfettiOptions,
        shape: Shape,
        color: Srgb<u8>,
        x: f64,
        y: f64,
    ) -> Self {
        let rad_angle = options.angle.to_radians();
        let rad_spread = options.spread.to_radians();

        Self {
            x,
            y,
            shape,
            wobble: rng.random::<f64>() * 10.0,
            wobble_speed: (rng.random::<f64>() * 0.1 + 0.05).min(0.11),
            velocity: options.start_velocity * 0.5 + rng.random::<f64>() * options.start_velocity,
            angle_2d: -rad_angle + (0.5 * rad_spread - rng.random::<f64>() * rad_spread),
            tilt_angle: (rng.random::<f64>() * 0.5 + 0.25) * PI,
            color,
            tick: 0,
            total_ticks: options.ticks,
            decay: options.decay,
            drift: options.drift,
            random: rng.random::<f64>() + 2.0,
            tilt_sin: 0.0,
            tilt_cos: 0.0,
            wobble_x: x,
            wobble_y: y,
            gravity: options.gravity * 3.0,
            scalar: options.scalar,
            opacity: 1.0,
        }
    }

    // false once the particle has used up its ticks
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.x += self.angle_2d.cos() * self.velocity + self.drift;
        self.y += self.angle_2d.sin() * self.velocity + self.gravity;
        self.velocity *= self.decay;

        self.wobble += self.wobble_speed;
        self.wobble_x = self.x + 10.0 * self.scalar * self.wobble.cos();
        self.wobble_y = self.y + 10.0 * self.scalar * self.wobble.sin();

        self.tilt_angle += 0.1;
        self.tilt_sin = self.tilt_angle.sin();
        self.tilt_cos = self.tilt_angle.cos();
        self.random = rng.random::<f64>() + 2.0;

        self.opacity = if self.total_ticks == 0 {
            0.0
        } else {
            1.0 - f64::from(self.tick) / f64::from(self.total_ticks)
        };
        self.tick += 1;

        self.tick < self.total_ticks
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn ticks_left(&self) -> u32 {
        self.total_ticks.saturating_sub(self.tick)
    }

    pub fn outline(&self) -> Vec<(f64, f64)> {
        match self.shape {
            Shape::Square => self.corners().to_vec(),
            Shape::Circle => self.ellipse(),
        }
    }

    pub fn corners(&self) -> [(f64, f64); 4] {
        let x1 = self.x + self.random * self.tilt_cos;
        let y1 = self.y + self.random * self.tilt_sin;
        let x2 = self.wobble_x + self.random * self.tilt_cos;
        let y2 = self.wobble_y + self.random * self.tilt_sin;

        [
            (self.x.floor(), self.y.floor()),
            (self.wobble_x.floor(), y1.floor()),
            (x2.floor(), y2.floor()),
            (x1.floor(), self.wobble_y.floor()),
        ]
    }

    // Oval spanned by the same wobble and tilt offsets, turned with the wobble.
    fn ellipse(&self) -> Vec<(f64, f64)> {
        let x1 = self.x + self.random * self.tilt_cos;
        let y1 = self.y + self.random * self.tilt_sin;
        let x2 = self.wobble_x + self.random * self.tilt_cos;
        let y2 = self.wobble_y + self.random * self.tilt_sin;

        let radius_x = (x2 - x1).abs() * OVAL_SCALAR;
        let radius_y = (y2 - y1).abs() * OVAL_SCALAR;
        let (rot_sin, rot_cos) = (PI / 10.0 * self.wobble).sin_cos();

        (0..ELLIPSE_SEGMENTS)
            .map(|i| {
                let t = 2.0 * PI * i as f64 / ELLIPSE_SEGMENTS as f64;
                let (ex, ey) = (radius_x * t.cos(), radius_y * t.sin());
                (self.x + ex * rot_cos - ey * rot_sin, self.y + ex * rot_sin + ey * rot_cos)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn options() -> ConfettiOptions {
        ConfettiOptions {
            angle: 90.0,
            spread: 0.0,
            ..ConfettiOptions::default()
        }
    }

    #[test]
    fn straight_up_launch_rises_then_falls() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut particle = Particle::spawn(&mut rng, &options(), Shape::Square, Srgb::new(1, 2, 3), 100.0, 300.0);

        particle.update(&mut rng);
        assert!(particle.y < 300.0, "first frame should move up, y = {}", particle.y);
        assert!((particle.x - 100.0).abs() < 1e-6);

        for _ in 0..300 {
            particle.update(&mut rng);
        }
        assert!(particle.y > 300.0, "gravity should win eventually, y = {}", particle.y);
    }

    #[test]
    fn fades_and_expires_after_its_ticks() {
        let mut rng = StdRng::seed_from_u64(6);
        let options = ConfettiOptions { ticks: 10, ..options() };
        let mut particle = Particle::spawn(&mut rng, &options, Shape::Circle, Srgb::new(1, 2, 3), 0.0, 0.0);

        let mut alive_frames = 0;
        while particle.update(&mut rng) {
            alive_frames += 1;
        }
        assert_eq!(alive_frames, 9);
        assert_eq!(particle.ticks_left(), 0);
        assert!((particle.opacity() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn spawn_parameters_follow_the_options() {
        let mut rng = StdRng::seed_from_u64(7);
        let options = ConfettiOptions { start_velocity: 40.0, ..options() };
        for _ in 0..1_000 {
            let p = Particle::spawn(&mut rng, &options, Shape::Square, Srgb::new(0, 0, 0), 0.0, 0.0);
            assert!(p.velocity >= 20.0 && p.velocity <= 60.0);
            assert!(p.wobble_speed >= 0.05 && p.wobble_speed <= 0.11);
            assert!(p.tilt_angle >= 0.25 * PI && p.tilt_angle <= 0.75 * PI);
            assert!((p.angle_2d + PI / 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn circles_are_ovals_around_the_particle() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut particle = Particle::spawn(&mut rng, &options(), Shape::Circle, Srgb::new(1, 2, 3), 50.0, 50.0);
        particle.update(&mut rng);

        let outline = particle.outline();
        assert_eq!(outline.len(), ELLIPSE_SEGMENTS);
        // Radii are at most 0.6 of the 10px wobble swing on each axis.
        let reach = 10.0 * OVAL_SCALAR * 2f64.sqrt() + 1e-9;
        for (x, y) in outline {
            assert!((x - particle.x).hypot(y - particle.y) <= reach);
        }
    }

    #[test]
    fn squares_keep_their_quad() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut particle = Particle::spawn(&mut rng, &options(), Shape::Square, Srgb::new(1, 2, 3), 50.0, 50.0);
        particle.update(&mut rng);
        assert_eq!(particle.outline(), particle.corners().to_vec());
    }
}
