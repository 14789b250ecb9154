//! Ball physics: kick and per-step integration

use bevy::prelude::*;
use rand::Rng;

use crate::ball::components::{Ball, BallStep};
use crate::constants::{KICK_MIN_LIFT, MAX_DIFFICULTY};
use crate::kinematics::{
    apply_drag, ground_contact, integrate_gravity, signed_unit, speed, spin_delta, unit,
};
use crate::tuning::PhysicsTweaks;

impl Ball {
    /// Put the ball in motion.
    ///
    /// `direction` is the aim in [-1, 1] on both axes, `power` the charge in
    /// [0, 1]. Lower difficulty adds more random error to the kick; at
    /// difficulty 100 the kick is exact.
    pub fn kick(
        &mut self,
        direction: Vec2,
        power: f32,
        difficulty: u32,
        tweaks: &PhysicsTweaks,
        rng: &mut impl Rng,
    ) {
        let power = power.clamp(0.0, 1.0);
        let direction = direction.clamp(Vec2::splat(-1.0), Vec2::ONE);
        let difficulty = difficulty.min(MAX_DIFFICULTY);

        let mut velocity = Vec3::new(
            direction.x * power * tweaks.kick_horizontal_scale,
            direction.y.max(KICK_MIN_LIFT) * power * tweaks.kick_vertical_scale,
            -power * tweaks.kick_forward_scale,
        );

        let random_factor = (MAX_DIFFICULTY - difficulty) as f32 / MAX_DIFFICULTY as f32;
        // Always draw both samples so the rng stream does not depend on difficulty
        let noise_x = signed_unit(rng);
        let noise_y = unit(rng);
        velocity.x += noise_x * random_factor * tweaks.kick_noise_horizontal;
        velocity.y += noise_y * random_factor * tweaks.kick_noise_vertical;

        self.velocity = velocity;
        self.is_moving = true;
    }

    /// Advance the ball by `dt` seconds (semi-implicit Euler).
    ///
    /// Gravity and drag update the velocity first, then the position moves
    /// with the new velocity. The ground clamp keeps the ball's center at or
    /// above its radius. A ball at rest is left untouched.
    pub fn advance(&mut self, dt: f32, tweaks: &PhysicsTweaks) -> BallStep {
        let mut step = BallStep::default();
        if !self.is_moving {
            return step;
        }
        let dt = dt.max(0.0);

        let mut velocity = integrate_gravity(self.velocity, tweaks.ball_gravity, dt);
        velocity = apply_drag(velocity, tweaks.ball_drag);
        self.position += velocity * dt;

        // A bounce slower than one step of gravity lands again on the next
        // step, so it counts as resting contact
        let threshold = tweaks.bounce_threshold.max(tweaks.ball_gravity * dt);
        let contact = ground_contact(
            self.position.y,
            velocity.y,
            self.radius,
            tweaks.ball_bounce,
            threshold,
        );
        self.position.y = contact.y;
        velocity.y = contact.velocity_y;
        step.bounced = contact.bounced;

        if let Some((axis, angle)) = spin_delta(velocity, dt, tweaks.spin_factor, tweaks.stop_speed) {
            self.rotation = (Quat::from_axis_angle(axis, angle) * self.rotation).normalize();
        }

        if speed(velocity) < tweaks.stop_speed {
            velocity = Vec3::ZERO;
            self.is_moving = false;
            step.stopped = true;
        }

        self.velocity = velocity;
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const DT: f32 = 1.0 / 60.0;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_kick_at_max_difficulty_is_exact() {
        let tweaks = PhysicsTweaks::default();
        let mut ball = Ball::default();
        ball.kick(Vec2::new(0.5, 0.5), 1.0, 100, &tweaks, &mut rng());
        assert!(ball.is_moving);
        assert!((ball.velocity.x - 25.0).abs() < 1e-5);
        assert!((ball.velocity.y - 20.0).abs() < 1e-5);
        assert!((ball.velocity.z + 70.0).abs() < 1e-5);
    }

    #[test]
    fn test_kick_enforces_minimum_lift() {
        let tweaks = PhysicsTweaks::default();
        let mut ball = Ball::default();
        ball.kick(Vec2::new(0.0, -1.0), 0.5, 100, &tweaks, &mut rng());
        assert!((ball.velocity.y - KICK_MIN_LIFT * 0.5 * KICK_VERTICAL_SCALE).abs() < 1e-5);
    }

    #[test]
    fn test_kick_noise_bounded_by_difficulty() {
        let tweaks = PhysicsTweaks::default();
        let mut r = rng();
        for _ in 0..200 {
            let mut ball = Ball::default();
            ball.kick(Vec2::ZERO, 1.0, 50, &tweaks, &mut r);
            // x noise at most 15 * 0.5, y noise in [0, 10 * 0.5)
            assert!(ball.velocity.x.abs() <= 7.5 + 1e-4);
            assert!(ball.velocity.y >= 12.0 - 1e-4 && ball.velocity.y <= 17.0 + 1e-4);
        }
    }

    #[test]
    fn test_ground_clamp_holds_for_any_dt() {
        let tweaks = PhysicsTweaks::default();
        let mut r = rng();
        for &dt in &[0.0, 0.001, DT, 0.1, 0.5, 2.0] {
            let mut ball = Ball::default();
            ball.kick(Vec2::new(0.3, 0.9), 0.8, 20, &tweaks, &mut r);
            for _ in 0..200 {
                ball.advance(dt, &tweaks);
                assert!(ball.position.y >= ball.radius, "dt={} y={}", dt, ball.position.y);
            }
        }
    }

    #[test]
    fn test_bounce_uses_restitution() {
        let tweaks = PhysicsTweaks::default();
        let mut ball = Ball::default();
        ball.is_moving = true;
        ball.position = Vec3::new(0.0, ball.radius + 0.01, 0.0);
        ball.velocity = Vec3::new(0.0, -6.0, -5.0);

        let vy_before_contact = -6.0 - BALL_GRAVITY * DT;
        let step = ball.advance(DT, &tweaks);
        assert!(step.bounced);
        assert!((ball.velocity.y - (-vy_before_contact * BALL_BOUNCE)).abs() < 1e-4);
    }

    #[test]
    fn test_stop_zeroes_velocity() {
        let tweaks = PhysicsTweaks::default();
        let mut ball = Ball::default();
        ball.is_moving = true;
        // Resting on the ground: gravity pulls vy under the bounce threshold
        ball.velocity = Vec3::new(0.05, 0.1, 0.0);
        let step = ball.advance(DT, &tweaks);
        assert!(step.stopped);
        assert!(!ball.is_moving);
        assert_eq!(ball.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_rolling_ball_eventually_stops() {
        let tweaks = PhysicsTweaks::default();
        let mut ball = Ball::default();
        ball.kick(Vec2::new(1.0, 0.0), 1.0, 100, &tweaks, &mut rng());
        let mut steps = 0;
        while ball.is_moving && steps < 10_000 {
            ball.advance(DT, &tweaks);
            steps += 1;
        }
        assert!(!ball.is_moving, "ball still moving after {} steps", steps);
    }

    #[test]
    fn test_ball_settles_at_coarse_steps() {
        let tweaks = PhysicsTweaks::default();
        for &hz in &[20.0_f32, 30.0, 50.0, 60.0, 240.0] {
            let dt = 1.0 / hz;
            let mut ball = Ball::default();
            ball.kick(Vec2::new(1.0, 0.0), 1.0, 100, &tweaks, &mut rng());
            let mut steps = 0;
            while ball.is_moving && steps < 50_000 {
                ball.advance(dt, &tweaks);
                steps += 1;
            }
            assert!(!ball.is_moving, "{} Hz: still moving, velocity {:?}", hz, ball.velocity);
        }
    }

    #[test]
    fn test_small_rebound_comes_to_rest() {
        let tweaks = PhysicsTweaks::default();
        let dt = 1.0 / 30.0;
        let mut ball = Ball::default();
        ball.is_moving = true;
        // Hops forever at 30 Hz with a fixed 0.1 threshold
        ball.velocity = Vec3::new(0.0, 0.1225, 0.0);
        let step = ball.advance(dt, &tweaks);
        assert!(!step.bounced);
        assert!(step.stopped);
        assert_eq!(ball.position.y, ball.radius);
    }

    #[test]
    fn test_resting_ball_does_not_move() {
        let tweaks = PhysicsTweaks::default();
        let mut ball = Ball::default();
        let before = ball.clone();
        ball.advance(DT, &tweaks);
        assert_eq!(ball, before);
    }

    #[test]
    fn test_reset_after_flight() {
        let tweaks = PhysicsTweaks::default();
        let mut ball = Ball::default();
        ball.kick(Vec2::new(-0.4, 0.6), 0.9, 10, &tweaks, &mut rng());
        for _ in 0..30 {
            ball.advance(DT, &tweaks);
        }
        ball.reset();
        assert_eq!(ball.position, BALL_SPAWN);
        assert_eq!(ball.velocity, Vec3::ZERO);
        assert!(!ball.is_moving);
    }
}
