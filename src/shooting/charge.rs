//! Power meter for the charge phase of a shot

use crate::constants::POWER_METER_STEP;

/// Ping-pong power meter: while charging, power sweeps 0 → 1 → 0 → …
/// so releasing at the right moment matters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowerMeter {
    pub power: f32,
    pub charging: bool,
    rising: bool,
}

impl PowerMeter {
    /// Start charging from zero. Ignored if already charging.
    pub fn start(&mut self) {
        if self.charging {
            return;
        }
        self.charging = true;
        self.power = 0.0;
        self.rising = true;
    }

    /// Advance the meter one physics step
    pub fn step(&mut self) {
        if !self.charging {
            return;
        }
        if self.rising {
            self.power += POWER_METER_STEP;
        } else {
            self.power -= POWER_METER_STEP;
        }
        if self.power >= 1.0 {
            self.power = 1.0;
            self.rising = false;
        } else if self.power <= 0.0 {
            self.power = 0.0;
            self.rising = true;
        }
    }

    /// Stop charging and return the power reached
    pub fn release(&mut self) -> f32 {
        let power = self.power;
        self.charging = false;
        self.power = 0.0;
        power
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meter_rises_then_falls() {
        let mut meter = PowerMeter::default();
        meter.start();
        for _ in 0..25 {
            meter.step();
        }
        assert!((meter.power - 0.5).abs() < 1e-3);
        // Peak lands on step 50 or 51 depending on rounding
        for _ in 0..26 {
            meter.step();
        }
        assert!(meter.power > 0.97);
        for _ in 0..10 {
            meter.step();
        }
        assert!(meter.power < 0.85 && meter.power > 0.75, "power={}", meter.power);
    }

    #[test]
    fn test_release_resets() {
        let mut meter = PowerMeter::default();
        meter.start();
        for _ in 0..10 {
            meter.step();
        }
        let power = meter.release();
        assert!((power - 0.2).abs() < 1e-3);
        assert_eq!(meter.power, 0.0);
        assert!(!meter.charging);
        meter.step();
        assert_eq!(meter.power, 0.0);
    }
}
