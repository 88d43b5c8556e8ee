//! Greedy receding-horizon correction.
//!
//! For each of `horizon` predicted steps the one-step optimal action
//! `u* = -(R + B'QB)^-1 B'QA x` is computed against a fixed linear model
//! and the prediction advanced with `x <- Ax + Bu*`. The per-step actions
//! are averaged with geometric weights `discount^k` and clamped to
//! `[0, 1]^3`. State is `(a - a_safe, s - s_safe, u)`; action is
//! `(u_dmg, u_calm, u_att)`.

use arc_types::clip01;
use nalgebra::{Matrix3, Vector3};
use tracing::warn;

/// Default prediction horizon.
pub const MPC_HORIZON: usize = 5;

/// Default per-step discount.
pub const MPC_DISCOUNT: f64 = 0.8;

/// Linear model and quadratic costs of the predictive correction.
#[derive(Debug, Clone, PartialEq)]
pub struct Mpc {
    a: Matrix3<f64>,
    b: Matrix3<f64>,
    q: Matrix3<f64>,
    r: Matrix3<f64>,
    horizon: usize,
    discount: f64,
}

impl Mpc {
    /// The embedded linearized plant.
    ///
    /// Arousal, narrative, and uncertainty errors decay on their own with
    /// narrative feeding arousal and uncertainty feeding both. Calming acts
    /// on arousal, suppression on narrative, attention on uncertainty.
    pub fn new() -> Self {
        let a = Matrix3::new(
            0.85, 0.15, 0.10, //
            0.00, 0.85, 0.12, //
            0.00, 0.00, 0.90,
        );
        let b = Matrix3::new(
            0.00, -0.25, 0.00, //
            -0.20, 0.00, 0.00, //
            0.00, 0.00, -0.15,
        );
        let q = Matrix3::from_diagonal(&Vector3::new(5.0, 8.0, 1.0));
        let r = Matrix3::from_diagonal(&Vector3::new(0.6, 0.6, 1.0));
        Self::with_model(a, b, q, r)
    }

    /// A predictive correction over an arbitrary model, with the default
    /// horizon and discount.
    pub const fn with_model(
        a: Matrix3<f64>,
        b: Matrix3<f64>,
        q: Matrix3<f64>,
        r: Matrix3<f64>,
    ) -> Self {
        Self {
            a,
            b,
            q,
            r,
            horizon: MPC_HORIZON,
            discount: MPC_DISCOUNT,
        }
    }

    /// One-step optimal action for predicted state `x`.
    ///
    /// Returns `None` when `R + B'QB` is singular.
    fn one_step(&self, x: &Vector3<f64>) -> Option<Vector3<f64>> {
        let bt_q = self.b.transpose() * self.q;
        let hessian = self.r + bt_q * self.b;
        let inverse = hessian.try_inverse()?;
        Some(-(inverse * bt_q * self.a * x))
    }

    /// Discounted average of the per-step optimal actions, in `[0, 1]^3`.
    ///
    /// A singular step contributes a zero action for that step only.
    pub fn solve(&self, x0: &Vector3<f64>) -> Vector3<f64> {
        let mut x = *x0;
        let mut acc = Vector3::zeros();
        let mut weight_sum = 0.0;
        let mut weight = 1.0;
        for k in 0..self.horizon {
            let u = self.one_step(&x).unwrap_or_else(|| {
                warn!(step = k, "MPC cost hessian is singular, using zero action");
                Vector3::zeros()
            });
            acc += u * weight;
            weight_sum += weight;
            x = self.a * x + self.b * u;
            weight *= self.discount;
        }
        if weight_sum <= 0.0 {
            return Vector3::zeros();
        }
        (acc / weight_sum).map(clip01)
    }
}

impl Default for Mpc {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singular_model_yields_zero_action() {
        let mpc = Mpc::with_model(
            Matrix3::identity(),
            Matrix3::zeros(),
            Matrix3::identity(),
            Matrix3::zeros(),
        );
        let u = mpc.solve(&Vector3::new(0.4, 0.4, 0.9));
        assert_eq!(u, Vector3::zeros());
    }

    #[test]
    fn excess_arousal_and_narrative_call_for_regulation() {
        let u = Mpc::new().solve(&Vector3::new(0.3, 0.3, 0.8));
        assert!(u.x > 0.0, "suppression expected, got {u:?}");
        assert!(u.y > 0.0, "calming expected, got {u:?}");
        assert!(u.z > 0.0, "attention expected, got {u:?}");
        assert!(u.iter().all(|c| (0.0..=1.0).contains(c)));
    }

    #[test]
    fn below_threshold_needs_no_suppression() {
        let u = Mpc::new().solve(&Vector3::new(-0.3, -0.3, 0.0));
        assert!(u.x.abs() < f64::EPSILON);
        assert!(u.y.abs() < f64::EPSILON);
    }

    #[test]
    fn solution_is_deterministic() {
        let mpc = Mpc::new();
        let x = Vector3::new(0.1, 0.2, 0.5);
        assert_eq!(mpc.solve(&x), mpc.solve(&x));
    }
}
