use shared::pricing::CartTotals;
use tracing::info;

pub const COUPON_CODE: &str = "SHOP10";
pub const COUPON_APPLIED_MESSAGE: &str = "Coupon applied! You saved 10%";
pub const COUPON_ALREADY_APPLIED_MESSAGE: &str = "Coupon already applied.";
pub const COUPON_INVALID_MESSAGE: &str = "Invalid coupon code.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CouponOutcome {
    Applied(CartTotals),
    AlreadyApplied,
    Invalid,
}

impl CouponOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Applied(_) => COUPON_APPLIED_MESSAGE,
            Self::AlreadyApplied => COUPON_ALREADY_APPLIED_MESSAGE,
            Self::Invalid => COUPON_INVALID_MESSAGE,
        }
    }
}

/// Whether the session's one coupon has been used. Lives only as long as the
/// session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CouponState {
    applied: bool,
}

impl CouponState {
    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// Once applied, every later attempt reports `AlreadyApplied`, whatever
    /// the code.
    pub fn apply(&mut self, code: &str, subtotal: f64, shipping: f64) -> CouponOutcome {
        let outcome = if code == COUPON_CODE && !self.applied {
            self.applied = true;
            CouponOutcome::Applied(CartTotals::discounted(subtotal, shipping))
        } else if self.applied {
            CouponOutcome::AlreadyApplied
        } else {
            CouponOutcome::Invalid
        };
        info!(code, outcome = ?outcome, "coupon attempt");
        outcome
    }
}
