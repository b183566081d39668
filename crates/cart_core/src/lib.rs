//! Cart state, rendering and the button handlers that tie them together.

pub mod coupon;
pub mod page;
pub mod store;
pub mod view;
pub mod widget;

pub use coupon::{CouponOutcome, CouponState, COUPON_CODE};
pub use page::{ids, Page};
pub use store::CartStore;
pub use view::CartView;
pub use widget::CartWidget;
