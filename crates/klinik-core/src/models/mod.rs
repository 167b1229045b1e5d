//! Domain models for the klinik front desk.

mod notification;
mod patient;
mod principal;
mod view;

pub use notification::*;
pub use patient::*;
pub use principal::*;
pub use view::*;
