pub mod booking;
pub mod schedule;

pub use booking::{Booking, BookingStatus, Decision};
pub use schedule::{Schedule, ServiceOffering};
