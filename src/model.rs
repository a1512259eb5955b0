pub mod appointment;
pub mod session;
pub mod snowflake;
pub mod toast;
pub mod user;

pub use appointment::{Appointment, MonthAvailabilityItem};
pub use session::{Credentials, Session};
pub use snowflake::Snowflake;
pub use toast::{NewToast, Toast, ToastType};
pub use user::User;
