mod client;
mod errors;
pub mod types;
pub mod window;
pub use self::client::{Client, DEFAULT_BASE_URL, DEFAULT_DATE_FORMAT};
pub use self::errors::Error;
pub use self::types::ChartRecord;
pub use self::window::TimeWindow;
