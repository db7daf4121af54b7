pub mod text;
pub mod time;

pub use text::{display_width, pad_display};
pub use time::{datetime_from_millis, deserialize_flexible_datetime, format_timestamp};
