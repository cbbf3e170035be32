pub mod date;
pub mod timezone;

pub use date::{parse_date, parse_reference_time};
pub use timezone::Timezone;
