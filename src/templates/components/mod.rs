pub mod card;
pub mod table;

pub use card::{card, kpi};
pub use table::{thousands, value_table};
