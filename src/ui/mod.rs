pub mod table;

pub use table::{ResultTable, COLUMNS};
