pub mod aggregate;
pub mod filter;
pub mod rows;
pub mod table;
