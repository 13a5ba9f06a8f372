pub mod eia;
pub mod prod_db;
