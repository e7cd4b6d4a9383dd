mod adduct;
pub mod adduct_database;
mod adduct_table;
