//! `SQLite` persistence shared by the history feature.

mod database;
mod migrations;

pub use database::Database;
