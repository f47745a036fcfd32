//! Session record-store adapters

pub mod sqlite;
