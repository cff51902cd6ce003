//! `SeaORM` Entity definitions

pub mod prelude;

pub mod user;
pub mod webhook;
