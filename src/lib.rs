pub mod config;
pub mod database;
pub mod error;
pub mod flows;
pub mod gateway;
pub mod invitation;
pub mod model;
pub mod registration_manager;
pub mod registration_server;
pub mod response;
pub mod routes;
pub mod schema;
pub mod serde_implementations;
pub mod session;
pub mod r#trait;
pub mod validation;
