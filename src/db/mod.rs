// src/db/mod.rs

pub mod connection;
pub mod migrations;

pub use connection::{
    create_connection_pool, create_test_connection, default_library_base_dir, ConnectionPool,
    PooledConn,
};
pub use migrations::initialize_database;
