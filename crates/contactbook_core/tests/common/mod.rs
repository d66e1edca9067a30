#![allow(dead_code)]

use contactbook_core::db::{ensure_contacts_table, open_connection, ConnectionOptions};
use contactbook_core::{
    ConnectionPool, ContactDirectory, InvocationResponse, PaginationConfig, PoolConfig,
    StorageTarget,
};
use rusqlite::Connection;
use serde_json::Value;
use std::sync::Arc;

pub fn open_guarded_memory_db() -> Connection {
    let conn = open_connection(&StorageTarget::memory(), ConnectionOptions::default()).unwrap();
    ensure_contacts_table(&conn).unwrap();
    conn
}

pub fn memory_directory() -> ContactDirectory {
    directory_for(PoolConfig::new(StorageTarget::memory()))
}

pub fn directory_for(config: PoolConfig) -> ContactDirectory {
    let pool = ConnectionPool::open(config).unwrap();
    ContactDirectory::new(Arc::new(pool), PaginationConfig::default())
}

pub fn json_body(response: &InvocationResponse) -> Value {
    serde_json::from_str(&response.body)
        .unwrap_or_else(|err| panic!("body `{}` is not JSON: {err}", response.body))
}

pub fn ids_of(page: &Value) -> Vec<i64> {
    page["contacts"]
        .as_array()
        .expect("contacts should be an array")
        .iter()
        .map(|contact| contact["id"].as_i64().expect("id should be an integer"))
        .collect()
}
