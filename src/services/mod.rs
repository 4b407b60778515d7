pub mod db_operations;
#[cfg(test)]
pub mod memory_store;
pub mod other_services;
