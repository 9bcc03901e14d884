pub mod app_config;
pub mod database;
pub mod memory;
pub mod redis_repo;
pub mod route_repo;
pub mod reservation_repo;
pub mod baggage_repo;
pub mod seed;
pub mod storage;

pub use database::DbClient;
pub use memory::MemoryStore;
pub use redis_repo::RedisClient;
pub use storage::{Storage, StoreError};
