mod memory_status_store;
mod redis_status_store;

pub use memory_status_store::InMemoryStatusStore;
pub use redis_status_store::RedisStatusStore;
