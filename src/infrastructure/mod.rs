pub mod checkout;
pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
