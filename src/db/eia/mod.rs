pub mod data_set;
pub mod eia_client;
pub mod mongo_store;
pub mod persistence_record;
