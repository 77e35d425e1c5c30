pub mod arithmetic;
pub mod config;
pub mod crypto;
pub mod event;
pub mod serializer;
