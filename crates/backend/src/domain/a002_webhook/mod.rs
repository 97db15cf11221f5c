pub mod dispatcher;
pub mod repository;
pub mod service;
