pub mod a001_product;
pub mod a002_webhook;
pub mod a003_import_job;
