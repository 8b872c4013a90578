pub mod evaluation;
pub mod rating_store;
