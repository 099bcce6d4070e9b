pub mod abbreviations;
pub mod corpus;
pub mod engine;
pub mod naming;
pub mod pairs;
pub mod types;
pub mod validate;
