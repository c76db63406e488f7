// Core modules implementing the reference tables, registries, and error modeling.
pub mod books;
pub mod code;
pub mod error;
pub mod language;
pub mod load;
pub mod order;
pub mod punctuation;
pub mod validate;
