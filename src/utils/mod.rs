pub mod constants;
pub mod fields;
pub mod labels;
pub mod vocabulary;
