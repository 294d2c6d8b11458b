pub mod form;
pub mod lead;
pub mod quote;
