pub mod interest;
pub mod related;
