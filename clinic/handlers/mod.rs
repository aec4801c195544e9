pub mod detect;
pub mod records;
