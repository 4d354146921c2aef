pub mod legacy;
pub mod resume;
