pub mod confusion;
pub mod labels;
pub mod record;
