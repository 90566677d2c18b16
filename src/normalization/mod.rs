pub mod literal;
pub mod text;
