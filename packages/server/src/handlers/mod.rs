pub mod image;
pub mod item;
pub mod root;
