pub mod expr_to_value;
pub mod lossy_path;
pub mod rename;
pub mod resolve;
