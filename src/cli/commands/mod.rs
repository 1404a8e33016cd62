pub mod play;
pub mod points;
pub mod settings;
pub mod simulate;
