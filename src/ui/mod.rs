pub mod app;
pub mod backdrop;
pub mod face;
pub mod theme;
