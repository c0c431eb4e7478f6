pub mod controller;
pub mod preprocess;
pub mod render;


pub use controller::CoreDictionaryController;
