// Engine, display model and plumbing, importable without a terminal.
// Rendering and key routing stay in the binary so nothing here depends
// on a widget type.
pub mod config;
pub mod display;
pub mod runtime;
pub mod score;
pub mod session;
pub mod words;
