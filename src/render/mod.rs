pub mod canvas;
pub mod compositor;
pub mod config;
pub mod cpu;
