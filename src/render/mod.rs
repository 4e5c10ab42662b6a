// src/render/mod.rs
pub mod template;
pub mod pivot;
pub mod import;
pub mod interpret;
pub mod chart;

pub use template::{render, RenderSource, RenderedStep};
pub use import::ImportFormat;
pub use interpret::{read_p_value, PValueReading};
pub use chart::ConceptChart;
