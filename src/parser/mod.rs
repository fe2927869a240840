pub mod html_view;
pub mod newsml;
pub mod tsv;
pub mod xml_view;

pub use newsml::{NewsDocument, NewsmlDecoder};
pub use tsv::{decode_concept, decode_training_example, Concept, TrainingExample};
