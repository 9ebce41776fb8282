pub mod annotation;
pub mod media;
