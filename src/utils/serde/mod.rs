mod number_deserializer;
pub use number_deserializer::*;
