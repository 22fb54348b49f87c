mod type_key;
mod value;

pub use type_key::TypeKey;
pub use value::{Config, Value};
