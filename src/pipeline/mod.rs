pub mod builder;
pub mod defaults;
pub mod runtime;
pub mod scaling;
pub mod traits;
