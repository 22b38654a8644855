mod constant;
mod factory;
mod fallible;
mod func;
mod providers;
mod service;
mod singleton;

pub use constant::*;
pub use factory::*;
pub use fallible::*;
pub use func::*;
pub use providers::*;
pub use service::*;
pub use singleton::*;
