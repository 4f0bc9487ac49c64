pub mod entities;
pub mod errors;
pub mod fingerprint;
pub mod money;
pub mod seed;
pub mod store;

pub use entities::*;
pub use errors::*;
pub use fingerprint::*;
pub use money::*;
pub use store::*;
