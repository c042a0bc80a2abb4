pub mod room;
pub mod setting;
pub mod user;

pub use room::*;
pub use setting::*;
pub use user::*;
