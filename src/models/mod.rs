pub mod enums;
pub mod note;
pub mod report;
pub mod user;

pub use enums::*;
pub use note::*;
pub use report::*;
pub use user::*;
