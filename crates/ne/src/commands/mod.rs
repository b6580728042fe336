mod extract;
mod list;

pub use extract::run as extract;
pub use list::run as list;
