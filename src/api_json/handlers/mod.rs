pub mod timetable;
pub mod courses;
pub mod sessions;
pub mod docs;

pub use timetable::*;
pub use courses::*;
pub use sessions::*;
pub use docs::*;
