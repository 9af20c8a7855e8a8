pub mod error;
pub mod ids;
pub mod session;
pub mod task;
pub mod word;

pub use crate::error::DomainError;
pub use crate::ids::{AssignmentId, SessionId, WordId};
pub use crate::session::{AttemptRecord, CompletedResults, InputMethod, Session, SessionResults};
pub use crate::task::{InputMode, Task, TaskType};
pub use crate::word::Word;
