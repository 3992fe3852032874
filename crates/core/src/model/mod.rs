mod ids;
mod lesson;
mod module;
mod progress;
mod quiz;

pub use ids::{LessonId, ModuleId, UserId};
pub use lesson::{LessonContent, LessonError, Section};
pub use module::{Module, ModuleError};
pub use progress::{LessonState, ModuleProgress, ProgressRecord};
pub use quiz::{QuickCheck, QuizError, QuizOption, QuizOutcome};
