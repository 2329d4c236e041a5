pub mod question_selection;
pub mod session_store;

pub use question_selection::QuestionSelection;
pub use session_store::SessionStore;
