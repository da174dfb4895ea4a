mod comment;
mod history;
mod tag;

pub use comment::{AddCommentUseCase, ListCommentsUseCase};
pub use history::ListHistoryUseCase;
pub use tag::{AddTagUseCase, ListTagsUseCase, RemoveTagUseCase};
