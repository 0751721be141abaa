pub mod comment;
pub mod post;
pub mod target;
pub mod user;

pub use comment::{CommentRow, NewComment};
pub use post::{NewPost, PostRow};
pub use target::{NewTarget, TargetRow};
pub use user::{NewUser, UserRow};
