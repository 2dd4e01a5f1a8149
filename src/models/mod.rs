pub mod book;
pub mod post;
pub mod rental;
pub mod user;

pub use book::Book;
pub use post::{Comment, CommentDetail, Post, PostWithComments, UserActivityLog};
pub use rental::{Payment, Rental, RentalStatus, RentalSummary};
pub use user::{User, UserProfile};
