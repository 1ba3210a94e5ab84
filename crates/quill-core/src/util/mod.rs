pub mod slug;
pub mod toc;
