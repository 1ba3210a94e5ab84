pub mod blog_post;
pub mod case_study;
pub mod lead;
