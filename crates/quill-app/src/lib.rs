//! HTTP surface of Quill: the admin and public JSON API, the server-rendered
//! pages, and the hoops that inject configuration and the database pool.

pub mod app;
pub mod config;
pub mod db_handler;
pub mod error;
pub mod middleware;
