mod service;

pub use service::{BlogChanges, BlogError, BlogService, ImageUpdate, NewBlog};
