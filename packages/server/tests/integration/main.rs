mod blog;
mod service;
