mod common;

mod images;
mod postgres;
mod search;
