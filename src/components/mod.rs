pub mod colors;
pub mod dialogs;
pub mod gallery;
pub mod tools;
