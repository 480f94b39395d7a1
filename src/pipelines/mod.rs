pub mod concat;
