pub mod annotate;
pub mod header;
