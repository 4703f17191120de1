pub mod cluster_marker;
pub mod header_cache;
pub mod segment_assembler;
