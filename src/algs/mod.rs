//! Connectivity algorithms: ingestion, face extraction and face deduplication.

pub mod connectivity;
pub mod faces;
pub mod ingest;

pub use connectivity::{ConnectivityBuilder, FaceConnectivity, build_connectivity};
pub use faces::faces_of;
pub use ingest::classify_blocks;
