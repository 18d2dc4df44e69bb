//! gRPC transport
//!
//! Protobuf types generated from `proto/aggregator.proto` and the server
//! adapter in front of the shared Aggregator. The RPC surface is
//! ingestion only.

mod server;

pub use server::{aggregator_error_to_status, AggregatorGrpcServer};

/// Generated protobuf messages, client and server stubs
pub mod proto {
    include!(concat!(env!("OUT_DIR"), "/aggregator_proto.rs"));
}
