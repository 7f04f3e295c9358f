//! SSM service library.
//!
//! This crate implements a network-attached software security module: a
//! mutually authenticated gRPC service offering AES-256-GCM encryption and
//! decryption under a process-wide data/record encryption key, fixed-size
//! secure random generation, and liveness pings.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod crypto;
pub mod error;
pub mod grpc;
pub mod metrics;
pub mod shutdown;

/// Generated protobuf types.
pub mod proto {
    /// SSM protocol definitions.
    pub mod ssm {
        /// Version 1 of the SSM protocol.
        pub mod v1 {
            #![allow(missing_docs)]
            tonic::include_proto!("ssm.v1");
        }
    }
}

pub use crypto::{CipherSuite, Drek};
pub use error::CryptoError;
pub use grpc::CryptoServiceImpl;
