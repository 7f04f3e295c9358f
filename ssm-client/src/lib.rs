//! Client library for the SSM service.
//!
//! Wraps the generated gRPC stub with connection setup (mutual TLS or
//! server-only TLS against native roots), per-call deadlines, and reply
//! interpretation that keeps transport failures and service rejections
//! apart. The operator binaries (`ssmping`, `mtlsping`, `ssmcrypt`,
//! `ssmrandom`) are thin wrappers over this library.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod ops;

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

pub use client::{
    interpret_reply, ClientError, Pong, SsmClient, ALGORITHM, BITS_LENGTH, MODE, PROTOCOL_VERSION,
};
pub use ops::{encrypt_then_decrypt, fetch_random, ping_many, PingSummary, DEFAULT_PING_COUNT};
