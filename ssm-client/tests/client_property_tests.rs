//! Property-based tests for reply interpretation.

use proptest::prelude::*;

use ssm_client::proto::ssm::v1::SsmReply;
use ssm_client::{interpret_reply, ClientError};

// =============================================================================
// Property: Reply Interpretation Channels
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_zero_status_yields_buffer_unchanged(
        buffer in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let reply = SsmReply {
            status: 0,
            output_buffer_size: buffer.len() as i32,
            output_buffer: buffer.clone(),
        };
        prop_assert_eq!(interpret_reply(reply).unwrap(), buffer);
    }

    #[test]
    fn prop_nonzero_status_becomes_rejection(
        status in prop::num::i32::ANY.prop_filter("nonzero", |s| *s != 0),
        buffer in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let reply = SsmReply {
            status,
            output_buffer_size: buffer.len() as i32,
            output_buffer: buffer,
        };
        match interpret_reply(reply) {
            Err(ClientError::Rejected { status: got, .. }) => prop_assert_eq!(got, status),
            other => prop_assert!(false, "expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn prop_rejection_message_is_reply_buffer_text(message in "[ -~]{0,64}") {
        let reply = SsmReply {
            status: -1,
            output_buffer_size: message.len() as i32,
            output_buffer: message.clone().into_bytes(),
        };
        match interpret_reply(reply) {
            Err(ClientError::Rejected { message: got, .. }) => prop_assert_eq!(got, message),
            other => prop_assert!(false, "expected Rejected, got {:?}", other),
        }
    }
}
