//! # Payload Tampering
//!
//! Byte-level manipulation of an otherwise valid payload. Anything that is
//! not the canonical encoding, or that disagrees with the host-supplied
//! digest, must be refused before state is touched.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Fixture, LOCATION};
    use aa_01_anchor_processor::{AdmissionErrorKind, InMemoryState};
    use serde_json::Value;

    fn rejects(f: &Fixture, bytes: Vec<u8>) -> AdmissionErrorKind {
        let state = InMemoryState::new();
        let err = state
            .execute(&f.handler(), &f.raw_transaction(bytes))
            .unwrap_err();
        assert!(state.snapshot().unwrap().is_empty());
        err.kind()
    }

    #[test]
    fn test_pretty_printed_payload_rejected() {
        let f = Fixture::new();
        let canonical = f.payload(LOCATION).unwrap().serialize().unwrap();
        let value: Value = serde_json::from_slice(&canonical).unwrap();
        let pretty = serde_json::to_vec_pretty(&value).unwrap();

        assert_eq!(rejects(&f, pretty), AdmissionErrorKind::MalformedPayload);
    }

    #[test]
    fn test_raw_unicode_instead_of_escape_rejected() {
        let f = Fixture::new();
        let canonical = f.payload("café").unwrap().serialize().unwrap();
        let text = String::from_utf8(canonical).unwrap().replace("\\u00e9", "é");

        assert_eq!(
            rejects(&f, text.into_bytes()),
            AdmissionErrorKind::MalformedPayload
        );
    }

    #[test]
    fn test_extra_field_rejected() {
        let f = Fixture::new();
        let canonical = f.payload(LOCATION).unwrap().serialize().unwrap();
        let mut text = String::from_utf8(canonical).unwrap();
        text.pop();
        text.push_str(",\"zzz\":\"1\"}");

        assert_eq!(
            rejects(&f, text.into_bytes()),
            AdmissionErrorKind::MalformedPayload
        );
    }

    #[test]
    fn test_digest_mismatch_rejected() {
        let f = Fixture::new();
        let mut tx = f.transaction(&f.payload(LOCATION).unwrap()).unwrap();
        tx.header.payload_sha512 = Some(shared_crypto::sha512_hex(b"something else"));

        let state = InMemoryState::new();
        let err = state.execute(&f.handler(), &tx).unwrap_err();
        assert_eq!(err.kind(), AdmissionErrorKind::MalformedPayload);
    }

    #[test]
    fn test_truncated_payload_rejected() {
        let f = Fixture::new();
        let mut bytes = f.payload(LOCATION).unwrap().serialize().unwrap();
        bytes.truncate(bytes.len() / 2);

        assert_eq!(rejects(&f, bytes), AdmissionErrorKind::MalformedPayload);
    }
}
