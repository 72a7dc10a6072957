//! # Forged Certificate Authority
//!
//! An attacker who controls a device key but not the CA key mints their own
//! "CA", countersigns their own certificate request and ships the forged CA
//! key inside the payload. Admission must only ever trust the locally
//! configured CA key.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Fixture, LOCATION};
    use aa_01_anchor_processor::{AdmissionErrorKind, CertificateAuthority, InMemoryState};
    use shared_crypto::Signer;

    #[test]
    fn test_self_issued_ca_key_in_payload_is_ignored() {
        let f = Fixture::new();
        let handler = f.handler();
        let state = InMemoryState::new();

        let attacker_ca = f.context.new_random_private_key();
        let mut payload = f.payload_signed_by(&attacker_ca, LOCATION).unwrap();
        payload.certificate_authority_response.ca_public_key =
            f.context.get_public_key(&attacker_ca).as_hex();

        let err = state
            .execute(&handler, &f.transaction(&payload).unwrap())
            .unwrap_err();

        assert_eq!(err.kind(), AdmissionErrorKind::InvalidCertificate);
        assert!(state.snapshot().unwrap().is_empty());
    }

    #[test]
    fn test_trusted_signature_with_wrong_embedded_key_still_admitted() {
        let f = Fixture::new();
        let handler = f.handler();
        let state = InMemoryState::new();

        let mut payload = f.payload(LOCATION).unwrap();
        payload.certificate_authority_response.ca_public_key =
            f.context.get_public_key(&f.context.new_random_private_key()).as_hex();

        state
            .execute(&handler, &f.transaction(&payload).unwrap())
            .unwrap();
    }

    #[test]
    fn test_full_response_from_attacker_ca_rejected() {
        let f = Fixture::new();
        let handler = f.handler();
        let state = InMemoryState::new();

        let attacker_ca = f.context.new_random_private_key();
        let attacker = CertificateAuthority::new(Signer::new(&f.context, attacker_ca));
        let mut payload = f.payload(LOCATION).unwrap();
        payload.certificate_authority_response =
            attacker.respond(&payload.certificate_request).unwrap();

        let err = state
            .execute(&handler, &f.transaction(&payload).unwrap())
            .unwrap_err();
        assert_eq!(err.kind(), AdmissionErrorKind::InvalidCertificate);
    }

    #[test]
    fn test_stolen_countersignature_for_other_device_rejected() {
        let victim = Fixture::new();
        let attacker = Fixture::new();
        let handler = victim.handler();
        let state = InMemoryState::new();

        // Attacker lifts the victim's countersigned request but swaps in
        // their own key as the vouched-for sender.
        let stolen = victim.payload(LOCATION).unwrap();
        let mut payload = attacker.payload(LOCATION).unwrap();
        payload.certificate_authority_response = stolen.certificate_authority_response;

        let err = state
            .execute(&handler, &attacker.transaction(&payload).unwrap())
            .unwrap_err();
        assert_eq!(err.kind(), AdmissionErrorKind::InvalidCertificate);
    }
}
