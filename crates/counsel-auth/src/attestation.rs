//! Attestation validation.

use counsel_core::models::attestation::AttorneyAttestation;

use crate::error::AuthError;

/// Accept an attestation only when all four affirmations are made.
///
/// The error lists every missing affirmation, not just the first.
pub fn validate_attestation(attestation: &AttorneyAttestation) -> Result<(), AuthError> {
    let missing = attestation.missing();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AuthError::AttestationIncomplete(
            missing.into_iter().map(String::from).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_attestation_passes() {
        assert!(validate_attestation(&AttorneyAttestation::affirmed()).is_ok());
    }

    #[test]
    fn each_flag_is_required() {
        let cases: [fn(&mut AttorneyAttestation); 4] = [
            |a| a.licensed_attorney = false,
            |a| a.acting_for_client = false,
            |a| a.understands_privilege = false,
            |a| a.accepts_terms = false,
        ];
        for clear in cases {
            let mut attestation = AttorneyAttestation::affirmed();
            clear(&mut attestation);
            match validate_attestation(&attestation) {
                Err(AuthError::AttestationIncomplete(missing)) => assert_eq!(missing.len(), 1),
                other => panic!("expected AttestationIncomplete, got {other:?}"),
            }
        }
    }

    #[test]
    fn reports_all_missing_flags() {
        let err = validate_attestation(&AttorneyAttestation::default()).unwrap_err();
        match err {
            AuthError::AttestationIncomplete(missing) => assert_eq!(
                missing,
                vec![
                    "licensed_attorney",
                    "acting_for_client",
                    "understands_privilege",
                    "accepts_terms"
                ]
            ),
            other => panic!("unexpected {other:?}"),
        }
    }
}
