//! Attorney self-certification.

use serde::{Deserialize, Serialize};

/// The four affirmations an attorney must make before a verification
/// session is granted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttorneyAttestation {
    #[serde(default)]
    pub licensed_attorney: bool,
    #[serde(default)]
    pub acting_for_client: bool,
    #[serde(default)]
    pub understands_privilege: bool,
    #[serde(default)]
    pub accepts_terms: bool,
}

impl AttorneyAttestation {
    /// All four affirmations set.
    pub fn affirmed() -> Self {
        Self {
            licensed_attorney: true,
            acting_for_client: true,
            understands_privilege: true,
            accepts_terms: true,
        }
    }

    /// Names of the affirmations that were not made, in declaration order.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("licensed_attorney", self.licensed_attorney),
            ("acting_for_client", self.acting_for_client),
            ("understands_privilege", self.understands_privilege),
            ("accepts_terms", self.accepts_terms),
        ]
        .into_iter()
        .filter_map(|(name, given)| (!given).then_some(name))
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}
