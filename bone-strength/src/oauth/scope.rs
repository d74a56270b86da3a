use crate::models::SNP_IDS;

/// Scopes every login asks for regardless of the markers being read.
pub const BASE_SCOPES: [&str; 2] = ["basic", "names"];

/// Space-joined scope string sent both on the consent screen and in the
/// token exchange. The provider rejects the exchange if the two differ.
pub fn requested_scope() -> String {
    BASE_SCOPES
        .iter()
        .chain(SNP_IDS.iter())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// `locations` query value for `/1/genotype/`, already percent-encoded.
pub fn genotype_locations() -> String {
    SNP_IDS.join("%20")
}
