use serde::Deserialize;

/// Marker associated with cortical bone thickness.
pub const CORTICAL_THICKNESS_SNP: &str = "rs9525638";
/// Marker associated with forearm bone-mineral density.
pub const FOREARM_BMD_SNP: &str = "rs2908004";
/// Marker shared by all three traits.
pub const SHARED_BONE_SNP: &str = "rs2707466";
/// Marker associated with forearm fracture risk.
pub const FRACTURE_RISK_SNP: &str = "rs7776725";

/// Every SNP the scorer reads, in the order they are requested.
pub const SNP_IDS: [&str; 4] = [
    CORTICAL_THICKNESS_SNP,
    FOREARM_BMD_SNP,
    SHARED_BONE_SNP,
    FRACTURE_RISK_SNP,
];

/// One profile's calls from `/1/genotype/`.
///
/// The provider returns a list of objects keyed by rs id. A marker absent
/// from the payload is read as an empty call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenotypeRecord {
    #[serde(rename = "id")]
    pub profile_id: String,
    #[serde(default)]
    pub rs9525638: String,
    #[serde(default)]
    pub rs2908004: String,
    #[serde(default)]
    pub rs2707466: String,
    #[serde(default)]
    pub rs7776725: String,
}

/// `/1/genotype/` answers with a list for the whole account, or a single
/// object when scoped to one profile.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GenotypePayload {
    Many(Vec<GenotypeRecord>),
    One(GenotypeRecord),
}

impl GenotypePayload {
    pub fn into_records(self) -> Vec<GenotypeRecord> {
        match self {
            GenotypePayload::Many(records) => records,
            GenotypePayload::One(record) => vec![record],
        }
    }
}
