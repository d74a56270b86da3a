pub mod genotype;
pub mod profile;

pub use genotype::{GenotypeRecord, SNP_IDS};
pub use profile::{NameRecord, NamesResponse, ProfileSummary, UserRecord};
