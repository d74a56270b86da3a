//! Bone strength score derived from four SNP calls.
//!
//! Each subscore starts at its maximum and loses one point per risk allele
//! observed at the markers feeding it:
//!
//! | subscore          | max | risk alleles                                   |
//! |-------------------|-----|------------------------------------------------|
//! | cortical strength | 4   | `T` at rs9525638, `C` at rs2707466             |
//! | forearm density   | 4   | `G` at rs2908004, `C` at rs2707466             |
//! | fracture risk     | 6   | `C` at rs7776725, `G` at rs2908004, `C` at rs2707466 |
//!
//! The total is the sum of the subscores, so 14 is the best possible score.

use std::collections::HashMap;
use std::fmt;

use crate::models::{GenotypeRecord, NameRecord};

pub const MAX_SCORE: i64 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Weak,
    Average,
    High,
    Superhuman,
}

impl Category {
    pub fn from_total(total_score: i64) -> Self {
        match total_score {
            s if s < 5 => Category::Weak,
            s if s < 8 => Category::Average,
            s if s < 11 => Category::High,
            _ => Category::Superhuman,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Weak => "weak",
            Category::Average => "average",
            Category::High => "high",
            Category::Superhuman => "superhuman",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoneStrengthResult {
    pub cortical_strength: i64,
    pub forearm_density: i64,
    pub fracture_risk: i64,
    pub total_score: i64,
    pub category: Category,
}

/// Number of times `allele` appears in a genotype call.
///
/// This is a plain tally: no-calls (`--`), lowercase letters and strings of
/// any length are accepted and simply contribute nothing for other letters.
pub fn count_occurrences(genotype: &str, allele: char) -> i64 {
    genotype.chars().filter(|c| *c == allele).count() as i64
}

pub fn score(genotype: &GenotypeRecord) -> BoneStrengthResult {
    let cortical_t = count_occurrences(&genotype.rs9525638, 'T');
    let forearm_g = count_occurrences(&genotype.rs2908004, 'G');
    let shared_c = count_occurrences(&genotype.rs2707466, 'C');
    let fracture_c = count_occurrences(&genotype.rs7776725, 'C');

    let cortical_strength = 4_i64.saturating_sub(cortical_t).saturating_sub(shared_c);
    let forearm_density = 4_i64.saturating_sub(forearm_g).saturating_sub(shared_c);
    let fracture_risk = 6_i64
        .saturating_sub(fracture_c)
        .saturating_sub(forearm_g)
        .saturating_sub(shared_c);

    let total_score = cortical_strength
        .saturating_add(forearm_density)
        .saturating_add(fracture_risk);

    BoneStrengthResult {
        cortical_strength,
        forearm_density,
        fracture_risk,
        total_score,
        category: Category::from_total(total_score),
    }
}

/// A scored profile paired with its name, if the provider returned one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileReport {
    pub profile_id: String,
    pub name: Option<NameRecord>,
    pub result: BoneStrengthResult,
}

impl ProfileReport {
    pub fn display_name(&self) -> String {
        self.name
            .as_ref()
            .map(NameRecord::full_name)
            .unwrap_or_default()
    }
}

/// Score every genotype record and attach the matching name by profile id.
///
/// Output order follows `genotypes`. Profiles without a name entry keep
/// `name: None`.
pub fn join_profiles(genotypes: &[GenotypeRecord], names: &[NameRecord]) -> Vec<ProfileReport> {
    let names_by_profile: HashMap<&str, &NameRecord> = names
        .iter()
        .map(|name| (name.profile_id.as_str(), name))
        .collect();

    genotypes
        .iter()
        .map(|genotype| ProfileReport {
            profile_id: genotype.profile_id.clone(),
            name: names_by_profile
                .get(genotype.profile_id.as_str())
                .map(|name| (*name).clone()),
            result: score(genotype),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genotype(a: &str, b: &str, c: &str, d: &str) -> GenotypeRecord {
        GenotypeRecord {
            profile_id: "p1".to_string(),
            rs9525638: a.to_string(),
            rs2908004: b.to_string(),
            rs2707466: c.to_string(),
            rs7776725: d.to_string(),
        }
    }

    #[test]
    fn all_risk_alleles_score_zero() {
        let result = score(&genotype("TT", "GG", "CC", "CC"));

        assert_eq!(result.cortical_strength, 0);
        assert_eq!(result.forearm_density, 0);
        assert_eq!(result.fracture_risk, 0);
        assert_eq!(result.total_score, 0);
        assert_eq!(result.category, Category::Weak);
    }

    #[test]
    fn no_risk_alleles_score_maximum() {
        let result = score(&genotype("AA", "AA", "AA", "AA"));

        assert_eq!(result.cortical_strength, 4);
        assert_eq!(result.forearm_density, 4);
        assert_eq!(result.fracture_risk, 6);
        assert_eq!(result.total_score, MAX_SCORE);
        assert_eq!(result.category, Category::Superhuman);
    }

    #[test]
    fn heterozygous_calls_count_once() {
        // cortical 4-1-1, forearm 4-1-1, fracture 6-1-1-1
        let result = score(&genotype("CT", "AG", "CT", "CT"));

        assert_eq!(result.cortical_strength, 2);
        assert_eq!(result.forearm_density, 2);
        assert_eq!(result.fracture_risk, 3);
        assert_eq!(result.total_score, 7);
        assert_eq!(result.category, Category::Average);
    }

    #[test]
    fn category_boundaries() {
        let cases = [
            (-3, "weak"),
            (4, "weak"),
            (5, "average"),
            (7, "average"),
            (8, "high"),
            (10, "high"),
            (11, "superhuman"),
            (14, "superhuman"),
        ];
        for (total, label) in cases {
            assert_eq!(Category::from_total(total).label(), label, "total {total}");
        }
    }

    #[test]
    fn total_is_sum_of_subscores() {
        let result = score(&genotype("TA", "GC", "AA", "CG"));
        assert_eq!(
            result.total_score,
            result.cortical_strength + result.forearm_density + result.fracture_risk
        );
        assert_eq!(result.category, Category::from_total(result.total_score));
    }

    #[test]
    fn unexpected_calls_do_not_panic() {
        for call in ["", "--", "__", "tt", "TTTT", "ÄÖ", "I", "DI"] {
            let result = score(&genotype(call, call, call, call));
            assert!(result.total_score <= MAX_SCORE);
        }

        // Over-long calls can drive subscores negative.
        let result = score(&genotype("TTTT", "GGGG", "CCCC", "CCCC"));
        assert_eq!(result.cortical_strength, -4);
        assert_eq!(result.category, Category::Weak);
    }

    #[test]
    fn scoring_is_deterministic() {
        let record = genotype("CT", "GG", "AC", "TT");
        assert_eq!(score(&record), score(&record));
    }

    #[test]
    fn join_attaches_names_by_profile_id() {
        let genotypes = vec![
            GenotypeRecord {
                profile_id: "p1".to_string(),
                ..genotype("AA", "AA", "AA", "AA")
            },
            GenotypeRecord {
                profile_id: "p2".to_string(),
                ..genotype("TT", "GG", "CC", "CC")
            },
        ];
        let names = vec![NameRecord {
            profile_id: "p2".to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
        }];

        let reports = join_profiles(&genotypes, &names);

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].profile_id, "p1");
        assert!(reports[0].name.is_none());
        assert_eq!(reports[0].display_name(), "");
        assert_eq!(reports[0].result.total_score, 14);
        assert_eq!(reports[1].display_name(), "Grace Hopper");
        assert_eq!(reports[1].result.category, Category::Weak);
    }
}
