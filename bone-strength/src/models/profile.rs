use serde::Deserialize;

/// Account summary from `/1/user/`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub id: String,
    #[serde(default)]
    pub profiles: Vec<ProfileSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileSummary {
    pub id: String,
    #[serde(default)]
    pub genotyped: bool,
}

/// Body of `/1/names/`: the account holder's name plus one entry per profile.
#[derive(Debug, Clone, Deserialize)]
pub struct NamesResponse {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub profiles: Vec<NameRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NameRecord {
    #[serde(rename = "id")]
    pub profile_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl NameRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl UserRecord {
    pub fn genotyped_profiles(&self) -> usize {
        self.profiles.iter().filter(|p| p.genotyped).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_trims_missing_parts() {
        let name = NameRecord {
            profile_id: "p1".to_string(),
            first_name: "Ada".to_string(),
            last_name: String::new(),
        };
        assert_eq!(name.full_name(), "Ada");
    }

    #[test]
    fn decodes_names_payload() {
        let names: NamesResponse = serde_json::from_str(
            r#"{"id": "acc", "first_name": "Ada", "last_name": "Lovelace",
                "profiles": [{"id": "p1", "first_name": "Ada", "last_name": "Lovelace"}]}"#,
        )
        .unwrap();

        assert_eq!(names.profiles.len(), 1);
        assert_eq!(names.profiles[0].profile_id, "p1");
    }

    #[test]
    fn counts_genotyped_profiles() {
        let user: UserRecord = serde_json::from_str(
            r#"{"id": "acc", "profiles": [{"id": "p1", "genotyped": true}, {"id": "p2", "genotyped": false}]}"#,
        )
        .unwrap();

        assert_eq!(user.genotyped_profiles(), 1);
    }
}
