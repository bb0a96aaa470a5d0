use anyhow::{bail, Context, Result};
use project_funding::Project;
use serde::{Deserialize, Serialize};
use soroban_sdk::{Address, Env, String as SorobanString};

/// One project in the backup file.
///
/// Ids, amounts and timestamps are written as decimal strings so the file
/// survives JSON tooling that cannot hold 128-bit integers.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    #[serde(with = "decimal")]
    pub id: u64,
    pub name: String,
    pub description: String,
    pub location: String,
    #[serde(with = "decimal")]
    pub funding_goal: i128,
    #[serde(with = "decimal")]
    pub funds_raised: i128,
    pub beneficiary: String,
    pub is_completed: bool,
    pub is_funding_active: bool,
    #[serde(with = "decimal")]
    pub created_at: u64,
}

impl ProjectRecord {
    pub fn from_project(project: &Project) -> Result<Self> {
        Ok(Self {
            id: project.id,
            name: to_std_string(&project.name).context("project name")?,
            description: to_std_string(&project.description).context("project description")?,
            location: to_std_string(&project.location).context("project location")?,
            funding_goal: project.funding_goal,
            funds_raised: project.funds_raised,
            beneficiary: to_std_string(&project.beneficiary.to_string())
                .context("beneficiary address")?,
            is_completed: project.is_completed,
            is_funding_active: project.is_funding_active,
            created_at: project.created_at,
        })
    }

    pub fn beneficiary_address(&self, env: &Env) -> Result<Address> {
        parse_address(env, &self.beneficiary)
    }
}

pub(crate) fn to_std_string(value: &SorobanString) -> Result<String> {
    let mut buf = vec![0u8; value.len() as usize];
    value.copy_into_slice(&mut buf);
    Ok(String::from_utf8(buf)?)
}

/// Parses a Stellar strkey (`G...` account or `C...` contract).
pub(crate) fn parse_address(env: &Env, strkey: &str) -> Result<Address> {
    let well_formed = strkey.len() == 56
        && matches!(strkey.as_bytes()[0], b'G' | b'C')
        && strkey
            .bytes()
            .all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b));
    if !well_formed {
        bail!("not a Stellar address: {strkey:?}");
    }
    Ok(Address::from_string(&SorobanString::from_str(env, strkey)))
}

mod decimal {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.trim().parse().map_err(de::Error::custom)
    }
}
