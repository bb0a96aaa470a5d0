use soroban_sdk::{contracttype, Address, Env, String, Vec};

use crate::errors::ProjectFundingError;

pub(crate) const DAY_IN_LEDGERS: u32 = 17280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

pub(crate) const RECORD_BUMP_AMOUNT: u32 = 90 * DAY_IN_LEDGERS;
pub(crate) const RECORD_LIFETIME_THRESHOLD: u32 = RECORD_BUMP_AMOUNT - 7 * DAY_IN_LEDGERS;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,                       // -> Address
    Token,                       // -> Address
    ProjectCount,                // -> u64
    Project(u64),                // -> Project
    Donation(u64, u32),          // (project_id, index) -> Donation
    Withdrawal(u64, u32),        // (project_id, index) -> Withdrawal
    WithdrawalCount(u64),        // project_id -> u32
    Stats(u64),                  // project_id -> ProjectStats
    CreatedProjects(Address),    // user -> Vec<u64>
    DonatedProjects(Address),    // user -> Vec<u64>
    HasDonated(u64, Address),    // (project_id, donor) -> bool
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub location: String,
    pub funding_goal: i128,
    pub funds_raised: i128,
    pub beneficiary: Address,
    pub is_completed: bool,
    pub is_funding_active: bool,
    pub created_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Donation {
    pub donor: Address,
    pub project_id: u64,
    pub amount: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Withdrawal {
    pub beneficiary: Address,
    pub project_id: u64,
    pub amount: i128,
    pub timestamp: u64,
}

/// Aggregates served to the project management view.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectStats {
    pub donation_count: u32,
    pub unique_donors: u32,
    pub total_donated: i128,
    pub total_withdrawn: i128,
}

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn set_record<V>(env: &Env, key: &DataKey, value: &V)
where
    V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    env.storage().persistent().set(key, value);
    env.storage()
        .persistent()
        .extend_ttl(key, RECORD_LIFETIME_THRESHOLD, RECORD_BUMP_AMOUNT);
}

pub fn project_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::ProjectCount)
        .unwrap_or(0)
}

pub fn set_project_count(env: &Env, count: u64) {
    env.storage().instance().set(&DataKey::ProjectCount, &count);
}

pub fn load_project(env: &Env, project_id: u64) -> Result<Project, ProjectFundingError> {
    env.storage()
        .persistent()
        .get(&DataKey::Project(project_id))
        .ok_or(ProjectFundingError::ProjectNotFound)
}

pub fn save_project(env: &Env, project: &Project) {
    set_record(env, &DataKey::Project(project.id), project);
}

pub fn load_stats(env: &Env, project_id: u64) -> ProjectStats {
    env.storage()
        .persistent()
        .get(&DataKey::Stats(project_id))
        .unwrap_or(ProjectStats {
            donation_count: 0,
            unique_donors: 0,
            total_donated: 0,
            total_withdrawn: 0,
        })
}

pub fn load_donations(env: &Env, project_id: u64) -> Vec<Donation> {
    let count = load_stats(env, project_id).donation_count;
    let mut donations = Vec::new(env);
    for index in 0..count {
        if let Some(donation) = env
            .storage()
            .persistent()
            .get(&DataKey::Donation(project_id, index))
        {
            donations.push_back(donation);
        }
    }
    donations
}

/// Appends a donation under its own key and rolls it into the project totals.
pub fn push_donation(
    env: &Env,
    donation: &Donation,
    new_donor: bool,
) -> Result<(), ProjectFundingError> {
    let mut stats = load_stats(env, donation.project_id);
    let index = stats.donation_count;

    stats.donation_count = index
        .checked_add(1)
        .ok_or(ProjectFundingError::AmountOverflow)?;
    stats.total_donated = stats
        .total_donated
        .checked_add(donation.amount)
        .ok_or(ProjectFundingError::AmountOverflow)?;
    if new_donor {
        stats.unique_donors = stats
            .unique_donors
            .checked_add(1)
            .ok_or(ProjectFundingError::AmountOverflow)?;
    }

    set_record(env, &DataKey::Donation(donation.project_id, index), donation);
    set_record(env, &DataKey::Stats(donation.project_id), &stats);
    Ok(())
}

pub fn load_withdrawals(env: &Env, project_id: u64) -> Vec<Withdrawal> {
    let count = withdrawal_count(env, project_id);
    let mut withdrawals = Vec::new(env);
    for index in 0..count {
        if let Some(withdrawal) = env
            .storage()
            .persistent()
            .get(&DataKey::Withdrawal(project_id, index))
        {
            withdrawals.push_back(withdrawal);
        }
    }
    withdrawals
}

fn withdrawal_count(env: &Env, project_id: u64) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::WithdrawalCount(project_id))
        .unwrap_or(0)
}

pub fn push_withdrawal(env: &Env, withdrawal: &Withdrawal) -> Result<(), ProjectFundingError> {
    let index = withdrawal_count(env, withdrawal.project_id);
    let next = index
        .checked_add(1)
        .ok_or(ProjectFundingError::AmountOverflow)?;

    let mut stats = load_stats(env, withdrawal.project_id);
    stats.total_withdrawn = stats
        .total_withdrawn
        .checked_add(withdrawal.amount)
        .ok_or(ProjectFundingError::AmountOverflow)?;

    set_record(env, &DataKey::Withdrawal(withdrawal.project_id, index), withdrawal);
    set_record(env, &DataKey::WithdrawalCount(withdrawal.project_id), &next);
    set_record(env, &DataKey::Stats(withdrawal.project_id), &stats);
    Ok(())
}

pub fn user_projects(env: &Env, key: &DataKey) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(key)
        .unwrap_or_else(|| Vec::new(env))
}

pub fn append_user_project(env: &Env, key: DataKey, project_id: u64) {
    let mut ids = user_projects(env, &key);
    ids.push_back(project_id);
    set_record(env, &key, &ids);
}

/// Marks `donor` as a contributor of `project_id`.
///
/// Returns `true` only the first time a given donor is recorded for the project.
pub fn mark_donor(env: &Env, project_id: u64, donor: &Address) -> bool {
    let key = DataKey::HasDonated(project_id, donor.clone());
    if env.storage().persistent().has(&key) {
        return false;
    }
    set_record(env, &key, &true);
    true
}
