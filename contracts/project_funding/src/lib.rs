#![no_std]

mod errors;
mod events;
mod storage;
mod token;

pub use errors::ProjectFundingError;
pub use events::{
    AdminChangedEvent, DonationReceivedEvent, FundingStatusChangedEvent, FundsWithdrawnEvent,
    InitializedEvent, ProjectCompletedEvent, ProjectCreatedEvent,
};
pub use storage::{Donation, Project, ProjectStats, Withdrawal};

use soroban_sdk::{contract, contractimpl, log, Address, Env, String, Vec};
use storage::DataKey;

#[contract]
pub struct ProjectFundingContract;

#[contractimpl]
impl ProjectFundingContract {
    /// Initialize the contract with an admin address and the token donations are paid in
    pub fn initialize(env: Env, admin: Address, token: Address) -> Result<(), ProjectFundingError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(ProjectFundingError::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Token, &token);
        storage::set_project_count(&env, 0);
        storage::bump_instance(&env);

        InitializedEvent { admin, token }.publish(&env);

        Ok(())
    }

    /// Create a new project and return its id. Ids start at 1.
    pub fn create_project(
        env: Env,
        creator: Address,
        name: String,
        description: String,
        location: String,
        funding_goal: i128,
        beneficiary: Address,
    ) -> Result<u64, ProjectFundingError> {
        // Check if contract is initialized
        Self::require_initialized(&env)?;

        // Require creator authorization
        creator.require_auth();

        // Validate inputs
        if name.is_empty() {
            return Err(ProjectFundingError::EmptyName);
        }
        if funding_goal <= 0 {
            return Err(ProjectFundingError::InvalidFundingGoal);
        }

        // Allocate the next project id
        let project_id = storage::project_count(&env)
            .checked_add(1)
            .ok_or(ProjectFundingError::AmountOverflow)?;
        let timestamp = env.ledger().timestamp();

        let project = Project {
            id: project_id,
            name: name.clone(),
            description,
            location,
            funding_goal,
            funds_raised: 0,
            beneficiary: beneficiary.clone(),
            is_completed: false,
            is_funding_active: true,
            created_at: timestamp,
        };

        // Store project and index it under the creator
        storage::save_project(&env, &project);
        storage::set_project_count(&env, project_id);
        storage::append_user_project(&env, DataKey::CreatedProjects(creator), project_id);
        storage::bump_instance(&env);

        log!(&env, "project created", project_id, funding_goal);

        // Emit event
        ProjectCreatedEvent {
            project_id,
            beneficiary,
            name,
            funding_goal,
            timestamp,
        }
        .publish(&env);

        Ok(project_id)
    }

    /// Donate `amount` of the configured token to a project
    pub fn donate_to_project(
        env: Env,
        donor: Address,
        project_id: u64,
        amount: i128,
    ) -> Result<(), ProjectFundingError> {
        // Check if contract is initialized
        let token_address = Self::require_initialized(&env)?;

        // Require donor authorization
        donor.require_auth();

        // Get project
        let mut project = storage::load_project(&env, project_id)?;

        // Validate amount
        if amount <= 0 {
            return Err(ProjectFundingError::InvalidAmount);
        }

        project.funds_raised = project
            .funds_raised
            .checked_add(amount)
            .ok_or(ProjectFundingError::AmountOverflow)?;

        // Transfer tokens from donor to contract
        let contract_address = env.current_contract_address();
        token::transfer(&env, &token_address, &donor, &contract_address, &amount);

        // Update project and record the donation
        let timestamp = env.ledger().timestamp();
        storage::save_project(&env, &project);

        // The donated index lists each project once per donor.
        let new_donor = storage::mark_donor(&env, project_id, &donor);
        storage::push_donation(
            &env,
            &Donation {
                donor: donor.clone(),
                project_id,
                amount,
                timestamp,
            },
            new_donor,
        )?;
        if new_donor {
            storage::append_user_project(&env, DataKey::DonatedProjects(donor.clone()), project_id);
        }

        log!(&env, "donation received", project_id, amount);

        // Emit event
        DonationReceivedEvent {
            project_id,
            donor,
            amount,
            timestamp,
        }
        .publish(&env);

        Ok(())
    }

    /// Withdraw the whole undrawn balance of a project to its beneficiary.
    ///
    /// Returns the amount paid out.
    pub fn withdraw_funds(
        env: Env,
        caller: Address,
        project_id: u64,
    ) -> Result<i128, ProjectFundingError> {
        // Check if contract is initialized
        let token_address = Self::require_initialized(&env)?;

        // Get project
        let mut project = storage::load_project(&env, project_id)?;

        // Only the beneficiary can withdraw
        if caller != project.beneficiary {
            return Err(ProjectFundingError::Unauthorized);
        }
        caller.require_auth();

        // Check available balance
        let amount = project.funds_raised;
        if amount <= 0 {
            return Err(ProjectFundingError::NothingToWithdraw);
        }

        // Update project and record the withdrawal
        project.funds_raised = 0;
        storage::save_project(&env, &project);

        let timestamp = env.ledger().timestamp();
        storage::push_withdrawal(
            &env,
            &Withdrawal {
                beneficiary: project.beneficiary.clone(),
                project_id,
                amount,
                timestamp,
            },
        )?;

        // Transfer tokens from contract to beneficiary
        let contract_address = env.current_contract_address();
        token::transfer(
            &env,
            &token_address,
            &contract_address,
            &project.beneficiary,
            &amount,
        );

        log!(&env, "funds withdrawn", project_id, amount);

        // Emit event
        FundsWithdrawnEvent {
            project_id,
            beneficiary: project.beneficiary,
            amount,
            timestamp,
        }
        .publish(&env);

        Ok(amount)
    }

    /// Set whether a project is accepting funding (beneficiary only)
    pub fn toggle_funding_status(
        env: Env,
        caller: Address,
        project_id: u64,
        is_active: bool,
    ) -> Result<(), ProjectFundingError> {
        Self::set_funding_active(&env, &caller, project_id, |_| is_active)?;
        Ok(())
    }

    /// Flip the funding flag of a project and return the new value (beneficiary only)
    pub fn toggle_funding_active(
        env: Env,
        caller: Address,
        project_id: u64,
    ) -> Result<bool, ProjectFundingError> {
        Self::set_funding_active(&env, &caller, project_id, |current| !current)
    }

    /// Mark a project as completed. Completion also closes funding for good.
    pub fn complete_project(
        env: Env,
        caller: Address,
        project_id: u64,
    ) -> Result<(), ProjectFundingError> {
        Self::require_initialized(&env)?;

        let mut project = storage::load_project(&env, project_id)?;

        if caller != project.beneficiary {
            return Err(ProjectFundingError::Unauthorized);
        }
        caller.require_auth();

        project.is_completed = true;
        project.is_funding_active = false;
        storage::save_project(&env, &project);

        log!(&env, "project completed", project_id);

        ProjectCompletedEvent {
            project_id,
            timestamp: env.ledger().timestamp(),
        }
        .publish(&env);

        Ok(())
    }

    /// Get project data
    pub fn get_project(env: Env, project_id: u64) -> Result<Project, ProjectFundingError> {
        storage::load_project(&env, project_id)
    }

    /// All projects ordered by id
    pub fn get_all_projects(env: Env) -> Vec<Project> {
        let mut projects = Vec::new(&env);
        for project_id in 1..=storage::project_count(&env) {
            if let Ok(project) = storage::load_project(&env, project_id) {
                projects.push_back(project);
            }
        }
        projects
    }

    pub fn get_project_count(env: Env) -> u64 {
        storage::project_count(&env)
    }

    /// Donations to a project in the order they were made
    pub fn get_project_donations(
        env: Env,
        project_id: u64,
    ) -> Result<Vec<Donation>, ProjectFundingError> {
        storage::load_project(&env, project_id)?;
        Ok(storage::load_donations(&env, project_id))
    }

    pub fn get_project_withdrawals(
        env: Env,
        project_id: u64,
    ) -> Result<Vec<Withdrawal>, ProjectFundingError> {
        storage::load_project(&env, project_id)?;
        Ok(storage::load_withdrawals(&env, project_id))
    }

    pub fn get_user_created_projects(env: Env, user: Address) -> Vec<u64> {
        storage::user_projects(&env, &DataKey::CreatedProjects(user))
    }

    pub fn get_user_donated_projects(env: Env, user: Address) -> Vec<u64> {
        storage::user_projects(&env, &DataKey::DonatedProjects(user))
    }

    /// Donation and withdrawal totals for a project
    pub fn get_project_stats(env: Env, project_id: u64) -> Result<ProjectStats, ProjectFundingError> {
        storage::load_project(&env, project_id)?;
        Ok(storage::load_stats(&env, project_id))
    }

    /// Get admin address
    pub fn get_admin(env: Env) -> Result<Address, ProjectFundingError> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(ProjectFundingError::NotInitialized)
    }

    /// Get the token donations are paid in
    pub fn get_token(env: Env) -> Result<Address, ProjectFundingError> {
        env.storage()
            .instance()
            .get(&DataKey::Token)
            .ok_or(ProjectFundingError::NotInitialized)
    }

    /// Transfer the admin role to `new_admin`.
    ///
    /// Requires authorization from the current admin. Emits [`AdminChangedEvent`].
    pub fn set_admin(
        env: Env,
        current_admin: Address,
        new_admin: Address,
    ) -> Result<(), ProjectFundingError> {
        let stored_admin = Self::get_admin(env.clone())?;
        if current_admin != stored_admin {
            return Err(ProjectFundingError::Unauthorized);
        }
        current_admin.require_auth();
        env.storage().instance().set(&DataKey::Admin, &new_admin);
        storage::bump_instance(&env);
        AdminChangedEvent {
            old_admin: current_admin,
            new_admin,
        }
        .publish(&env);
        Ok(())
    }
}

impl ProjectFundingContract {
    fn require_initialized(env: &Env) -> Result<Address, ProjectFundingError> {
        env.storage()
            .instance()
            .get(&DataKey::Token)
            .ok_or(ProjectFundingError::NotInitialized)
    }

    fn set_funding_active(
        env: &Env,
        caller: &Address,
        project_id: u64,
        next: impl FnOnce(bool) -> bool,
    ) -> Result<bool, ProjectFundingError> {
        Self::require_initialized(env)?;

        let mut project = storage::load_project(env, project_id)?;

        if *caller != project.beneficiary {
            return Err(ProjectFundingError::Unauthorized);
        }
        caller.require_auth();

        if project.is_completed {
            return Err(ProjectFundingError::ProjectCompleted);
        }

        project.is_funding_active = next(project.is_funding_active);
        storage::save_project(env, &project);

        log!(env, "funding status changed", project_id, project.is_funding_active);

        FundingStatusChangedEvent {
            project_id,
            is_funding_active: project.is_funding_active,
            timestamp: env.ledger().timestamp(),
        }
        .publish(env);

        Ok(project.is_funding_active)
    }
}
