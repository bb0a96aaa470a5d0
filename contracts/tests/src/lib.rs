#![cfg(test)]
extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token::{StellarAssetClient, TokenClient},
    Address, Env, String,
};

use project_backup::{export_projects, import_projects, read_backup, write_backup};
use project_funding::{
    ProjectFundingContract, ProjectFundingContractClient as LedgerClient, ProjectFundingError,
};

struct Protocol<'a> {
    ledger: LedgerClient<'a>,
    token: TokenClient<'a>,
    token_admin: StellarAssetClient<'a>,
    admin: Address,
}

fn deploy<'a>(env: &Env) -> Protocol<'a> {
    let admin = Address::generate(env);

    let token_id = env.register_stellar_asset_contract_v2(admin.clone());
    let token = TokenClient::new(env, &token_id.address());
    let token_admin = StellarAssetClient::new(env, &token_id.address());

    let ledger_id = env.register(ProjectFundingContract, ());
    let ledger = LedgerClient::new(env, &ledger_id);
    ledger.initialize(&admin, &token_id.address());

    Protocol {
        ledger,
        token,
        token_admin,
        admin,
    }
}

#[test]
fn test_beach_cleanup_lifecycle() {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|li| li.timestamp = 1_710_000_000);

    let protocol = deploy(&env);
    let beneficiary = Address::generate(&env);
    let donor = Address::generate(&env);
    protocol.token_admin.mint(&donor, &10_000_000);

    // 1 unit = 10_000_000 stroops
    let project_id = protocol.ledger.create_project(
        &protocol.admin,
        &String::from_str(&env, "Beach Cleanup"),
        &String::from_str(&env, "Community initiative to clean up Marina Beach"),
        &String::from_str(&env, "Marina Beach, Chennai"),
        &10_000_000,
        &beneficiary,
    );
    assert_eq!(project_id, 1);

    // Donor gives half a unit
    protocol.ledger.donate_to_project(&donor, &project_id, &5_000_000);

    let donations = protocol.ledger.get_project_donations(&project_id);
    assert_eq!(donations.len(), 1);
    let donation = donations.get(0).unwrap();
    assert_eq!(donation.donor, donor);
    assert_eq!(donation.amount, 5_000_000);
    assert_eq!(protocol.ledger.get_project(&project_id).funds_raised, 5_000_000);

    // A stranger cannot take the money
    let result = protocol.ledger.try_withdraw_funds(&donor, &project_id);
    assert_eq!(result, Err(Ok(ProjectFundingError::Unauthorized)));

    // The beneficiary can
    protocol.ledger.withdraw_funds(&beneficiary, &project_id);
    assert_eq!(protocol.ledger.get_project(&project_id).funds_raised, 0);

    let withdrawals = protocol.ledger.get_project_withdrawals(&project_id);
    assert_eq!(withdrawals.len(), 1);
    assert_eq!(withdrawals.get(0).unwrap().amount, 5_000_000);

    assert_eq!(protocol.token.balance(&beneficiary), 5_000_000);
    assert_eq!(protocol.token.balance(&donor), 5_000_000);
    assert_eq!(protocol.token.balance(&protocol.ledger.address), 0);

    // Wrap the project up
    protocol.ledger.toggle_funding_status(&beneficiary, &project_id, &false);
    protocol.ledger.toggle_funding_status(&beneficiary, &project_id, &true);
    protocol.ledger.complete_project(&beneficiary, &project_id);

    let project = protocol.ledger.get_project(&project_id);
    assert!(project.is_completed);
    assert!(!project.is_funding_active);
}

#[test]
fn test_user_indices_across_projects() {
    let env = Env::default();
    env.mock_all_auths();

    let protocol = deploy(&env);
    let alice = Address::generate(&env);
    let bob = Address::generate(&env);
    protocol.token_admin.mint(&bob, &1_000);

    let mut ids = std::vec::Vec::new();
    for name in ["Well", "School Roof", "Clinic"] {
        ids.push(protocol.ledger.create_project(
            &alice,
            &String::from_str(&env, name),
            &String::from_str(&env, ""),
            &String::from_str(&env, ""),
            &100,
            &alice,
        ));
    }

    protocol.ledger.donate_to_project(&bob, &ids[2], &10);
    protocol.ledger.donate_to_project(&bob, &ids[0], &10);
    protocol.ledger.donate_to_project(&bob, &ids[2], &10);

    let created = protocol.ledger.get_user_created_projects(&alice);
    assert_eq!(created.len(), 3);

    let donated = protocol.ledger.get_user_donated_projects(&bob);
    assert_eq!(donated.len(), 2);
    assert_eq!(donated.get(0), Some(ids[2]));
    assert_eq!(donated.get(1), Some(ids[0]));

    assert_eq!(protocol.ledger.get_user_donated_projects(&alice).len(), 0);
    assert_eq!(protocol.ledger.get_user_created_projects(&bob).len(), 0);
}

#[test]
fn test_migrate_projects_to_new_deployment() {
    let _ = env_logger::builder().is_test(true).try_init();

    let env = Env::default();
    env.mock_all_auths();

    let old = deploy(&env);
    let beneficiary = Address::generate(&env);
    for name in ["Beach Cleanup", "Tree Planting"] {
        old.ledger.create_project(
            &old.admin,
            &String::from_str(&env, name),
            &String::from_str(&env, "Chennai community"),
            &String::from_str(&env, "Chennai"),
            &10_000_000,
            &beneficiary,
        );
    }
    old.ledger.complete_project(&beneficiary, &2);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("projects-backup.json");
    let exported = export_projects(&old.ledger).unwrap();
    assert!(write_backup(&path, &exported).unwrap());

    let new = deploy(&env);
    let restored = read_backup(&path).unwrap();
    let ids = import_projects(&new.ledger, &new.admin, &restored).unwrap();
    assert_eq!(ids, std::vec![1, 2]);

    for id in ids {
        let before = old.ledger.get_project(&id);
        let after = new.ledger.get_project(&id);
        assert_eq!(after.name, before.name);
        assert_eq!(after.description, before.description);
        assert_eq!(after.location, before.location);
        assert_eq!(after.funding_goal, before.funding_goal);
        assert_eq!(after.beneficiary, before.beneficiary);
        assert_eq!(after.is_completed, before.is_completed);
        assert_eq!(after.is_funding_active, before.is_funding_active);
    }
}
