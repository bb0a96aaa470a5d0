use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ProjectFundingError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    ProjectNotFound = 4,
    EmptyName = 5,
    InvalidFundingGoal = 6,
    InvalidAmount = 7,
    NothingToWithdraw = 8,
    ProjectCompleted = 9,
    AmountOverflow = 10,
}
