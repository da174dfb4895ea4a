mod block_address;
mod reconcile_on_startup;
mod sweep_expired;
mod unblock_address;

pub use block_address::BlockAddressUseCase;
pub use reconcile_on_startup::ReconcileOnStartupUseCase;
pub use sweep_expired::SweepExpiredUseCase;
pub use unblock_address::UnblockAddressUseCase;
