mod add_whitelist;
mod remove_whitelist;

pub use add_whitelist::AddWhitelistUseCase;
pub use remove_whitelist::RemoveWhitelistUseCase;
