mod address_finder;
mod batch_plan;
mod constants;
mod instruction_builders;
mod pricing;
mod transaction_builders;
mod wallets;

pub use address_finder::AddressFinder;
pub use batch_plan::*;
pub use constants::*;
pub use instruction_builders::*;
pub use pricing::*;
pub use transaction_builders::*;
pub use wallets::*;
