//! Domain types, order rules, and the collaborator ports.

pub mod audit;
pub mod authorization;
pub mod checkout;
pub mod money;
pub mod order;
pub mod ports;
