//! Application layer orchestrating the order flow.
//!
//! `OrderService` and `AsyncOrderService` run the same sequence: price the
//! items, authorize the payment, persist the order, and audit the outcome.
//! The rules live in `domain::checkout`; the services only sequence the
//! collaborator calls, blocking or awaited.

pub mod async_order_service;
pub mod order_service;
