//! HTTP surface of the Strive backend: app factory, routes, middleware,
//! DTOs and the domain-error to HTTP mapping.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
