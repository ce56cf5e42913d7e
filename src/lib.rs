//! Backend del panel administrativo de un despachante
//!
//! Clientes, vehículos, servicios con checklist, lançamentos financieros
//! y auditoría, expuestos como API REST sobre axum.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
