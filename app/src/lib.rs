pub mod bootstrap;
pub mod catalog;
pub mod controllers;
pub mod docs;
pub mod dto;
pub mod migrations;
pub mod models;
pub mod profiles;
pub mod requests;
pub mod routes;
pub mod seed;
pub mod specifications;
