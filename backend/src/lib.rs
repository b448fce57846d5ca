//! ParentWise backend: HTTP JSON API over a SQLite store for tracking child
//! development: accounts, families, children, milestones, activities, and
//! AI-generated parenting plans.

pub mod ai;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod rest;
pub mod storage;
