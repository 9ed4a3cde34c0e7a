// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod commands;
pub mod config;
pub mod export;
pub mod insights;
pub mod ledger;
pub mod models;
pub mod month;
pub mod portfolio;
pub mod state;
pub mod store;
pub mod utils;
