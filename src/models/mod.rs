// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod category;
pub mod report;
pub mod suggestion;
pub mod user;

pub use activity::{Activity, ActivityInput, NewActivity};
pub use category::{Category, CategoryEmissionResult, CategoryKind};
pub use report::{Report, ReportState};
pub use suggestion::Suggestion;
pub use user::{NewUser, User};
