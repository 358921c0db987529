// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use thiserror::Error;

/// Why a seeding run stopped.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Tasks need at least one category and one priority to point at.
    /// Nothing has been written when this is returned.
    #[error(
        "found {categories} categories and {priorities} priorities; please add Categories and Priorities first"
    )]
    MissingReferenceData { categories: usize, priorities: usize },

    /// The store rejected a write. Bulk inserts that already committed stay.
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}
