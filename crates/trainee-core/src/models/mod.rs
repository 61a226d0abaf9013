// ABOUTME: Domain model module for the Trainee API
// ABOUTME: Re-exports users, trainer profiles, specializations, reviews and images
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Trainer gallery images
pub mod image;
/// Client reviews
pub mod review;
/// Specializations and trainer links
pub mod specialization;
/// Trainer profiles
pub mod trainer;
/// User accounts
pub mod user;

pub use image::TrainerImage;
pub use review::{Review, ReviewInput, ReviewWithClient};
pub use specialization::{
    ExperienceLevel, NewSpecialization, NewTrainerSpecialization, Specialization,
    SpecializationLinkSummary, TrainerSpecialization,
};
pub use trainer::{round_rating, TrainerDetails, TrainerProfile, TrainerProfileFields};
pub use user::{NewUser, User, UserProfileUpdate, UserRole, UserSummary};
