// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: photos and their annotations.

pub mod annotation;
pub mod photo;
