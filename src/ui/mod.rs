// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the annotation app.

pub mod canvas;
pub mod gallery;
pub mod note_prompt;
pub mod properties;
pub mod toolbar;
