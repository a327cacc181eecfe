// Copyright (c) 2025 The Parcela Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cards;
pub mod categories;
pub mod doctor;
pub mod exporter;
pub mod invoice;
pub mod owners;
pub mod reports;
pub mod transactions;
