// ABOUTME: Macronutrient gram triple with derived energy content
// ABOUTME: MacroTargets is shared by window targets, redistribution output, and consumed totals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::energy::{KCAL_PER_G_CARBS, KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

/// Protein, carbohydrate, and fat grams
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTargets {
    /// Protein (grams)
    pub protein: f64,
    /// Carbohydrates (grams)
    pub carbs: f64,
    /// Fat (grams)
    pub fat: f64,
}

impl MacroTargets {
    /// Create a macro triple
    #[must_use]
    pub const fn new(protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            protein,
            carbs,
            fat,
        }
    }

    /// All-zero macros
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Calories derived from the fixed energy densities
    ///
    /// `protein * 4 + carbs * 4 + fat * 9`
    #[must_use]
    pub fn calories(&self) -> f64 {
        self.fat.mul_add(
            KCAL_PER_G_FAT,
            self.protein
                .mul_add(KCAL_PER_G_PROTEIN, self.carbs * KCAL_PER_G_CARBS),
        )
    }

    /// Every macro multiplied by `factor`
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.protein * factor, self.carbs * factor, self.fat * factor)
    }

    /// Negative grams replaced with zero
    #[must_use]
    pub fn non_negative(&self) -> Self {
        Self::new(self.protein.max(0.0), self.carbs.max(0.0), self.fat.max(0.0))
    }

    /// Whether every macro is exactly zero
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.calories().abs() < f64::EPSILON
            && self.protein.abs() < f64::EPSILON
            && self.carbs.abs() < f64::EPSILON
            && self.fat.abs() < f64::EPSILON
    }
}

impl Add for MacroTargets {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(
            self.protein + rhs.protein,
            self.carbs + rhs.carbs,
            self.fat + rhs.fat,
        )
    }
}

impl AddAssign for MacroTargets {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for MacroTargets {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(
            self.protein - rhs.protein,
            self.carbs - rhs.carbs,
            self.fat - rhs.fat,
        )
    }
}

impl Mul<f64> for MacroTargets {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scaled(rhs)
    }
}
