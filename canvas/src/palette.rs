//! Gradient references and the palette boundary.
//!
//! The engine never interprets gradient internals. It stores a
//! [`GradientRef`] on each element and asks a [`Palette`] either to pick one
//! at random or to resolve a reference into display colors.

#[cfg(test)]
#[path = "palette_test.rs"]
mod palette_test;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Name of a palette entry, stored on elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradientRef(pub String);

impl GradientRef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A named two-stop gradient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gradient {
    pub name: &'static str,
    /// CSS color of the first stop.
    pub from: &'static str,
    /// CSS color of the last stop.
    pub to: &'static str,
}

/// A finite, enumerable set of gradients.
pub trait Palette {
    /// Every gradient `pick` may return.
    fn gradients(&self) -> &[Gradient];

    /// Gradient assigned to freshly created shapes, which start uncolored.
    fn neutral(&self) -> GradientRef;

    /// Look up display colors for a stored reference.
    fn resolve(&self, gradient: &GradientRef) -> Option<&Gradient> {
        self.gradients().iter().find(|g| g.name == gradient.as_str())
    }

    /// Choose one gradient uniformly at random.
    fn pick(&self, rng: &mut dyn rand::RngCore) -> GradientRef {
        let all = self.gradients();
        if all.is_empty() {
            return self.neutral();
        }
        let index = rng.random_range(0..all.len());
        GradientRef::new(all[index].name)
    }
}

const BUILTIN: &[Gradient] = &[
    Gradient { name: "Rainbow", from: "#ef4444", to: "#a855f7" },
    Gradient { name: "Sunset", from: "#fb923c", to: "#ec4899" },
    Gradient { name: "Ocean", from: "#60a5fa", to: "#14b8a6" },
    Gradient { name: "Forest", from: "#4ade80", to: "#0d9488" },
    Gradient { name: "Purple", from: "#a78bfa", to: "#6366f1" },
    Gradient { name: "Fire", from: "#facc15", to: "#dc2626" },
    Gradient { name: "Mint", from: "#6ee7b7", to: "#60a5fa" },
    Gradient { name: "Rose", from: "#f472b6", to: "#ef4444" },
    Gradient { name: "Cosmic", from: "#6366f1", to: "#ec4899" },
    Gradient { name: "Gold", from: "#fbbf24", to: "#f97316" },
];

const GRAY: Gradient = Gradient { name: "Gray", from: "#e5e7eb", to: "#e5e7eb" };

/// The ten stock gradients plus a neutral gray.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinPalette;

impl Palette for BuiltinPalette {
    fn gradients(&self) -> &[Gradient] {
        BUILTIN
    }

    fn neutral(&self) -> GradientRef {
        GradientRef::new(GRAY.name)
    }

    fn resolve(&self, gradient: &GradientRef) -> Option<&Gradient> {
        if gradient.as_str() == GRAY.name {
            return Some(&GRAY);
        }
        BUILTIN.iter().find(|g| g.name == gradient.as_str())
    }
}
