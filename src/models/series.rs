// ============================================================================
// Structure : PriceSeries
// ============================================================================
// Fenêtre glissante des derniers prix, bornée à `capacity` points
//
// CONCEPTS RUST :
// 1. VecDeque : buffer circulaire, push_back/pop_front en O(1)
// 2. Invariant : len() <= capacity à tout moment
// 3. Éviction FIFO : le plus ancien point part en premier
// ============================================================================

use std::collections::VecDeque;

use crate::models::PricePoint;

/// Série bornée de points de prix, en ordre chronologique
#[derive(Debug, Clone)]
pub struct PriceSeries {
    points: VecDeque<PricePoint>,
    capacity: usize,
}

impl PriceSeries {
    /// Crée une série vide
    ///
    /// Une capacité nulle est ramenée à 1 : la série garde toujours au moins
    /// le dernier point.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Ajoute un point à la fin et évince le plus ancien si la série est pleine
    ///
    /// CONCEPT RUST : Option<T> en retour
    /// - Some(point) : le point évincé
    /// - None : rien n'a été retiré
    pub fn push(&mut self, point: PricePoint) -> Option<PricePoint> {
        let evicted = if self.points.len() == self.capacity {
            self.points.pop_front()
        } else {
            None
        };
        self.points.push_back(point);
        evicted
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Itère du plus ancien au plus récent
    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.front()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.back()
    }

    /// Bornes (min, max) des prix, None si la série est vide
    ///
    /// CONCEPT RUST : fold en un seul passage
    pub fn price_range(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        Some(self.points.iter().fold(
            (f64::MAX, f64::MIN),
            |(min, max), point| (min.min(point.price), max.max(point.price)),
        ))
    }

    /// Points (index, prix) prêts pour un Dataset ratatui
    pub fn chart_points(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, point)| (i as f64, point.price))
            .collect()
    }
}
