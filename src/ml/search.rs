//! Exact nearest-neighbour search over a flat vector matrix

use crate::error::{HrError, Result};
use crate::ml::embedding::Embedding;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Distance metric recorded in index manifests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Squared Euclidean distance (lower = closer)
    #[default]
    SquaredL2,
}

impl DistanceMetric {
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            DistanceMetric::SquaredL2 => a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum(),
        }
    }
}

/// Search hit: row of the matrix and its distance to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub row: usize,
    pub distance: f32,
}

/// Flat index: every query is compared with every stored vector
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimension: usize,
    metric: DistanceMetric,
    vectors: Vec<Embedding>,
}

impl FlatIndex {
    pub fn new(dimension: usize, metric: DistanceMetric) -> Self {
        Self {
            dimension,
            metric,
            vectors: Vec::new(),
        }
    }

    /// Build from a matrix whose rows all share one dimension
    pub fn from_vectors(vectors: Vec<Embedding>, metric: DistanceMetric) -> Result<Self> {
        let dimension = vectors
            .first()
            .map(|v| v.len())
            .ok_or_else(|| HrError::Index("No vectors to index".to_string()))?;

        let mut index = Self::new(dimension, metric);
        for vector in vectors {
            index.add(vector)?;
        }
        Ok(index)
    }

    pub fn add(&mut self, vector: Embedding) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(HrError::Index(format!(
                "Vector dimension {} doesn't match index dimension {}",
                vector.len(),
                self.dimension
            )));
        }
        self.vectors.push(vector);
        Ok(())
    }

    /// Up to `k` closest rows, ascending distance; equal distances keep row order
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if query.len() != self.dimension {
            return Err(HrError::Index(format!(
                "Query dimension {} doesn't match index dimension {}",
                query.len(),
                self.dimension
            )));
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut hits: Vec<SearchHit> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(row, vector)| SearchHit {
                row,
                distance: self.metric.distance(query, vector),
            })
            .collect();

        hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
        hits.truncate(k);
        Ok(hits)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vectors(&self) -> &[Embedding] {
        &self.vectors
    }
}
