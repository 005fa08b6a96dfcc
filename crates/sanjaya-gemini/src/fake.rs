use std::hash::{Hash, Hasher};

use twox_hash::XxHash64;

use sanjaya_core::traits::{DocumentEmbedder, QueryEmbedder};
use sanjaya_core::types::QueryVector;
use sanjaya_core::{Error, Result};

/// Deterministic bag-of-words embedder. Each whitespace token is hashed into a
/// bucket, then the vector is L2-normalized. Queries and documents share one space.
pub struct FakeEmbedder {
    dim: usize,
}

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.to_lowercase().hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        v
    }
}

impl QueryEmbedder for FakeEmbedder {
    fn embed_query(&self, text: &str) -> Result<QueryVector> {
        QueryVector::new(self.embed_text(text)).ok_or_else(|| Error::Embedding("empty query embedding".into()))
    }
}

impl DocumentEmbedder for FakeEmbedder {
    fn embed_document(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_text(text))
    }
}
