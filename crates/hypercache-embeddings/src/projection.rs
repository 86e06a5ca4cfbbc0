//! Random-hyperplane projection from dense embeddings to hypervectors.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

use hypercache_core::HyperVector;

use crate::error::{EmbeddingError, EmbeddingResult};

/// Projects dense float embeddings to binary hypervectors by locality-
/// sensitive hashing: bit i of the output is the sign of the dot product
/// between the embedding and the i-th random hyperplane.
///
/// The hyperplanes are drawn once from a standard-normal ChaCha8 stream and
/// L2-normalized row by row, so the projection is deterministic for a given
/// seed and embeddings that are close in cosine distance land on nearby
/// hypervectors.
pub struct Projector {
    emb_dims: usize,
    binary_dims: usize,
    /// Row-major `[binary_dims][emb_dims]` hyperplanes.
    planes: Vec<f32>,
}

impl Projector {
    /// Generate the hyperplanes for an `emb_dims -> binary_dims` projection.
    ///
    /// # Errors
    /// `EmbeddingError::Config` when either dimension is zero.
    pub fn new(emb_dims: usize, binary_dims: usize, seed: u64) -> EmbeddingResult<Self> {
        if emb_dims == 0 {
            return Err(EmbeddingError::config("emb_dims must be positive"));
        }
        if binary_dims == 0 {
            return Err(EmbeddingError::config("binary_dims must be positive"));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut planes = vec![0f32; binary_dims * emb_dims];
        for row in planes.chunks_exact_mut(emb_dims) {
            for v in row.iter_mut() {
                *v = rng.sample(StandardNormal);
            }
            l2_normalize(row);
        }

        Ok(Self {
            emb_dims,
            binary_dims,
            planes,
        })
    }

    /// Input embedding dimensionality.
    #[must_use]
    pub fn emb_dims(&self) -> usize {
        self.emb_dims
    }

    /// Output hypervector dimensionality.
    #[must_use]
    pub fn binary_dims(&self) -> usize {
        self.binary_dims
    }

    /// Project an embedding to a hypervector: bit i is set iff
    /// `dot(embedding, plane_i) >= 0`.
    ///
    /// # Errors
    /// `EmbeddingError::InvalidDimension` when the embedding length does not
    /// match [`emb_dims`](Projector::emb_dims).
    pub fn project(&self, embedding: &[f32]) -> EmbeddingResult<HyperVector> {
        if embedding.len() != self.emb_dims {
            return Err(EmbeddingError::InvalidDimension {
                expected: self.emb_dims,
                actual: embedding.len(),
            });
        }

        let mut words = vec![0u64; self.binary_dims.div_ceil(64)];
        for (i, plane) in self.planes.chunks_exact(self.emb_dims).enumerate() {
            if dot(embedding, plane) >= 0.0 {
                words[i / 64] |= 1 << (i % 64);
            }
        }
        Ok(HyperVector::from_words(self.binary_dims, &words)?)
    }
}

/// Normalize a vector to unit length in place; zero vectors are left alone.
pub(crate) fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm > 0.0 {
        let scale = (1.0 / norm) as f32;
        for x in v.iter_mut() {
            *x *= scale;
        }
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_rejects_zero_dimensions() {
        assert!(Projector::new(0, 100, 1).is_err());
        assert!(Projector::new(384, 0, 1).is_err());
    }

    #[test]
    fn projection_is_deterministic_for_a_seed() {
        let p1 = Projector::new(16, 256, 7).unwrap();
        let p2 = Projector::new(16, 256, 7).unwrap();
        let emb: Vec<f32> = (0..16).map(|i| (i as f32 * 0.37).sin()).collect();
        assert_eq!(p1.project(&emb).unwrap(), p2.project(&emb).unwrap());
    }

    #[test]
    fn different_seeds_disagree() {
        let p1 = Projector::new(16, 10_000, 1).unwrap();
        let p2 = Projector::new(16, 10_000, 2).unwrap();
        let emb: Vec<f32> = (0..16).map(|i| (i as f32 * 0.37).sin()).collect();
        let s = p1
            .project(&emb)
            .unwrap()
            .similarity(&p2.project(&emb).unwrap())
            .unwrap();
        assert!((0.40..=0.60).contains(&s), "similarity {s:.4}");
    }

    #[test]
    fn wrong_embedding_length_is_rejected() {
        let p = Projector::new(16, 64, 1).unwrap();
        assert!(matches!(
            p.project(&[0.0; 15]),
            Err(EmbeddingError::InvalidDimension {
                expected: 16,
                actual: 15
            })
        ));
    }

    #[test]
    fn opposite_embeddings_project_to_complements() {
        let p = Projector::new(16, 1024, 3).unwrap();
        let emb: Vec<f32> = (0..16).map(|i| (i as f32 * 0.61).cos()).collect();
        let neg: Vec<f32> = emb.iter().map(|x| -x).collect();

        // dot(-e, h) = -dot(e, h): bits flip except exact zeros, which both
        // round to 1. With real-valued planes exact zeros are measure-zero.
        let s = p
            .project(&emb)
            .unwrap()
            .similarity(&p.project(&neg).unwrap())
            .unwrap();
        assert!(s <= 0.01, "complement similarity {s:.4}");
    }

    #[test]
    fn nearby_embeddings_project_to_similar_vectors() {
        let p = Projector::new(16, 10_000, 5).unwrap();
        let emb: Vec<f32> = (0..16).map(|i| (i as f32 * 0.37).sin()).collect();
        let mut nudged = emb.clone();
        nudged[0] += 0.01;

        let far: Vec<f32> = (0..16).map(|i| (i as f32 * 1.93).cos()).collect();

        let near_sim = p
            .project(&emb)
            .unwrap()
            .similarity(&p.project(&nudged).unwrap())
            .unwrap();
        let far_sim = p
            .project(&emb)
            .unwrap()
            .similarity(&p.project(&far).unwrap())
            .unwrap();
        assert!(
            near_sim > far_sim,
            "near {near_sim:.4} must beat far {far_sim:.4}"
        );
        assert!(near_sim > 0.95, "near similarity {near_sim:.4}");
    }

    #[test]
    fn l2_normalize_produces_unit_length() {
        let mut v = vec![3.0f32, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);

        let mut zero = vec![0.0f32; 4];
        l2_normalize(&mut zero);
        assert!(zero.iter().all(|&x| x == 0.0));
    }
}
