//! Property tests for the hypervector algebra.

use hypercache_core::HyperVector;

const DIMS: usize = 10_000;
/// Small dimension for tests that loop `dims` times.
const DIMS_SMALL: usize = 128;

fn assert_near_half(label: &str, s: f64) {
    assert!(
        (0.45..=0.55).contains(&s),
        "{label}: expected similarity ~0.5 (quasi-orthogonal), got {s:.4}"
    );
}

// ---- construction ----------------------------------------------------------

#[test]
fn new_is_the_zero_vector() {
    let v = HyperVector::new(DIMS).unwrap();
    assert_eq!(v.dims(), DIMS);
    assert!(v.words().iter().all(|&w| w == 0));
}

#[test]
fn from_words_round_trips_the_bit_pattern() {
    let a = HyperVector::random(DIMS, 1).unwrap();
    let b = HyperVector::from_words(DIMS, a.words()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn from_words_zeroes_padding() {
    // dims=65 -> 2 words; bits 1..64 of the second word are padding.
    let v = HyperVector::from_words(65, &[u64::MAX, u64::MAX]).unwrap();
    assert_eq!(v.similarity(&v).unwrap(), 1.0);
    assert_eq!(v.words()[1], 1);
}

// ---- clone -----------------------------------------------------------------

#[test]
fn clone_is_identical_and_independent() {
    let a = HyperVector::random(DIMS, 42).unwrap();
    let b = a.clone();
    assert_eq!(a.similarity(&b).unwrap(), 1.0);

    // Deriving a new vector from the clone leaves the original untouched.
    let bound = b.bind(&HyperVector::random(DIMS, 99).unwrap()).unwrap();
    assert!(a.similarity(&bound).unwrap() < 0.55);
    assert_eq!(a.similarity(&b).unwrap(), 1.0);
}

// ---- bind ------------------------------------------------------------------

#[test]
fn bind_is_self_inverse() {
    let a = HyperVector::random(DIMS, 1).unwrap();
    let b = HyperVector::random(DIMS, 2).unwrap();
    assert_eq!(a.bind(&b).unwrap().bind(&b).unwrap(), a);
}

#[test]
fn bind_is_commutative() {
    let a = HyperVector::random(DIMS, 1).unwrap();
    let b = HyperVector::random(DIMS, 2).unwrap();
    assert_eq!(a.bind(&b).unwrap(), b.bind(&a).unwrap());
}

#[test]
fn bind_result_is_quasi_orthogonal_to_inputs() {
    let a = HyperVector::random(DIMS, 1).unwrap();
    let b = HyperVector::random(DIMS, 2).unwrap();
    let ab = a.bind(&b).unwrap();
    assert_near_half("bind result vs a", a.similarity(&ab).unwrap());
    assert_near_half("bind result vs b", b.similarity(&ab).unwrap());
}

// ---- bundle ----------------------------------------------------------------

#[test]
fn bundle_of_one_is_identity() {
    let v = HyperVector::random(DIMS, 42).unwrap();
    assert_eq!(HyperVector::bundle(std::slice::from_ref(&v)).unwrap(), v);
}

#[test]
fn bundle_of_identical_vectors_is_identity() {
    let v = HyperVector::random(DIMS, 1).unwrap();
    let bundled = HyperVector::bundle(&[v.clone(), v.clone(), v.clone()]).unwrap();
    assert_eq!(bundled, v);
}

#[test]
fn bundle_resembles_each_input() {
    let a = HyperVector::random(DIMS, 1).unwrap();
    let b = HyperVector::random(DIMS, 2).unwrap();
    let c = HyperVector::random(DIMS, 3).unwrap();
    let bundled = HyperVector::bundle(&[a.clone(), b.clone(), c.clone()]).unwrap();

    // Each input contributes ~2/3 of the bits; expected similarity ~0.75.
    for (label, v) in [("a", &a), ("b", &b), ("c", &c)] {
        let s = bundled.similarity(v).unwrap();
        assert!(
            (0.68..=0.82).contains(&s),
            "bundle vs {label}: expected ~0.75, got {s:.4}"
        );
    }
}

// ---- similarity ------------------------------------------------------------

#[test]
fn similarity_with_self_is_one() {
    let v = HyperVector::random(DIMS, 42).unwrap();
    assert_eq!(v.similarity(&v).unwrap(), 1.0);
}

#[test]
fn similarity_with_complement_is_zero() {
    let v = HyperVector::random(DIMS, 42).unwrap();
    let ones = HyperVector::from_words(DIMS, &vec![u64::MAX; DIMS.div_ceil(64)]).unwrap();
    let complement = v.bind(&ones).unwrap();
    assert_eq!(v.similarity(&complement).unwrap(), 0.0);
}

#[test]
fn unrelated_random_vectors_sit_near_half() {
    let a = HyperVector::random(DIMS, 100).unwrap();
    let b = HyperVector::random(DIMS, 200).unwrap();
    assert_near_half("unrelated random vectors", a.similarity(&b).unwrap());
}

// ---- permute ---------------------------------------------------------------

#[test]
fn permuting_dims_times_restores_the_original() {
    let v = HyperVector::random(DIMS_SMALL, 42).unwrap();
    let mut cycled = v.clone();
    for _ in 0..DIMS_SMALL {
        cycled = cycled.permute();
    }
    assert_eq!(cycled, v);
}

#[test]
fn permute_cycles_across_word_boundaries() {
    // 65 dims exercises the two-word boundary explicitly.
    let v = HyperVector::random(65, 7).unwrap();
    let mut cycled = v.clone();
    for _ in 0..65 {
        cycled = cycled.permute();
    }
    assert_eq!(cycled, v);
}

#[test]
fn single_permute_is_quasi_orthogonal() {
    let v = HyperVector::random(DIMS, 42).unwrap();
    assert_near_half("single permute", v.similarity(&v.permute()).unwrap());
}

#[test]
fn permute_moves_bit_zero_to_the_top() {
    let mut words = vec![0u64; 2];
    words[0] = 1; // only bit 0 set
    let v = HyperVector::from_words(65, &words).unwrap();
    let p = v.permute();
    // Bit 0 wraps to position dims-1 = 64, i.e. bit 0 of the second word.
    assert_eq!(p.words()[0], 0);
    assert_eq!(p.words()[1], 1);
}
