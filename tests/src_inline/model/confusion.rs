use super::*;

const BINS: [i64; 6] = [0, 1, 2, 3, 4, 5];

fn lcg(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state >> 33
}

fn random_labels(seed: u64, n: usize) -> (Vec<i64>, Vec<i64>) {
    let mut state = seed;
    let truth = (0..n).map(|_| (lcg(&mut state) % 6) as i64).collect();
    let predicted = (0..n).map(|_| (lcg(&mut state) % 6) as i64).collect();
    (truth, predicted)
}

#[test]
fn test_build_ghost_scenario() {
    let m = ConfusionMatrix::build(&[0, 0, 5], &[0, 5, 5], &BINS, UnknownLabelPolicy::Ignore)
        .unwrap();
    assert_eq!(m.k(), 6);
    assert_eq!(m.get(0, 0), 1);
    assert_eq!(m.get(0, 5), 1);
    assert_eq!(m.get(5, 5), 1);
    assert_eq!(m.total(), 3);
    assert_eq!(m.trace(), 2);
}

#[test]
fn test_cell_sum_equals_input_length() {
    for seed in 0..16u64 {
        let n = (seed as usize) * 37;
        let (truth, predicted) = random_labels(seed, n);
        let m =
            ConfusionMatrix::build(&truth, &predicted, &BINS, UnknownLabelPolicy::Reject).unwrap();
        assert_eq!(m.total(), n as u64);
    }
}

#[test]
fn test_joint_permutation_invariance() {
    let (truth, predicted) = random_labels(7, 200);
    let base =
        ConfusionMatrix::build(&truth, &predicted, &BINS, UnknownLabelPolicy::Ignore).unwrap();

    let mut order = (0..truth.len()).collect::<Vec<_>>();
    order.reverse();
    order.rotate_left(13);
    let truth_perm = order.iter().map(|&i| truth[i]).collect::<Vec<_>>();
    let predicted_perm = order.iter().map(|&i| predicted[i]).collect::<Vec<_>>();
    let permuted =
        ConfusionMatrix::build(&truth_perm, &predicted_perm, &BINS, UnknownLabelPolicy::Ignore)
            .unwrap();
    assert_eq!(base, permuted);
}

#[test]
fn test_length_mismatch_is_error() {
    let err = ConfusionMatrix::build(&[0, 1], &[0], &BINS, UnknownLabelPolicy::Ignore).unwrap_err();
    assert_eq!(
        err,
        MatrixError::LengthMismatch {
            truth: 2,
            predicted: 1
        }
    );
}

#[test]
fn test_unknown_label_policies() {
    let ignored =
        ConfusionMatrix::build(&[0, 9, 1], &[0, 1, 7], &BINS, UnknownLabelPolicy::Ignore).unwrap();
    assert_eq!(ignored.total(), 1);
    assert_eq!(ignored.get(0, 0), 1);

    let err = ConfusionMatrix::build(&[0, 1], &[0, 7], &BINS, UnknownLabelPolicy::Reject)
        .unwrap_err();
    assert_eq!(err, MatrixError::UnknownLabel(7));
}

#[test]
fn test_duplicate_label_rejected() {
    let err = ConfusionMatrix::build(&[0], &[0], &[0, 1, 0], UnknownLabelPolicy::Ignore)
        .unwrap_err();
    assert_eq!(err, MatrixError::DuplicateLabel(0));
}

#[test]
fn test_label_order_follows_declared_set() {
    let m = ConfusionMatrix::build(&[5, 0], &[0, 0], &[5, 0], UnknownLabelPolicy::Ignore).unwrap();
    assert_eq!(m.get(0, 1), 1);
    assert_eq!(m.get(1, 1), 1);
}

#[test]
fn test_add_and_shape_mismatch() {
    let a = ConfusionMatrix::from_rows(vec![vec![1, 0], vec![0, 1]]).unwrap();
    let b = ConfusionMatrix::from_rows(vec![vec![0, 1], vec![1, 0]]).unwrap();
    let sum = a.checked_add(&b).unwrap();
    assert_eq!(
        sum,
        ConfusionMatrix::from_rows(vec![vec![1, 1], vec![1, 1]]).unwrap()
    );

    let c = ConfusionMatrix::zeros(3);
    assert_eq!(
        a.checked_add(&c).unwrap_err(),
        MatrixError::ShapeMismatch { left: 2, right: 3 }
    );
}

#[test]
fn test_from_rows_rejects_ragged() {
    let err = ConfusionMatrix::from_rows(vec![vec![1, 0], vec![0]]).unwrap_err();
    assert_eq!(
        err,
        MatrixError::NotSquare {
            rows: 2,
            row: 1,
            len: 1
        }
    );
}

#[test]
fn test_accuracy() {
    assert_eq!(ConfusionMatrix::zeros(6).accuracy(), None);
    let m = ConfusionMatrix::from_rows(vec![vec![3, 1], vec![0, 4]]).unwrap();
    assert_eq!(m.accuracy(), Some(7.0 / 8.0));
}

#[test]
fn test_serializes_as_nested_rows() {
    let m = ConfusionMatrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
    let json = serde_json::to_string(&m).unwrap();
    assert_eq!(json, "[[1,2],[3,4]]");
    let back: ConfusionMatrix = serde_json::from_str(&json).unwrap();
    assert_eq!(back, m);
    assert!(serde_json::from_str::<ConfusionMatrix>("[[1,2],[3]]").is_err());
}
