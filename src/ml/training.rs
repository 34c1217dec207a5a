//! Training-frame assembly for the offline trainer: row filtering, median
//! imputation, sex encoding, and the seeded stratified split.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::dataset::{Dataset, Sex};
use crate::ml::N_FEATURES;

#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    pub x: Vec<[f64; N_FEATURES]>,
    pub y: Vec<u8>,
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

/// Builds the `[Age, Sex, Height, Weight]` → medal/no-medal training frame.
/// Rows without a known age are dropped; missing height and weight are
/// imputed with the median of the retained rows' known values.
pub fn build_training_set(ds: &Dataset) -> TrainingSet {
    let retained: Vec<_> = ds.rows().iter().filter(|r| r.age.is_some()).collect();

    let height_median = median(retained.iter().filter_map(|r| r.height));
    let weight_median = median(retained.iter().filter_map(|r| r.weight));

    let mut set = TrainingSet::default();
    for r in retained {
        let sex = match r.sex {
            Sex::F => 0.0,
            Sex::M => 1.0,
        };
        set.x.push([
            r.age.unwrap_or_default(),
            sex,
            r.height.unwrap_or(height_median),
            r.weight.unwrap_or(weight_median),
        ]);
        set.y.push(u8::from(r.medal.is_some()));
    }
    set
}

/// Median of the yielded values; 0.0 when the iterator is empty. Averages the
/// two central values for even counts.
fn median(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}

/// Stratified train/test split: each class is shuffled and divided
/// separately so the test set keeps the class balance.
pub fn train_test_split(set: &TrainingSet, test_fraction: f64, seed: u64) -> (TrainingSet, TrainingSet) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = TrainingSet::default();
    let mut test = TrainingSet::default();

    for class in [0u8, 1u8] {
        let mut indices: Vec<usize> = (0..set.len()).filter(|&i| set.y[i] == class).collect();
        indices.shuffle(&mut rng);
        let n_test = (indices.len() as f64 * test_fraction).round() as usize;
        for (k, &i) in indices.iter().enumerate() {
            let target = if k < n_test { &mut test } else { &mut train };
            target.x.push(set.x[i]);
            target.y.push(set.y[i]);
        }
    }
    (train, test)
}

/// Fraction of correct predictions at a 0.5 probability threshold.
pub fn accuracy<F>(predict: F, set: &TrainingSet) -> f64
where
    F: Fn(&[f64; N_FEATURES]) -> f64,
{
    if set.is_empty() {
        return 0.0;
    }
    let mut correct = 0usize;
    for (row, &label) in set.x.iter().zip(&set.y) {
        if u8::from(predict(row) >= 0.5) == label {
            correct += 1;
        }
    }
    correct as f64 / set.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{AthleteRow, Medal};

    fn row(
        id: u32,
        sex: Sex,
        age: Option<f64>,
        height: Option<f64>,
        weight: Option<f64>,
        medal: Option<Medal>,
    ) -> AthleteRow {
        AthleteRow {
            id,
            sex,
            age,
            height,
            weight,
            year: 2000,
            season: "Summer".to_string(),
            sport: "Judo".to_string(),
            medal,
            noc: "FRA".to_string(),
            region: Some("France".to_string()),
        }
    }

    #[test]
    fn build_drops_unknown_ages_and_imputes_medians() {
        let ds = Dataset::new(vec![
            row(1, Sex::M, Some(20.0), Some(180.0), Some(80.0), Some(Medal::Gold)),
            row(2, Sex::F, Some(25.0), Some(160.0), None, None),
            row(3, Sex::F, Some(30.0), None, Some(60.0), None),
            row(4, Sex::M, None, Some(190.0), Some(90.0), Some(Medal::Silver)),
        ]);
        let set = build_training_set(&ds);

        // Row 4 has no age and is dropped.
        assert_eq!(set.len(), 3);
        assert_eq!(set.y, vec![1, 0, 0]);
        // Medians over retained known values: height (160+180)/2, weight (60+80)/2.
        assert_eq!(set.x[2][2], 170.0);
        assert_eq!(set.x[1][3], 70.0);
        // Sex encoding: M → 1, F → 0.
        assert_eq!(set.x[0][1], 1.0);
        assert_eq!(set.x[1][1], 0.0);
    }

    #[test]
    fn median_handles_odd_even_and_empty() {
        assert_eq!(median([3.0, 1.0, 2.0].into_iter()), 2.0);
        assert_eq!(median([4.0, 1.0, 2.0, 3.0].into_iter()), 2.5);
        assert_eq!(median(std::iter::empty()), 0.0);
    }

    #[test]
    fn split_is_stratified_and_seeded() {
        let mut set = TrainingSet::default();
        for i in 0..100 {
            set.x.push([f64::from(i), 0.0, 170.0, 70.0]);
            set.y.push(u8::from(i < 20));
        }
        let (train, test) = train_test_split(&set, 0.2, 42);

        assert_eq!(train.len() + test.len(), 100);
        assert_eq!(test.len(), 20);
        // 20% of each class: 4 positives and 16 negatives in the test set.
        assert_eq!(test.y.iter().filter(|&&l| l == 1).count(), 4);
        assert_eq!(train.y.iter().filter(|&&l| l == 1).count(), 16);

        let (train2, test2) = train_test_split(&set, 0.2, 42);
        assert_eq!(test.x, test2.x);
        assert_eq!(train2.len(), train.len());
    }

    #[test]
    fn accuracy_counts_thresholded_matches() {
        let mut set = TrainingSet::default();
        set.x.push([1.0, 0.0, 0.0, 0.0]);
        set.y.push(1);
        set.x.push([0.0, 0.0, 0.0, 0.0]);
        set.y.push(0);

        assert_eq!(accuracy(|row| row[0], &set), 1.0);
        assert_eq!(accuracy(|_| 0.0, &set), 0.5);
        assert_eq!(accuracy(|_| 1.0, &set), 0.5);
    }
}
