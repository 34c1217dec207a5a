//! Group-by / pivot / top-N operations over the joined athlete table.
//!
//! Every function is a single pass over the immutable dataset. Rankings sort
//! by count (or mean) descending with ties broken lexicographically ascending
//! on the group key, which keeps results deterministic across runs.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::dataset::{Dataset, Medal, Sex};

/// Distinct mapped country names, ascending. Rows with unmapped NOC codes are
/// skipped.
pub fn distinct_regions(ds: &Dataset) -> Vec<String> {
    let set: BTreeSet<&str> = ds
        .rows()
        .iter()
        .filter_map(|r| r.region.as_deref())
        .collect();
    set.into_iter().map(str::to_owned).collect()
}

pub fn distinct_sports(ds: &Dataset) -> Vec<String> {
    let set: BTreeSet<&str> = ds.rows().iter().map(|r| r.sport.as_str()).collect();
    set.into_iter().map(str::to_owned).collect()
}

pub fn distinct_years(ds: &Dataset) -> Vec<i32> {
    let set: BTreeSet<i32> = ds.rows().iter().map(|r| r.year).collect();
    set.into_iter().collect()
}

fn rank_descending<K: Ord>(counts: HashMap<K, u64>) -> Vec<(K, u64)> {
    let mut entries: Vec<(K, u64)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
}

/// Medal counts per country, descending, truncated to `top`.
pub fn medals_by_country(
    ds: &Dataset,
    top: usize,
    year: Option<i32>,
    season: Option<&str>,
) -> Vec<(String, u64)> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for r in ds.rows() {
        if r.medal.is_none() {
            continue;
        }
        if year.is_some_and(|y| r.year != y) {
            continue;
        }
        if season.is_some_and(|s| r.season != s) {
            continue;
        }
        let Some(region) = &r.region else { continue };
        *counts.entry(region.clone()).or_insert(0) += 1;
    }
    let mut ranked = rank_descending(counts);
    ranked.truncate(top);
    ranked
}

/// Per-medal-type counts for a country, in Gold/Silver/Bronze order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MedalTypeCounts {
    #[serde(rename = "Gold")]
    pub gold: u64,
    #[serde(rename = "Silver")]
    pub silver: u64,
    #[serde(rename = "Bronze")]
    pub bronze: u64,
}

impl MedalTypeCounts {
    fn add(&mut self, medal: Medal) {
        match medal {
            Medal::Gold => self.gold += 1,
            Medal::Silver => self.silver += 1,
            Medal::Bronze => self.bronze += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.gold + self.silver + self.bronze
    }
}

/// Medal-type breakdown restricted to the top-10 countries by medal count
/// within the filtered rows. Countries come back in descending total order.
pub fn medals_by_type(
    ds: &Dataset,
    country: Option<&str>,
    year: Option<i32>,
) -> Vec<(String, MedalTypeCounts)> {
    let mut by_country: HashMap<String, MedalTypeCounts> = HashMap::new();
    for r in ds.rows() {
        let Some(medal) = r.medal else { continue };
        if country.is_some_and(|c| r.region.as_deref() != Some(c)) {
            continue;
        }
        if year.is_some_and(|y| r.year != y) {
            continue;
        }
        let Some(region) = &r.region else { continue };
        by_country.entry(region.clone()).or_default().add(medal);
    }

    let totals: HashMap<String, u64> = by_country
        .iter()
        .map(|(region, counts)| (region.clone(), counts.total()))
        .collect();
    let mut ranked = rank_descending(totals);
    ranked.truncate(10);

    ranked
        .into_iter()
        .map(|(region, _)| {
            let counts = by_country[&region];
            (region, counts)
        })
        .collect()
}

/// Appearance counts by sex, medalists and non-medalists alike. Descending by
/// count.
pub fn gender_distribution(
    ds: &Dataset,
    country: Option<&str>,
    year: Option<i32>,
    sport: Option<&str>,
) -> Vec<(Sex, u64)> {
    let mut counts = [0u64; 2];
    for r in ds.rows() {
        if country.is_some_and(|c| r.region.as_deref() != Some(c)) {
            continue;
        }
        if year.is_some_and(|y| r.year != y) {
            continue;
        }
        if sport.is_some_and(|s| r.sport != s) {
            continue;
        }
        counts[r.sex as usize] += 1;
    }
    // Only observed categories are reported, like a value-counts over the
    // filtered rows.
    let mut entries: Vec<(Sex, u64)> = [Sex::F, Sex::M]
        .into_iter()
        .map(|sex| (sex, counts[sex as usize]))
        .filter(|&(_, count)| count > 0)
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
    entries
}

const AGE_BIN_LOW: i32 = 10;
const AGE_BIN_HIGH: i32 = 75;
const AGE_BIN_WIDTH: i32 = 5;

/// Known-age rows bucketed into the fixed [10,75) five-year bins. All buckets
/// are present in ascending order, zero counts included; ages outside the
/// range fall into no bucket.
pub fn age_distribution(
    ds: &Dataset,
    country: Option<&str>,
    sport: Option<&str>,
) -> Vec<(String, u64)> {
    let n_bins = ((AGE_BIN_HIGH - AGE_BIN_LOW) / AGE_BIN_WIDTH) as usize;
    let mut counts = vec![0u64; n_bins];
    for r in ds.rows() {
        let Some(age) = r.age else { continue };
        if country.is_some_and(|c| r.region.as_deref() != Some(c)) {
            continue;
        }
        if sport.is_some_and(|s| r.sport != s) {
            continue;
        }
        if age >= AGE_BIN_LOW as f64 && age < AGE_BIN_HIGH as f64 {
            let idx = ((age - AGE_BIN_LOW as f64) / AGE_BIN_WIDTH as f64) as usize;
            counts[idx.min(n_bins - 1)] += 1;
        }
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let low = AGE_BIN_LOW + AGE_BIN_WIDTH * i as i32;
            (format!("{}-{}", low, low + AGE_BIN_WIDTH - 1), count)
        })
        .collect()
}

/// Yearly medal counts, ascending by year.
pub fn medals_over_time(
    ds: &Dataset,
    country: Option<&str>,
    season: Option<&str>,
) -> Vec<(i32, u64)> {
    let mut counts: BTreeMap<i32, u64> = BTreeMap::new();
    for r in ds.rows() {
        if r.medal.is_none() {
            continue;
        }
        if country.is_some_and(|c| r.region.as_deref() != Some(c)) {
            continue;
        }
        if season.is_some_and(|s| r.season != s) {
            continue;
        }
        *counts.entry(r.year).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

/// Medal counts per sport, descending, truncated to `top`.
pub fn top_sports_by_medals(ds: &Dataset, country: Option<&str>, top: usize) -> Vec<(String, u64)> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for r in ds.rows() {
        if r.medal.is_none() {
            continue;
        }
        if country.is_some_and(|c| r.region.as_deref() != Some(c)) {
            continue;
        }
        *counts.entry(r.sport.clone()).or_insert(0) += 1;
    }
    let mut ranked = rank_descending(counts);
    ranked.truncate(top);
    ranked
}

/// Mean age per sport over known-age rows, descending by mean, truncated to
/// `top`, means rounded to one decimal.
pub fn avg_age_by_sport(ds: &Dataset, country: Option<&str>, top: usize) -> Vec<(String, f64)> {
    let mut sums: HashMap<String, (f64, u64)> = HashMap::new();
    for r in ds.rows() {
        let Some(age) = r.age else { continue };
        if country.is_some_and(|c| r.region.as_deref() != Some(c)) {
            continue;
        }
        let entry = sums.entry(r.sport.clone()).or_insert((0.0, 0));
        entry.0 += age;
        entry.1 += 1;
    }
    let mut entries: Vec<(String, f64)> = sums
        .into_iter()
        .map(|(sport, (sum, n))| (sport, sum / n as f64))
        .collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(top);
    entries
        .into_iter()
        .map(|(sport, mean)| (sport, round1(mean)))
        .collect()
}

/// Yearly appearance counts per sex after collapsing each athlete to one row
/// per year. Sex-outer to match the serving shape: F first, then M.
pub fn gender_over_time(ds: &Dataset, season: Option<&str>) -> Vec<(Sex, Vec<(i32, u64)>)> {
    let mut seen: HashSet<(u32, i32)> = HashSet::new();
    let mut counts: BTreeMap<i32, [u64; 2]> = BTreeMap::new();
    for r in ds.rows() {
        if season.is_some_and(|s| r.season != s) {
            continue;
        }
        if seen.insert((r.id, r.year)) {
            counts.entry(r.year).or_insert([0, 0])[r.sex as usize] += 1;
        }
    }
    [Sex::F, Sex::M]
        .into_iter()
        .map(|sex| {
            let series = counts
                .iter()
                .map(|(&year, per_sex)| (year, per_sex[sex as usize]))
                .collect();
            (sex, series)
        })
        .collect()
}

/// Distinct athletes per year (one count per athlete per year), ascending.
pub fn athlete_count_over_time(ds: &Dataset, season: Option<&str>) -> Vec<(i32, u64)> {
    let mut seen: HashSet<(u32, i32)> = HashSet::new();
    let mut counts: BTreeMap<i32, u64> = BTreeMap::new();
    for r in ds.rows() {
        if season.is_some_and(|s| r.season != s) {
            continue;
        }
        if seen.insert((r.id, r.year)) {
            *counts.entry(r.year).or_insert(0) += 1;
        }
    }
    counts.into_iter().collect()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CountryStats {
    pub total_athletes: u64,
    pub total_medals: u64,
    pub gold: u64,
    pub silver: u64,
    pub bronze: u64,
    pub avg_age: Option<f64>,
    pub best_sport: Option<String>,
}

/// Summary for one country. An unknown country yields zero counts and null
/// avg_age/best_sport rather than an error.
pub fn country_stats(ds: &Dataset, country: &str) -> CountryStats {
    let mut athletes: HashSet<u32> = HashSet::new();
    let mut medals = MedalTypeCounts::default();
    let mut age_sum = 0.0;
    let mut age_count = 0u64;
    let mut sport_medals: HashMap<String, u64> = HashMap::new();

    for r in ds.rows() {
        if r.region.as_deref() != Some(country) {
            continue;
        }
        athletes.insert(r.id);
        if let Some(age) = r.age {
            age_sum += age;
            age_count += 1;
        }
        if let Some(medal) = r.medal {
            medals.add(medal);
            *sport_medals.entry(r.sport.clone()).or_insert(0) += 1;
        }
    }

    // Most-medaled sport; ties go to the lexicographically smallest name.
    let best_sport = sport_medals
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(sport, _)| sport);

    CountryStats {
        total_athletes: athletes.len() as u64,
        total_medals: medals.total(),
        gold: medals.gold,
        silver: medals.silver,
        bronze: medals.bronze,
        avg_age: (age_count > 0).then(|| round1(age_sum / age_count as f64)),
        best_sport,
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::AthleteRow;

    fn row(
        id: u32,
        sex: Sex,
        age: Option<f64>,
        year: i32,
        season: &str,
        sport: &str,
        medal: Option<Medal>,
        region: Option<&str>,
    ) -> AthleteRow {
        AthleteRow {
            id,
            sex,
            age,
            height: None,
            weight: None,
            year,
            season: season.to_string(),
            sport: sport.to_string(),
            medal,
            noc: "XXX".to_string(),
            region: region.map(str::to_owned),
        }
    }

    fn fixture() -> Dataset {
        Dataset::new(vec![
            row(1, Sex::M, Some(24.0), 1992, "Summer", "Judo", Some(Medal::Gold), Some("France")),
            row(1, Sex::M, Some(24.0), 1992, "Summer", "Judo", None, Some("France")),
            row(2, Sex::F, Some(30.0), 1992, "Summer", "Swimming", Some(Medal::Silver), Some("France")),
            row(2, Sex::F, Some(34.0), 1996, "Summer", "Swimming", Some(Medal::Gold), Some("France")),
            row(3, Sex::M, None, 1992, "Winter", "Ice Hockey", Some(Medal::Bronze), Some("Canada")),
            row(4, Sex::F, Some(19.0), 1996, "Summer", "Swimming", Some(Medal::Bronze), Some("Canada")),
            row(5, Sex::M, Some(75.0), 1996, "Summer", "Shooting", None, None),
        ])
    }

    #[test]
    fn distinct_filters_are_sorted_and_skip_missing() {
        let ds = fixture();
        assert_eq!(distinct_regions(&ds), vec!["Canada", "France"]);
        assert_eq!(
            distinct_sports(&ds),
            vec!["Ice Hockey", "Judo", "Shooting", "Swimming"]
        );
        assert_eq!(distinct_years(&ds), vec![1992, 1996]);
    }

    #[test]
    fn medals_by_country_ranks_descending_with_lexicographic_ties() {
        let ds = fixture();
        let ranked = medals_by_country(&ds, 10, None, None);
        assert_eq!(
            ranked,
            vec![("France".to_string(), 3), ("Canada".to_string(), 2)]
        );

        // top truncates after ranking
        let ranked = medals_by_country(&ds, 1, None, None);
        assert_eq!(ranked, vec![("France".to_string(), 3)]);
    }

    #[test]
    fn medals_by_country_filters_narrow_the_result() {
        let ds = fixture();
        let unfiltered: u64 = medals_by_country(&ds, 10, None, None)
            .into_iter()
            .map(|(_, n)| n)
            .sum();
        let filtered: u64 = medals_by_country(&ds, 10, Some(1992), Some("Summer"))
            .into_iter()
            .map(|(_, n)| n)
            .sum();
        assert!(filtered <= unfiltered);
        assert_eq!(filtered, 2); // Judo gold + Swimming silver
    }

    #[test]
    fn medals_by_type_pivots_per_country() {
        let ds = fixture();
        let pivot = medals_by_type(&ds, None, None);
        assert_eq!(pivot[0].0, "France");
        assert_eq!(
            pivot[0].1,
            MedalTypeCounts { gold: 2, silver: 1, bronze: 0 }
        );
        assert_eq!(pivot[1].0, "Canada");
        assert_eq!(
            pivot[1].1,
            MedalTypeCounts { gold: 0, silver: 0, bronze: 2 }
        );

        let only_canada = medals_by_type(&ds, Some("Canada"), None);
        assert_eq!(only_canada.len(), 1);
        assert_eq!(only_canada[0].0, "Canada");
    }

    #[test]
    fn gender_distribution_counts_non_medalists_too() {
        let ds = fixture();
        let counts = gender_distribution(&ds, None, None, None);
        // 4 male rows vs 3 female rows, descending
        assert_eq!(counts, vec![(Sex::M, 4), (Sex::F, 3)]);

        // Unobserved categories are omitted entirely
        let swimming = gender_distribution(&ds, None, None, Some("Swimming"));
        assert_eq!(swimming, vec![(Sex::F, 3)]);
    }

    #[test]
    fn age_distribution_buckets_cover_known_ages() {
        let ds = fixture();
        let buckets = age_distribution(&ds, None, None);
        assert_eq!(buckets.len(), 13);
        assert_eq!(buckets[0].0, "10-14");
        assert_eq!(buckets[12].0, "70-74");

        // ages: 24, 24, 30, 34, 19 in range; 75 excluded; one unknown dropped
        let total: u64 = buckets.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 5);

        let by_label: HashMap<&str, u64> =
            buckets.iter().map(|(l, n)| (l.as_str(), *n)).collect();
        assert_eq!(by_label["15-19"], 1);
        assert_eq!(by_label["20-24"], 2);
        assert_eq!(by_label["30-34"], 2);
        assert_eq!(by_label["70-74"], 0);
    }

    #[test]
    fn medals_over_time_is_ascending_by_year() {
        let ds = fixture();
        assert_eq!(medals_over_time(&ds, None, None), vec![(1992, 3), (1996, 2)]);
        assert_eq!(
            medals_over_time(&ds, Some("France"), Some("Summer")),
            vec![(1992, 2), (1996, 1)]
        );
    }

    #[test]
    fn top_sports_ranks_by_medal_count() {
        let ds = fixture();
        let ranked = top_sports_by_medals(&ds, None, 10);
        assert_eq!(ranked[0], ("Swimming".to_string(), 3));
        // Ice Hockey and Judo tie at 1: lexicographic order breaks it
        assert_eq!(ranked[1], ("Ice Hockey".to_string(), 1));
        assert_eq!(ranked[2], ("Judo".to_string(), 1));
    }

    #[test]
    fn avg_age_by_sport_rounds_to_one_decimal() {
        let ds = fixture();
        let means = avg_age_by_sport(&ds, None, 10);
        // Shooting 75.0, Swimming (30+34+19)/3 = 27.666…, Judo 24.0
        assert_eq!(means[0], ("Shooting".to_string(), 75.0));
        assert_eq!(means[1], ("Swimming".to_string(), 27.7));
        assert_eq!(means[2], ("Judo".to_string(), 24.0));
    }

    #[test]
    fn gender_over_time_deduplicates_athlete_years() {
        let ds = fixture();
        let series = gender_over_time(&ds, Some("Summer"));
        assert_eq!(series[0].0, Sex::F);
        assert_eq!(series[0].1, vec![(1992, 1), (1996, 2)]);
        assert_eq!(series[1].0, Sex::M);
        // athlete 1 appears twice in 1992 but counts once
        assert_eq!(series[1].1, vec![(1992, 1), (1996, 1)]);
    }

    #[test]
    fn athlete_count_over_time_with_and_without_season() {
        let ds = fixture();
        assert_eq!(
            athlete_count_over_time(&ds, Some("Summer")),
            vec![(1992, 2), (1996, 3)]
        );
        // No season filter: the Winter appearance joins 1992
        assert_eq!(
            athlete_count_over_time(&ds, None),
            vec![(1992, 3), (1996, 3)]
        );
    }

    #[test]
    fn country_stats_for_known_country() {
        let ds = fixture();
        let stats = country_stats(&ds, "France");
        assert_eq!(stats.total_athletes, 2);
        assert_eq!(stats.total_medals, 3);
        assert_eq!(stats.gold + stats.silver + stats.bronze, stats.total_medals);
        assert_eq!(stats.gold, 2);
        assert_eq!(stats.silver, 1);
        assert_eq!(stats.bronze, 0);
        // ages 24, 24, 30, 34 → 28.0
        assert_eq!(stats.avg_age, Some(28.0));
        assert_eq!(stats.best_sport.as_deref(), Some("Swimming"));
    }

    #[test]
    fn country_stats_best_sport_tie_is_lexicographic() {
        let ds = Dataset::new(vec![
            row(1, Sex::M, None, 2000, "Summer", "Rowing", Some(Medal::Gold), Some("Italy")),
            row(2, Sex::M, None, 2000, "Summer", "Fencing", Some(Medal::Gold), Some("Italy")),
        ]);
        let stats = country_stats(&ds, "Italy");
        assert_eq!(stats.best_sport.as_deref(), Some("Fencing"));
        assert_eq!(stats.avg_age, None);
    }

    #[test]
    fn country_stats_for_unknown_country_is_zeroed() {
        let ds = fixture();
        let stats = country_stats(&ds, "Atlantis");
        assert_eq!(stats.total_athletes, 0);
        assert_eq!(stats.total_medals, 0);
        assert_eq!(stats.avg_age, None);
        assert_eq!(stats.best_sport, None);
    }
}
