pub mod aggregate;
pub mod handlers;

pub use handlers::{
    age_distribution, athlete_count_over_time, avg_age_by_sport, country_stats,
    gender_distribution, gender_over_time, get_countries, get_sports, get_years, home,
    medals_by_country, medals_by_type, medals_over_time, top_sports_by_medals,
};
