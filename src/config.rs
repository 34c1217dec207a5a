use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub athletes_csv: String,
    pub regions_csv: String,
    pub lr_model_path: String,
    pub rf_model_path: String,
    pub allowed_origin: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if it exists (for development)
        dotenvy::dotenv().ok();

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid PORT value: {}", e))?;

        let athletes_csv =
            env::var("ATHLETES_CSV").unwrap_or_else(|_| "./data/athlete_events.csv".to_string());

        let regions_csv =
            env::var("REGIONS_CSV").unwrap_or_else(|_| "./data/noc_regions.csv".to_string());

        let lr_model_path =
            env::var("LR_MODEL").unwrap_or_else(|_| "./models/lr_model.json".to_string());

        let rf_model_path =
            env::var("RF_MODEL").unwrap_or_else(|_| "./models/rf_model.json".to_string());

        let allowed_origin = env::var("ALLOWED_ORIGIN")
            .unwrap_or_else(|_| "https://olympicsdashboard-1.onrender.com".to_string());

        Ok(Config {
            port,
            athletes_csv,
            regions_csv,
            lr_model_path,
            rf_model_path,
            allowed_origin,
        })
    }
}
