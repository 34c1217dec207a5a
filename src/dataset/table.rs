use serde::{Deserialize, Serialize};

/// Athlete sex as recorded in the source table. Only these two values occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    F,
    M,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::F => "F",
            Sex::M => "M",
        }
    }
}

/// Medal won for an event appearance, when any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Medal::Gold => "Gold",
            Medal::Silver => "Silver",
            Medal::Bronze => "Bronze",
        }
    }
}

/// One athlete/event appearance, after the NOC→region join. The same athlete
/// `id` repeats across events and editions.
#[derive(Debug, Clone)]
pub struct AthleteRow {
    pub id: u32,
    pub sex: Sex,
    pub age: Option<f64>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub year: i32,
    pub season: String,
    pub sport: String,
    pub medal: Option<Medal>,
    pub noc: String,
    /// Human-readable country name; None when the NOC code is unmapped.
    pub region: Option<String>,
}

/// The joined athlete-events table. Built once at startup, read-only after.
#[derive(Debug)]
pub struct Dataset {
    rows: Vec<AthleteRow>,
}

impl Dataset {
    pub fn new(rows: Vec<AthleteRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[AthleteRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
