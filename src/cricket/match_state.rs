//! Closed team/venue vocabularies and the raw state of a run chase.
//!
//! The display names double as the category labels the trained classifier
//! was fitted on, so they must match the training data byte for byte.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnknownName {
    #[error("unknown team '{0}'")]
    Team(String),
    #[error("unknown city '{0}'")]
    City(String),
}

// ── Teams ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    #[serde(rename = "Sunrisers Hyderabad")]
    SunrisersHyderabad,
    #[serde(rename = "Mumbai Indians")]
    MumbaiIndians,
    #[serde(rename = "Royal Challengers Bangalore")]
    RoyalChallengersBangalore,
    #[serde(rename = "Kolkata Knight Riders")]
    KolkataKnightRiders,
    #[serde(rename = "Kings XI Punjab")]
    KingsXiPunjab,
    #[serde(rename = "Chennai Super Kings")]
    ChennaiSuperKings,
    #[serde(rename = "Rajasthan Royals")]
    RajasthanRoyals,
    #[serde(rename = "Delhi Capitals")]
    DelhiCapitals,
}

impl Team {
    pub const ALL: [Team; 8] = [
        Team::SunrisersHyderabad,
        Team::MumbaiIndians,
        Team::RoyalChallengersBangalore,
        Team::KolkataKnightRiders,
        Team::KingsXiPunjab,
        Team::ChennaiSuperKings,
        Team::RajasthanRoyals,
        Team::DelhiCapitals,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Team::SunrisersHyderabad => "Sunrisers Hyderabad",
            Team::MumbaiIndians => "Mumbai Indians",
            Team::RoyalChallengersBangalore => "Royal Challengers Bangalore",
            Team::KolkataKnightRiders => "Kolkata Knight Riders",
            Team::KingsXiPunjab => "Kings XI Punjab",
            Team::ChennaiSuperKings => "Chennai Super Kings",
            Team::RajasthanRoyals => "Rajasthan Royals",
            Team::DelhiCapitals => "Delhi Capitals",
        }
    }

    /// Teams in the alphabetical order the form presents them.
    pub fn sorted() -> Vec<Team> {
        let mut teams = Team::ALL.to_vec();
        teams.sort_by_key(|t| t.name());
        teams
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Team {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Team::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownName::Team(s.to_string()))
    }
}

// ── Cities ───────────────────────────────────────────────────────────────────
//
// "Bangalore" and "Bengaluru" are both present: the training data carries
// both spellings as distinct categories.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    Hyderabad,
    Bangalore,
    Mumbai,
    Indore,
    Kolkata,
    Delhi,
    Chandigarh,
    Jaipur,
    Chennai,
    #[serde(rename = "Cape Town")]
    CapeTown,
    #[serde(rename = "Port Elizabeth")]
    PortElizabeth,
    Durban,
    Centurion,
    #[serde(rename = "East London")]
    EastLondon,
    Johannesburg,
    Kimberley,
    Bloemfontein,
    Ahmedabad,
    Cuttack,
    Nagpur,
    Dharamsala,
    Visakhapatnam,
    Pune,
    Raipur,
    Ranchi,
    #[serde(rename = "Abu Dhabi")]
    AbuDhabi,
    Sharjah,
    Mohali,
    Bengaluru,
}

impl City {
    pub const ALL: [City; 29] = [
        City::Hyderabad,
        City::Bangalore,
        City::Mumbai,
        City::Indore,
        City::Kolkata,
        City::Delhi,
        City::Chandigarh,
        City::Jaipur,
        City::Chennai,
        City::CapeTown,
        City::PortElizabeth,
        City::Durban,
        City::Centurion,
        City::EastLondon,
        City::Johannesburg,
        City::Kimberley,
        City::Bloemfontein,
        City::Ahmedabad,
        City::Cuttack,
        City::Nagpur,
        City::Dharamsala,
        City::Visakhapatnam,
        City::Pune,
        City::Raipur,
        City::Ranchi,
        City::AbuDhabi,
        City::Sharjah,
        City::Mohali,
        City::Bengaluru,
    ];

    pub fn name(self) -> &'static str {
        match self {
            City::Hyderabad => "Hyderabad",
            City::Bangalore => "Bangalore",
            City::Mumbai => "Mumbai",
            City::Indore => "Indore",
            City::Kolkata => "Kolkata",
            City::Delhi => "Delhi",
            City::Chandigarh => "Chandigarh",
            City::Jaipur => "Jaipur",
            City::Chennai => "Chennai",
            City::CapeTown => "Cape Town",
            City::PortElizabeth => "Port Elizabeth",
            City::Durban => "Durban",
            City::Centurion => "Centurion",
            City::EastLondon => "East London",
            City::Johannesburg => "Johannesburg",
            City::Kimberley => "Kimberley",
            City::Bloemfontein => "Bloemfontein",
            City::Ahmedabad => "Ahmedabad",
            City::Cuttack => "Cuttack",
            City::Nagpur => "Nagpur",
            City::Dharamsala => "Dharamsala",
            City::Visakhapatnam => "Visakhapatnam",
            City::Pune => "Pune",
            City::Raipur => "Raipur",
            City::Ranchi => "Ranchi",
            City::AbuDhabi => "Abu Dhabi",
            City::Sharjah => "Sharjah",
            City::Mohali => "Mohali",
            City::Bengaluru => "Bengaluru",
        }
    }

    /// Venues in the alphabetical order the form presents them.
    pub fn sorted() -> Vec<City> {
        let mut cities = City::ALL.to_vec();
        cities.sort_by_key(|c| c.name());
        cities
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        City::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownName::City(s.to_string()))
    }
}

// ── Match state ──────────────────────────────────────────────────────────────

/// Live state of the second innings as entered by the user.
///
/// Nothing here is range-checked; bounds belong to the form layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub batting_team: Team,
    pub bowling_team: Team,
    pub city: City,
    /// Runs the batting side must reach.
    pub target: u32,
    /// Runs scored so far.
    pub score: u32,
    /// Overs bowled, e.g. 4.3 for four overs and (roughly) three balls.
    pub overs_completed: f64,
    pub wickets_lost: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabularies_have_expected_sizes() {
        assert_eq!(Team::ALL.len(), 8);
        assert_eq!(City::ALL.len(), 29);
    }

    #[test]
    fn sorted_teams_are_alphabetical() {
        let names: Vec<&str> = Team::sorted().into_iter().map(Team::name).collect();
        assert_eq!(names.first(), Some(&"Chennai Super Kings"));
        assert_eq!(names.last(), Some(&"Sunrisers Hyderabad"));
        let mut expected = names.clone();
        expected.sort();
        assert_eq!(names, expected);
    }

    #[test]
    fn sorted_cities_start_with_abu_dhabi() {
        let cities = City::sorted();
        assert_eq!(cities[0], City::AbuDhabi);
        assert_eq!(cities[1], City::Ahmedabad);
        assert_eq!(cities.len(), 29);
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!("mumbai indians".parse::<Team>(), Ok(Team::MumbaiIndians));
        assert_eq!("  Cape Town ".parse::<City>(), Ok(City::CapeTown));
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!(
            "Gujarat Titans".parse::<Team>(),
            Err(UnknownName::Team("Gujarat Titans".into()))
        );
        assert!("Lahore".parse::<City>().is_err());
    }

    #[test]
    fn serde_uses_display_names() {
        let json = serde_json::to_string(&Team::KingsXiPunjab).unwrap();
        assert_eq!(json, "\"Kings XI Punjab\"");
        let city: City = serde_json::from_str("\"Port Elizabeth\"").unwrap();
        assert_eq!(city, City::PortElizabeth);
        for city in City::ALL {
            let json = serde_json::to_string(&city).unwrap();
            assert_eq!(json, format!("\"{}\"", city.name()));
        }
    }
}
