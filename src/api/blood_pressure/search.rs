// Free-text search over blood pressure readings.
//
// Terms are whitespace separated and all of them must match. A numeric term matches the id,
// systolic or diastolic value exactly; any term matches a case-insensitive substring of the
// owner's login.

use crate::api::blood_pressure::model::BloodPressure;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    terms: Vec<String>,
}

impl SearchQuery {
    pub fn parse(query: &str) -> Self {
        Self {
            terms: query.split_whitespace().map(str::to_lowercase).collect(),
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, entity: &BloodPressure) -> bool {
        self.terms.iter().all(|term| term_matches(term, entity))
    }
}

fn term_matches(term: &str, entity: &BloodPressure) -> bool {
    let login_match: bool = entity
        .user
        .as_ref()
        .and_then(|user| user.login.as_deref())
        .is_some_and(|login| login.to_lowercase().contains(term));
    if login_match {
        return true;
    }

    match term.parse::<i64>() {
        Ok(number) => {
            entity.id == Some(number)
                || i64::from(entity.systolic) == number
                || i64::from(entity.diastolic) == number
        }
        Err(_) => false,
    }
}
